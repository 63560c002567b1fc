//! A single historical observation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped value of the series being forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Instant the value was observed
    pub ts: DateTime<Utc>,
    /// Observed value
    pub value: f64,
}

impl Observation {
    pub fn new(ts: DateTime<Utc>, value: f64) -> Self {
        Self { ts, value }
    }
}
