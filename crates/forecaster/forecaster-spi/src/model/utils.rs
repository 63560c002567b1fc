//! Helpers shared by engines and the orchestration layer

use chrono::{DateTime, Duration, Utc};

/// Generate `periods` future instants spaced `step_seconds` apart,
/// starting strictly after `last`. History is never included.
pub fn future_timestamps(last: DateTime<Utc>, periods: usize, step_seconds: i64) -> Vec<DateTime<Utc>> {
    (1..=periods as i64)
        .map(|i| last + Duration::seconds(step_seconds * i))
        .collect()
}
