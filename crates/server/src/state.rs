//! Application state shared across handlers

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use forecaster_spi::Forecaster;

/// State injected into every handler: the forecasting engine and the
/// liveness record the health endpoint reads.
#[derive(Clone)]
pub struct AppState {
    pub forecaster: Arc<dyn Forecaster>,
    pub liveness: Arc<LivenessState>,
}

impl AppState {
    pub fn new(forecaster: Arc<dyn Forecaster>) -> Self {
        Self {
            forecaster,
            liveness: Arc::new(LivenessState::default()),
        }
    }
}

/// Timestamp of the last successful fit. Best-effort and last-writer-wins;
/// concurrent requests may race on it, which is acceptable since it is
/// purely informational.
#[derive(Default)]
pub struct LivenessState {
    last_trained: RwLock<Option<DateTime<Utc>>>,
}

impl LivenessState {
    pub fn record_training(&self, at: DateTime<Utc>) {
        if let Ok(mut last) = self.last_trained.write() {
            *last = Some(at);
        }
    }

    pub fn last_trained(&self) -> Option<DateTime<Utc>> {
        self.last_trained.read().ok().and_then(|last| *last)
    }
}
