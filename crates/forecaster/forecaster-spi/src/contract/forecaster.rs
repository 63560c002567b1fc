//! Fit/predict traits every forecasting engine implements

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{Forecast, Observation};

/// A forecasting engine that can be fitted on a history of observations
///
/// The service holds a `Forecaster` behind a trait object so the
/// statistical engine is swappable without touching the HTTP contract.
/// Each call to [`fit`](Forecaster::fit) trains a fresh model; fitted
/// state never outlives the request that produced it.
pub trait Forecaster: Send + Sync {
    /// Fit a model on historical observations, sorted ascending by time
    fn fit(&self, history: &[Observation]) -> Result<Box<dyn FittedModel>>;

    /// Name of this engine, for logs
    fn name(&self) -> &str;
}

/// A model produced by [`Forecaster::fit`], ready to predict
pub trait FittedModel: Send + Sync + std::fmt::Debug {
    /// Predict one point value per future instant
    fn predict(&self, future: &[DateTime<Utc>]) -> Result<Forecast>;
}
