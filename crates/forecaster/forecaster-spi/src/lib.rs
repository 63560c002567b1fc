//! Forecaster Service Provider Interface
//!
//! Defines the contract between the BYOM HTTP service and any forecasting
//! engine: a fit/predict trait pair, shared model types, and the error
//! taxonomy engines report through.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{FittedModel, Forecaster};
pub use error::{ForecastError, Result};
pub use model::{future_timestamps, Forecast, Observation};
