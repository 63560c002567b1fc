//! Error module containing the engine error taxonomy

mod forecast_error;

pub use forecast_error::{ForecastError, Result};
