//! # forecaster-core
//!
//! Default forecasting engine behind the `forecaster-spi` contract.
//! Fits a linear trend plus phase-binned daily/weekly seasonal factors,
//! combined multiplicatively or additively, with residual-based
//! prediction intervals.

mod seasonal_trend;
mod seasonality;
mod trend;

pub use seasonal_trend::{ForecastConfig, SeasonalTrendForecaster, SeasonalityMode};
