//! Contract module containing trait definitions for forecasting engines

mod forecaster;

pub use forecaster::{FittedModel, Forecaster};
