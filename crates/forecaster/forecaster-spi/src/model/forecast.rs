//! Forecast output with prediction intervals

use serde::{Deserialize, Serialize};

/// Point forecasts plus the engine's prediction interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Point forecast, one entry per requested future instant
    pub values: Vec<f64>,
    /// Lower bound of the prediction interval
    pub lower: Vec<f64>,
    /// Upper bound of the prediction interval
    pub upper: Vec<f64>,
    /// Interval width the engine was configured for (e.g. 0.95)
    pub confidence_level: f64,
}

impl Forecast {
    /// Build a forecast with intervals derived from per-step standard errors
    pub fn from_standard_errors(values: Vec<f64>, std_errors: &[f64], confidence_level: f64) -> Self {
        let z = z_score(confidence_level);

        let lower = values
            .iter()
            .zip(std_errors.iter())
            .map(|(&v, &se)| v - z * se)
            .collect();
        let upper = values
            .iter()
            .zip(std_errors.iter())
            .map(|(&v, &se)| v + z * se)
            .collect();

        Self {
            values,
            lower,
            upper,
            confidence_level,
        }
    }

    /// Number of forecast points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Approximate two-sided z-score for a confidence level
fn z_score(confidence_level: f64) -> f64 {
    // Common levels looked up directly, linear-ish fallback otherwise
    match confidence_level {
        c if (c - 0.99).abs() < 1e-9 => 2.576,
        c if (c - 0.95).abs() < 1e-9 => 1.96,
        c if (c - 0.90).abs() < 1e-9 => 1.645,
        c if (c - 0.80).abs() < 1e-9 => 1.282,
        c => 1.96 * c / 0.95,
    }
}
