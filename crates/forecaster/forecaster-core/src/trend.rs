//! Linear trend estimation
//!
//! Ordinary least squares of value against elapsed time, the trend half
//! of the engine. Seasonal structure is layered on top separately.

/// OLS linear trend: y = intercept + slope * t
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinearTrend {
    intercept: f64,
    slope: f64,
}

impl LinearTrend {
    /// Fit on paired (t, y) samples. A degenerate time axis (all samples
    /// at the same instant) falls back to a flat trend at the mean.
    pub fn fit(t: &[f64], y: &[f64]) -> Self {
        let n = t.len() as f64;
        let t_mean = t.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var = 0.0;
        for (&ti, &yi) in t.iter().zip(y.iter()) {
            cov += (ti - t_mean) * (yi - y_mean);
            var += (ti - t_mean).powi(2);
        }

        if var.abs() < f64::EPSILON {
            return Self {
                intercept: y_mean,
                slope: 0.0,
            };
        }

        let slope = cov / var;
        Self {
            intercept: y_mean - slope * t_mean,
            slope,
        }
    }

    /// Trend value at time t
    pub fn value_at(&self, t: f64) -> f64 {
        self.intercept + self.slope * t
    }

    #[cfg(test)]
    pub fn slope(&self) -> f64 {
        self.slope
    }
}
