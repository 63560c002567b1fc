//! Seasonal-trend forecasting engine
//!
//! The default engine behind the BYOM contract: linear trend plus
//! daily/weekly seasonal factor tables, combined multiplicatively by
//! default so seasonal swings scale with the signal level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use forecaster_spi::{FittedModel, Forecast, ForecastError, Forecaster, Observation, Result};

use crate::seasonality::{
    SeasonalComponent, DAILY_BINS, DAILY_PERIOD, WEEKLY_BINS, WEEKLY_PERIOD, YEARLY_BINS,
    YEARLY_PERIOD,
};
use crate::trend::LinearTrend;

/// How seasonal components combine with the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// Seasonal offsets added to the trend
    Additive,
    /// Seasonal factors scale the trend
    Multiplicative,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Prediction interval width, in (0, 1)
    pub interval_width: f64,
    pub daily_seasonality: bool,
    pub weekly_seasonality: bool,
    pub yearly_seasonality: bool,
    pub seasonality_mode: SeasonalityMode,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            interval_width: 0.95,
            daily_seasonality: true,
            weekly_seasonality: true,
            yearly_seasonality: false,
            seasonality_mode: SeasonalityMode::Multiplicative,
        }
    }
}

/// Seasonal-trend engine; one instance serves the whole process and
/// every fit produces an independent [`FittedModel`].
#[derive(Debug)]
pub struct SeasonalTrendForecaster {
    config: ForecastConfig,
}

impl SeasonalTrendForecaster {
    /// Create an engine with a validated configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        if !(config.interval_width > 0.0 && config.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter {
                name: "interval_width".to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }
        Ok(Self { config })
    }

    fn enabled_periods(&self) -> Vec<(i64, usize)> {
        let mut periods = Vec::new();
        if self.config.daily_seasonality {
            periods.push((DAILY_PERIOD, DAILY_BINS));
        }
        if self.config.weekly_seasonality {
            periods.push((WEEKLY_PERIOD, WEEKLY_BINS));
        }
        if self.config.yearly_seasonality {
            periods.push((YEARLY_PERIOD, YEARLY_BINS));
        }
        periods
    }
}

impl Default for SeasonalTrendForecaster {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }
}

impl Forecaster for SeasonalTrendForecaster {
    fn fit(&self, history: &[Observation]) -> Result<Box<dyn FittedModel>> {
        if history.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: history.len(),
            });
        }

        let t0 = history[0].ts.timestamp();
        let epochs: Vec<i64> = history.iter().map(|o| o.ts.timestamp()).collect();
        let t_rel: Vec<f64> = epochs.iter().map(|&e| (e - t0) as f64).collect();
        let values: Vec<f64> = history.iter().map(|o| o.value).collect();

        let trend = LinearTrend::fit(&t_rel, &values);

        // Components are fitted sequentially against the running
        // baseline, each one absorbing structure the previous ones left.
        let mode = self.config.seasonality_mode;
        let mut baseline: Vec<f64> = t_rel.iter().map(|&t| trend.value_at(t)).collect();
        let mut components = Vec::new();
        for (period, bins) in self.enabled_periods() {
            let component = SeasonalComponent::fit(&epochs, &values, &baseline, period, bins, mode);
            for (base, &epoch) in baseline.iter_mut().zip(epochs.iter()) {
                match mode {
                    SeasonalityMode::Multiplicative => *base *= component.factor_at(epoch),
                    SeasonalityMode::Additive => *base += component.factor_at(epoch),
                }
            }
            components.push(component);
        }

        let residuals: Vec<f64> = values
            .iter()
            .zip(baseline.iter())
            .map(|(v, b)| v - b)
            .collect();
        let residual_std = std_dev(&residuals);
        if !residual_std.is_finite() {
            return Err(ForecastError::NumericalError(
                "non-finite residuals after fit".to_string(),
            ));
        }

        Ok(Box::new(SeasonalTrendModel {
            trend,
            components,
            mode,
            t0,
            residual_std,
            interval_width: self.config.interval_width,
        }))
    }

    fn name(&self) -> &str {
        "seasonal-trend"
    }
}

#[derive(Debug)]
struct SeasonalTrendModel {
    trend: LinearTrend,
    components: Vec<SeasonalComponent>,
    mode: SeasonalityMode,
    t0: i64,
    residual_std: f64,
    interval_width: f64,
}

impl FittedModel for SeasonalTrendModel {
    fn predict(&self, future: &[DateTime<Utc>]) -> Result<Forecast> {
        let values: Vec<f64> = future
            .iter()
            .map(|ts| {
                let epoch = ts.timestamp();
                let mut value = self.trend.value_at((epoch - self.t0) as f64);
                for component in &self.components {
                    match self.mode {
                        SeasonalityMode::Multiplicative => value *= component.factor_at(epoch),
                        SeasonalityMode::Additive => value += component.factor_at(epoch),
                    }
                }
                value
            })
            .collect();

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NumericalError(
                "non-finite forecast value".to_string(),
            ));
        }

        // Uncertainty grows with the forecast step
        let std_errors: Vec<f64> = (0..values.len())
            .map(|h| self.residual_std * ((h + 1) as f64).sqrt())
            .collect();

        Ok(Forecast::from_standard_errors(
            values,
            &std_errors,
            self.interval_width,
        ))
    }
}

/// Population standard deviation around the mean
fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
