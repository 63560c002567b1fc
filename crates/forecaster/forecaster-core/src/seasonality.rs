//! Phase-binned seasonal components
//!
//! Each component covers one period (daily, weekly, yearly) and holds a
//! factor per phase bin: in multiplicative mode the average ratio of
//! observed value to the current baseline, in additive mode the average
//! offset. Bins with no samples stay neutral.

use crate::seasonal_trend::SeasonalityMode;

/// Daily period in seconds
pub(crate) const DAILY_PERIOD: i64 = 86_400;
/// Weekly period in seconds
pub(crate) const WEEKLY_PERIOD: i64 = 604_800;
/// Mean-year period in seconds
pub(crate) const YEARLY_PERIOD: i64 = 31_557_600;

/// Bin counts: hourly resolution within a day, daily within a week,
/// monthly within a year.
pub(crate) const DAILY_BINS: usize = 24;
pub(crate) const WEEKLY_BINS: usize = 7;
pub(crate) const YEARLY_BINS: usize = 12;

#[derive(Debug, Clone)]
pub(crate) struct SeasonalComponent {
    period_seconds: i64,
    factors: Vec<f64>,
}

impl SeasonalComponent {
    /// Fit one component against the running baseline. `epochs` are
    /// absolute unix seconds so the phase lines up across requests.
    pub fn fit(
        epochs: &[i64],
        values: &[f64],
        baseline: &[f64],
        period_seconds: i64,
        bins: usize,
        mode: SeasonalityMode,
    ) -> Self {
        let neutral = match mode {
            SeasonalityMode::Multiplicative => 1.0,
            SeasonalityMode::Additive => 0.0,
        };
        let mut sums = vec![0.0; bins];
        let mut counts = vec![0usize; bins];

        for ((&epoch, &value), &base) in epochs.iter().zip(values.iter()).zip(baseline.iter()) {
            let bin = phase_bin(epoch, period_seconds, bins);
            match mode {
                SeasonalityMode::Multiplicative => {
                    // A near-zero baseline gives no usable ratio
                    if base.abs() < 1e-9 {
                        continue;
                    }
                    sums[bin] += value / base;
                    counts[bin] += 1;
                }
                SeasonalityMode::Additive => {
                    sums[bin] += value - base;
                    counts[bin] += 1;
                }
            }
        }

        let factors = sums
            .iter()
            .zip(counts.iter())
            .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { neutral })
            .collect();

        Self {
            period_seconds,
            factors,
        }
    }

    /// Seasonal factor for the bin an instant falls into
    pub fn factor_at(&self, epoch: i64) -> f64 {
        let bin = phase_bin(epoch, self.period_seconds, self.factors.len());
        self.factors[bin]
    }
}

/// Map an instant to its phase bin within the period
fn phase_bin(epoch: i64, period_seconds: i64, bins: usize) -> usize {
    let phase = epoch.rem_euclid(period_seconds);
    let bin = (phase as i128 * bins as i128 / period_seconds as i128) as usize;
    bin.min(bins - 1)
}
