//! Rolling mean with a minimum-observation floor.
//!
//! Mean of the defined values in the trailing `period` rows. The output is
//! defined once at least `min_periods` of those rows carry a value, so a
//! half-window floor populates early rows and gaps shrink the sample
//! instead of voiding the window.

use super::{finite, ColumnIndicator};

#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    min_periods: usize,
    name: String,
}

impl RollingMean {
    /// Full-window mean: every row of the window must be defined.
    pub fn new(period: usize) -> Self {
        Self::with_min_periods(period, period)
    }

    pub fn with_min_periods(period: usize, min_periods: usize) -> Self {
        assert!(period >= 1, "rolling mean period must be >= 1");
        Self {
            period,
            min_periods: min_periods.clamp(1, period),
            name: format!("sma_{period}"),
        }
    }

    /// Moving average used by breadth: floor of `max(1, period / 2)` observations.
    pub fn half_window(period: usize) -> Self {
        Self::with_min_periods(period, (period / 2).max(1))
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn min_periods(&self) -> usize {
        self.min_periods
    }
}

impl ColumnIndicator for RollingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.min_periods.saturating_sub(1)
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        // Window sum recomputed per row; no running-sum drift.
        (0..values.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(self.period);
                let (sum, count) = values[start..=i]
                    .iter()
                    .flatten()
                    .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
                if count >= self.min_periods {
                    finite(sum / count as f64)
                } else {
                    None
                }
            })
            .collect()
    }
}
