//! Relative Strength Index (RSI), simple-average form.
//!
//! Gains and losses of the one-row difference are each averaged over a full
//! `period` window. RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Edge cases: avg_loss == 0 with gains → 100; no movement at all → undefined.

use super::{finite, ColumnIndicator, RollingMean};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl ColumnIndicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let changes: Vec<Option<f64>> = (0..values.len())
            .map(|i| Some(values[i]? - values.get(i.checked_sub(1)?).copied().flatten()?))
            .collect();
        let gains: Vec<Option<f64>> = changes.iter().map(|c| c.map(|v| v.max(0.0))).collect();
        let losses: Vec<Option<f64>> = changes.iter().map(|c| c.map(|v| (-v).max(0.0))).collect();

        let mean = RollingMean::new(self.period);
        let avg_gain = mean.compute(&gains);
        let avg_loss = mean.compute(&losses);

        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(g, l)| compute_rsi(g?, l?))
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        None
    } else if avg_loss == 0.0 {
        Some(100.0)
    } else {
        finite(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, defined};

    #[test]
    fn rsi_all_gains() {
        let result = Rsi::new(3).compute(&defined(&[100.0, 101.0, 102.0, 103.0, 104.0]));
        assert!(result[2].is_none());
        assert_approx(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let result = Rsi::new(3).compute(&defined(&[105.0, 104.0, 103.0, 102.0]));
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_mixed() {
        // Changes: +0.34, -0.25, -0.48 → avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI = 100 - 100/(1 + 0.34/0.73)
        let result = Rsi::new(3).compute(&defined(&[44.0, 44.34, 44.09, 43.61]));
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result[3], expected, 1e-9);
    }

    #[test]
    fn rsi_flat_is_undefined() {
        let result = Rsi::new(2).compute(&defined(&[10.0, 10.0, 10.0]));
        assert!(result[2].is_none());
    }
}
