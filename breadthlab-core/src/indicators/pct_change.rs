//! Percent change over N rows, as a fraction.
//!
//! out[t] = (x[t] - x[t-period]) / x[t-period]
//! Undefined when either value is missing or the base is zero.

use super::{finite, ColumnIndicator};

#[derive(Debug, Clone)]
pub struct PctChange {
    period: usize,
    name: String,
}

impl PctChange {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "percent change period must be >= 1");
        Self {
            period,
            name: format!("pct_change_{period}"),
        }
    }
}

impl ColumnIndicator for PctChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| {
                let prev = values.get(i.checked_sub(self.period)?).copied().flatten()?;
                let curr = values[i]?;
                if prev == 0.0 {
                    return None;
                }
                finite((curr - prev) / prev)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, defined, DEFAULT_EPSILON};

    #[test]
    fn pct_change_basic() {
        let result = PctChange::new(1).compute(&defined(&[100.0, 110.0, 121.0]));
        assert!(result[0].is_none());
        assert_approx(result[1], 0.10, DEFAULT_EPSILON);
        assert_approx(result[2], 0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn pct_change_period_2() {
        let result = PctChange::new(2).compute(&defined(&[100.0, 110.0, 121.0]));
        assert!(result[1].is_none());
        assert_approx(result[2], 0.21, DEFAULT_EPSILON);
    }

    #[test]
    fn pct_change_negative() {
        let result = PctChange::new(1).compute(&defined(&[100.0, 90.0]));
        assert_approx(result[1], -0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn missing_values_propagate() {
        let values = vec![Some(100.0), None, Some(120.0)];
        let result = PctChange::new(1).compute(&values);
        assert!(result[1].is_none());
        assert!(result[2].is_none());
    }

    #[test]
    fn zero_base_is_undefined() {
        let result = PctChange::new(1).compute(&defined(&[0.0, 5.0]));
        assert!(result[1].is_none());
    }
}
