//! Column indicators over optional numeric series.
//!
//! Every indicator maps one instrument's column (aligned to the panel date
//! axis, `None` where there is no value) to an output column of the same
//! length. Outputs never hold NaN or infinities: an undefined result is `None`.

pub mod pct_change;
pub mod rolling_mean;
pub mod rsi;

pub use pct_change::PctChange;
pub use rolling_mean::RollingMean;
pub use rsi::Rsi;

/// Trait for column indicators.
///
/// # Look-ahead contamination guard
/// No output at row t may depend on input from row t+1 or later.
pub trait ColumnIndicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "pct_change_5").
    fn name(&self) -> &str;

    /// Rows needed before the indicator can produce output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the whole column.
    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>>;
}

/// `Some(v)` only for finite values.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Wrap plain values as a fully defined column (test helper).
#[cfg(test)]
pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|v| Some(*v)).collect()
}

/// Assert an optional value is defined and approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
