//! KPI Engine: reduces an equity curve to risk/return statistics.
//!
//! Every metric is a pure function over the equity values. `KpiReport`
//! validates the curve once and bundles the results.

use breadthlab_core::domain::EquityPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trading periods per year used for annualisation.
pub const PERIODS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("invalid equity curve: {0}")]
    InvalidInput(String),
}

/// Summary statistics of one equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// Undefined when volatility is exactly zero.
    pub sharpe: Option<f64>,
    /// Non-positive fraction, 0 when equity never dips below a prior peak.
    pub max_drawdown: f64,
    pub num_periods: usize,
    #[serde(skip)]
    pub period_returns: Vec<f64>,
}

impl KpiReport {
    pub fn from_points(points: &[EquityPoint]) -> Result<Self, MetricsError> {
        let values: Vec<f64> = points.iter().map(|p| p.equity).collect();
        Self::compute(&values)
    }

    /// Compute all KPIs.
    ///
    /// Fails when the curve has fewer than two points, a non-finite value,
    /// or a non-positive starting equity.
    pub fn compute(equity_curve: &[f64]) -> Result<Self, MetricsError> {
        if equity_curve.len() < 2 {
            return Err(MetricsError::InvalidInput(format!(
                "need at least 2 points, got {}",
                equity_curve.len()
            )));
        }
        if let Some(bad) = equity_curve.iter().find(|v| !v.is_finite()) {
            return Err(MetricsError::InvalidInput(format!(
                "equity values must be finite, got {bad}"
            )));
        }
        if equity_curve[0] <= 0.0 {
            return Err(MetricsError::InvalidInput(format!(
                "initial equity must be positive, got {}",
                equity_curve[0]
            )));
        }

        let returns = period_returns(equity_curve);
        let total = total_return(equity_curve);
        let annualized = annualized_return(total, equity_curve.len());
        let volatility = annualized_volatility(&returns);
        Ok(Self {
            total_return: total,
            annualized_return: annualized,
            annualized_volatility: volatility,
            sharpe: sharpe_ratio(annualized, volatility),
            max_drawdown: max_drawdown(equity_curve),
            num_periods: equity_curve.len(),
            period_returns: returns,
        })
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: final / initial - 1.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(&initial), Some(&final_eq)) if initial > 0.0 => final_eq / initial - 1.0,
        _ => 0.0,
    }
}

/// (1 + total)^(252 / num_periods) - 1.
///
/// A total loss of 100% or more annualises to -1.
pub fn annualized_return(total_return: f64, num_periods: usize) -> f64 {
    if num_periods == 0 {
        return 0.0;
    }
    let growth = 1.0 + total_return;
    if growth <= 0.0 {
        return -1.0;
    }
    growth.powf(PERIODS_PER_YEAR / num_periods as f64) - 1.0
}

/// Sample standard deviation of period returns × sqrt(252).
pub fn annualized_volatility(period_returns: &[f64]) -> f64 {
    std_dev(period_returns) * PERIODS_PER_YEAR.sqrt()
}

/// Annualised return over annualised volatility; `None` at zero volatility.
pub fn sharpe_ratio(annualized_return: f64, annualized_volatility: f64) -> Option<f64> {
    if annualized_volatility == 0.0 {
        None
    } else {
        Some(annualized_return / annualized_volatility)
    }
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if equity is constant or monotonically increasing.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &eq in equity_curve {
        peak = peak.max(eq);
        if peak > 0.0 {
            max_dd = max_dd.min(eq / peak - 1.0);
        }
    }
    max_dd
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Per-period returns with the first period defined as 0.
pub fn period_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.is_empty() {
        return Vec::new();
    }
    std::iter::once(0.0)
        .chain(equity_curve.windows(2).map(|w| {
            if w[0] > 0.0 {
                (w[1] - w[0]) / w[0]
            } else {
                0.0
            }
        }))
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn flat_two_point_curve() {
        let kpi = KpiReport::compute(&[100.0, 100.0]).unwrap();
        assert_eq!(kpi.total_return, 0.0);
        assert_eq!(kpi.annualized_return, 0.0);
        assert_eq!(kpi.sharpe, None);
        assert_eq!(kpi.max_drawdown, 0.0);
        assert_eq!(kpi.period_returns, vec![0.0, 0.0]);
    }

    #[test]
    fn too_short_curve_is_invalid() {
        assert!(matches!(
            KpiReport::compute(&[100.0]),
            Err(MetricsError::InvalidInput(_))
        ));
        assert!(KpiReport::compute(&[]).is_err());
    }

    #[test]
    fn non_positive_start_is_invalid() {
        assert!(KpiReport::compute(&[0.0, 10.0]).is_err());
        assert!(KpiReport::compute(&[100.0, f64::NAN]).is_err());
    }

    #[test]
    fn total_and_annualized() {
        let curve = [100.0, 110.0, 121.0];
        let kpi = KpiReport::compute(&curve).unwrap();
        assert!((kpi.total_return - 0.21).abs() < EPS);
        let expected = 1.21_f64.powf(252.0 / 3.0) - 1.0;
        assert!((kpi.annualized_return - expected).abs() / expected < 1e-12);
        assert_eq!(kpi.num_periods, 3);
    }

    #[test]
    fn volatility_uses_sample_std_including_first_zero() {
        let returns = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0], 0.0);
        let mean = (0.0 + 0.1 - 0.1) / 3.0;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 2.0;
        assert!((annualized_volatility(&returns) - var.sqrt() * 252f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn max_drawdown_known_curve() {
        // peak 120 → trough 90 = -25%
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 110.0, 130.0]);
        assert!((dd - (-0.25)).abs() < EPS);
        assert_eq!(max_drawdown(&[100.0, 101.0, 102.0]), 0.0);
    }

    #[test]
    fn sharpe_sign_follows_return() {
        let up = KpiReport::compute(&[100.0, 101.0, 103.0, 102.0, 105.0]).unwrap();
        assert!(up.sharpe.unwrap() > 0.0);
        let down = KpiReport::compute(&[100.0, 98.0, 99.0, 95.0]).unwrap();
        assert!(down.sharpe.unwrap() < 0.0);
    }

    mod props {
        use crate::metrics::*;
        use proptest::prelude::*;

        fn curve() -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec(1.0f64..1_000_000.0, 2..60)
        }

        proptest! {
            #[test]
            fn drawdown_is_between_minus_one_and_zero(eq in curve()) {
                let dd = max_drawdown(&eq);
                prop_assert!((-1.0..=0.0).contains(&dd));
            }

            #[test]
            fn total_return_matches_endpoints(eq in curve()) {
                let kpi = KpiReport::compute(&eq).unwrap();
                let expected = eq[eq.len() - 1] / eq[0] - 1.0;
                prop_assert!((kpi.total_return - expected).abs() < 1e-9 * expected.abs().max(1.0));
                prop_assert_eq!(kpi.num_periods, eq.len());
                prop_assert!(kpi.annualized_volatility >= 0.0);
            }
        }
    }
}
