//! Breadth Engine: one cross-sectional market-breadth row per date.
//!
//! Per date it counts advancing, declining and unchanged instruments over
//! single-period returns and the share of instruments trading above their
//! own moving average. A date with fewer valid returns than the configured
//! minimum is masked: every field of its row becomes `None`.

use super::table::per_instrument;
use super::{require_field, AnalyticsError};
use crate::data::Panel;
use crate::indicators::{ColumnIndicator, PctChange, RollingMean};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const CLOSE: &str = "close";

/// Breadth statistics for one date.
///
/// Counts are `None` only on masked dates; ratios are also `None` when their
/// denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthRow {
    pub date: NaiveDate,
    pub advancers: Option<usize>,
    pub decliners: Option<usize>,
    pub unchanged: Option<usize>,
    /// Instruments with a defined return on this date.
    pub total_stocks: Option<usize>,
    pub advance_ratio: Option<f64>,
    /// Share above the base-window moving average.
    pub pct_above_sma: Option<f64>,
    /// Instruments where both close and base moving average are defined.
    pub valid_for_sma: Option<usize>,
    /// `(window, share above)` for each additional window, in request order.
    pub extra_windows: Vec<(usize, Option<f64>)>,
}

impl BreadthRow {
    fn masked(date: NaiveDate, extra: &[usize]) -> Self {
        Self {
            date,
            advancers: None,
            decliners: None,
            unchanged: None,
            total_stocks: None,
            advance_ratio: None,
            pct_above_sma: None,
            valid_for_sma: None,
            extra_windows: extra.iter().map(|w| (*w, None)).collect(),
        }
    }

    /// Share above the moving average for `window`, base or extra.
    pub fn pct_above(&self, window: usize, base_window: usize) -> Option<f64> {
        if window == base_window {
            return self.pct_above_sma;
        }
        self.extra_windows
            .iter()
            .find(|(w, _)| *w == window)
            .and_then(|(_, v)| *v)
    }

    /// Whether every field of the row carries a value.
    pub fn is_fully_defined(&self) -> bool {
        self.advancers.is_some()
            && self.decliners.is_some()
            && self.unchanged.is_some()
            && self.total_stocks.is_some()
            && self.advance_ratio.is_some()
            && self.pct_above_sma.is_some()
            && self.valid_for_sma.is_some()
            && self.extra_windows.iter().all(|(_, v)| v.is_some())
    }
}

/// Breadth rows for every date of a panel, in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthTable {
    pub window: usize,
    pub extra_windows: Vec<usize>,
    pub min_stocks: usize,
    pub rows: Vec<BreadthRow>,
}

impl BreadthTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&BreadthRow> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Column names for flat export, in field order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [
            "advancers",
            "decliners",
            "unchanged",
            "total_stocks",
            "advance_ratio",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        names.push(format!("pct_above_sma_{}", self.window));
        names.push("valid_for_sma".into());
        names.extend(self.extra_windows.iter().map(|w| format!("pct_above_sma_{w}")));
        names
    }

    /// The row to report for `date`.
    ///
    /// Without a date: the latest fully defined row, else the last row.
    /// `None` only when the table is empty.
    pub fn summary(&self, date: Option<NaiveDate>) -> Result<Option<&BreadthRow>, AnalyticsError> {
        match date {
            Some(d) => self.get(d).map(Some).ok_or(AnalyticsError::DateNotFound(d)),
            None => Ok(self
                .rows
                .iter()
                .rev()
                .find(|r| r.is_fully_defined())
                .or_else(|| self.rows.last())),
        }
    }
}

/// Computes breadth over a panel's `close` field.
pub struct BreadthEngine<'a> {
    panel: &'a Panel,
}

impl<'a> BreadthEngine<'a> {
    pub fn new(panel: &'a Panel) -> Result<Self, AnalyticsError> {
        require_field(panel, CLOSE)?;
        Ok(Self { panel })
    }

    /// Single-window breadth.
    pub fn compute(&self, window: usize, min_stocks: usize) -> Result<BreadthTable, AnalyticsError> {
        self.compute_multi(&[window], min_stocks)
    }

    /// Base-window breadth plus a share-above column per additional window.
    ///
    /// The first entry is the base window. Repeated windows are computed once.
    pub fn compute_multi(
        &self,
        windows: &[usize],
        min_stocks: usize,
    ) -> Result<BreadthTable, AnalyticsError> {
        let Some(&base) = windows.first() else {
            return Err(AnalyticsError::InvalidParameter(
                "moving-average window list cannot be empty".into(),
            ));
        };
        if let Some(bad) = windows.iter().find(|w| **w == 0) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "moving-average window must be positive, got {bad}"
            )));
        }
        let mut extra: Vec<usize> = Vec::new();
        for w in &windows[1..] {
            if *w != base && !extra.contains(w) {
                extra.push(*w);
            }
        }

        let panel = self.panel;
        let returns = per_instrument(panel, CLOSE, |c| PctChange::new(1).compute(c));
        let closes = per_instrument(panel, CLOSE, |c| c.to_vec());
        let base_above = above_average(panel, &closes, base);
        let extra_above: Vec<Vec<(Option<f64>, usize)>> = extra
            .iter()
            .map(|w| above_average(panel, &closes, *w))
            .collect();

        let mut rows = Vec::with_capacity(panel.dates().len());
        let mut masked = 0usize;
        for (di, date) in panel.dates().iter().enumerate() {
            let (mut adv, mut dec, mut unch) = (0usize, 0usize, 0usize);
            for ret in returns.iter().filter_map(|r| r[di]) {
                if ret > 0.0 {
                    adv += 1;
                } else if ret < 0.0 {
                    dec += 1;
                } else {
                    unch += 1;
                }
            }
            let total = adv + dec + unch;
            if total < min_stocks {
                masked += 1;
                rows.push(BreadthRow::masked(*date, &extra));
                continue;
            }

            let movers = adv + dec;
            let (pct, valid) = base_above[di];
            rows.push(BreadthRow {
                date: *date,
                advancers: Some(adv),
                decliners: Some(dec),
                unchanged: Some(unch),
                total_stocks: Some(total),
                advance_ratio: (movers > 0).then(|| adv as f64 / movers as f64),
                pct_above_sma: pct,
                valid_for_sma: Some(valid),
                extra_windows: extra
                    .iter()
                    .zip(&extra_above)
                    .map(|(w, col)| (*w, col[di].0))
                    .collect(),
            });
        }

        log::debug!(
            "Breadth computed: {} dates, window={base}, extra={extra:?}, {masked} masked (min_stocks={min_stocks})",
            rows.len()
        );

        Ok(BreadthTable {
            window: base,
            extra_windows: extra,
            min_stocks,
            rows,
        })
    }
}

/// Per date: (share of instruments above their own moving average, number of
/// instruments where both close and average are defined).
fn above_average(
    panel: &Panel,
    closes: &[Vec<Option<f64>>],
    window: usize,
) -> Vec<(Option<f64>, usize)> {
    let sma = RollingMean::half_window(window);
    let averages = per_instrument(panel, CLOSE, |c| sma.compute(c));
    (0..panel.dates().len())
        .map(|di| {
            let (above, valid) = closes.iter().zip(&averages).fold(
                (0usize, 0usize),
                |(above, valid), (close, avg)| match (close[di], avg[di]) {
                    (Some(c), Some(a)) => (above + usize::from(c > a), valid + 1),
                    _ => (above, valid),
                },
            );
            let share = (valid > 0).then(|| above as f64 / valid as f64);
            (share, valid)
        })
        .collect()
}
