//! Ranking Engine: per-instrument rolling metrics and top-N leaders.
//!
//! Momentum and volume tables are zero-filled: an instrument without enough
//! history ranks as "no signal" rather than dropping out. Relative strength
//! compares each instrument with a benchmark on the dates the benchmark
//! trades.

use super::table::{per_instrument, MetricTable};
use super::{require_field, require_period, AnalyticsError};
use crate::data::Panel;
use crate::indicators::{ColumnIndicator, PctChange, RollingMean};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const CLOSE: &str = "close";
const VOLUME: &str = "volume";

/// How relative strength against the benchmark is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsMethod {
    /// Daily return minus the benchmark's daily return.
    Daily,
    /// Cumulative-return index divided by the benchmark's index.
    Cumulative,
}

impl FromStr for RsMethod {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RsMethod::Daily),
            "cumulative" => Ok(RsMethod::Cumulative),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "method must be 'daily' or 'cumulative', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for RsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsMethod::Daily => write!(f, "daily"),
            RsMethod::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// Non-fatal conditions met while extracting leaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankWarning {
    /// The table holds no defined value at all.
    NoData,
    /// Requested date absent (or empty); the latest date was used instead.
    DateFallback { requested: NaiveDate, used: NaiveDate },
}

impl fmt::Display for RankWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankWarning::NoData => write!(f, "metric has no valid data to rank"),
            RankWarning::DateFallback { requested, used } => write!(
                f,
                "date {requested} not found, using latest available date {used}"
            ),
        }
    }
}

/// Leaders for one date, highest value first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopN {
    pub date: Option<NaiveDate>,
    pub leaders: Vec<(String, f64)>,
    pub warnings: Vec<RankWarning>,
}

impl TopN {
    fn empty(warning: RankWarning) -> Self {
        log::warn!("{warning}");
        Self {
            date: None,
            leaders: Vec::new(),
            warnings: vec![warning],
        }
    }
}

/// Builds metric tables from a panel.
pub struct RankingEngine<'a> {
    panel: &'a Panel,
}

impl<'a> RankingEngine<'a> {
    pub fn new(panel: &'a Panel) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &Panel {
        self.panel
    }

    /// `period`-row percent change of close; undefined cells are 0.
    pub fn momentum(&self, period: usize) -> Result<MetricTable, AnalyticsError> {
        require_period("momentum period", period)?;
        require_field(self.panel, CLOSE)?;
        let pct = PctChange::new(period);
        let columns = per_instrument(self.panel, CLOSE, |c| pct.compute(c));
        Ok(self.table(columns).fill_none(0.0))
    }

    /// `period`-row rolling mean of volume, defined from the first row; undefined cells are 0.
    pub fn volume_rank(&self, period: usize) -> Result<MetricTable, AnalyticsError> {
        require_period("volume period", period)?;
        require_field(self.panel, VOLUME)?;
        let mean = RollingMean::with_min_periods(period, 1);
        let columns = per_instrument(self.panel, VOLUME, |c| mean.compute(c));
        Ok(self.table(columns).fill_none(0.0))
    }

    /// Performance of every instrument against `benchmark`.
    ///
    /// Only dates with a defined benchmark close are kept. Returns on that
    /// axis are zero-filled; the benchmark column is dropped.
    pub fn relative_strength(
        &self,
        benchmark: &str,
        method: RsMethod,
    ) -> Result<MetricTable, AnalyticsError> {
        require_field(self.panel, CLOSE)?;
        let bi = self
            .panel
            .instrument_position(benchmark)
            .ok_or_else(|| AnalyticsError::NotFound {
                what: "benchmark",
                name: benchmark.to_string(),
            })?;

        let traded = self
            .panel
            .filter_dates(|di, _| self.panel.value_at(CLOSE, di, bi).is_some());
        let returns: Vec<Vec<f64>> = per_instrument(&traded, CLOSE, |c| PctChange::new(1).compute(c))
            .into_iter()
            .map(|col| col.into_iter().map(|r| r.unwrap_or(0.0)).collect())
            .collect();

        let series: Vec<Vec<f64>> = match method {
            RsMethod::Daily => returns,
            RsMethod::Cumulative => returns
                .into_iter()
                .map(|col| {
                    col.into_iter()
                        .scan(1.0, |index, r| {
                            *index *= 1.0 + r;
                            Some(*index)
                        })
                        .collect()
                })
                .collect(),
        };
        let bench = &series[bi];

        let mut names = Vec::with_capacity(series.len().saturating_sub(1));
        let mut data = Vec::with_capacity(series.len().saturating_sub(1));
        for (ii, (name, col)) in traded.instruments().iter().zip(&series).enumerate() {
            if ii == bi {
                continue;
            }
            let rs = col
                .iter()
                .zip(bench)
                .map(|(x, b)| match method {
                    RsMethod::Daily => Some(x - b),
                    RsMethod::Cumulative => (*b != 0.0).then(|| x / b),
                })
                .collect();
            names.push(name.clone());
            data.push(rs);
        }

        log::debug!(
            "Relative strength vs {benchmark} ({method}): {} dates x {} instruments",
            traded.dates().len(),
            names.len()
        );
        Ok(MetricTable::from_columns(traded.dates().to_vec(), names, data))
    }

    /// Apply a caller-supplied pure function to the whole panel.
    pub fn custom_metric<F>(&self, metric: F) -> MetricTable
    where
        F: Fn(&Panel) -> MetricTable,
    {
        metric(self.panel)
    }

    /// Per-instrument indicator over one panel field, undefined cells kept.
    pub fn indicator_metric(
        &self,
        field: &str,
        indicator: &dyn ColumnIndicator,
    ) -> Result<MetricTable, AnalyticsError> {
        require_field(self.panel, field)?;
        let columns = per_instrument(self.panel, field, |c| indicator.compute(c));
        Ok(self.table(columns))
    }

    fn table(&self, columns: Vec<Vec<Option<f64>>>) -> MetricTable {
        MetricTable::from_columns(
            self.panel.dates().to_vec(),
            self.panel.instruments().to_vec(),
            columns,
        )
    }
}

/// The `n` highest defined values of `table` on `date`.
///
/// Without a date the last date with any defined value is used. A date that
/// is absent or holds no value falls back to that date with a warning. Ties
/// keep the table's column order.
pub fn top_n(table: &MetricTable, n: usize, date: Option<NaiveDate>) -> TopN {
    let Some(latest) = table.last_defined_row() else {
        return TopN::empty(RankWarning::NoData);
    };

    let mut warnings = Vec::new();
    let row_idx = match date {
        None => latest,
        Some(requested) => match table.date_position(requested) {
            Some(di) if table.row(di).iter().any(Option::is_some) => di,
            _ => {
                let warning = RankWarning::DateFallback {
                    requested,
                    used: table.dates()[latest],
                };
                log::warn!("{warning}");
                warnings.push(warning);
                latest
            }
        },
    };

    let mut leaders: Vec<(String, f64)> = table
        .columns()
        .iter()
        .zip(table.row(row_idx))
        .filter_map(|(name, v)| v.map(|v| (name.clone(), v)))
        .collect();
    // cells are finite, so -0.0 and 0.0 compare equal and keep column order
    leaders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    leaders.truncate(n);

    TopN {
        date: Some(table.dates()[row_idx]),
        leaders,
        warnings,
    }
}
