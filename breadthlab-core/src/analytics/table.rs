//! Metric table: a dense (date × instrument) grid of optional values.

use crate::data::Panel;
use crate::indicators::finite;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-date, per-instrument metric values.
///
/// Cells are stored row-major (one row per date, columns in table order).
/// A cell is either a finite number or `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Option<f64>>,
}

impl MetricTable {
    /// All-undefined table with the given axes.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<String>) -> Self {
        let values = vec![None; dates.len() * columns.len()];
        Self {
            dates,
            columns,
            values,
        }
    }

    /// Build from one vector per column, each aligned to `dates`.
    ///
    /// Non-finite inputs are stored as `None`.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        columns: Vec<String>,
        data: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(columns.len(), data.len());
        let mut table = Self::new(dates, columns);
        for (ci, column) in data.into_iter().enumerate() {
            debug_assert_eq!(column.len(), table.dates.len());
            for (di, value) in column.into_iter().enumerate() {
                table.set(di, ci, value);
            }
        }
        table
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    pub fn date_position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn column_position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn value_at(&self, date_idx: usize, column_idx: usize) -> Option<f64> {
        self.values
            .get(date_idx * self.columns.len() + column_idx)
            .copied()
            .flatten()
    }

    pub fn get(&self, date: NaiveDate, column: &str) -> Option<f64> {
        self.value_at(self.date_position(date)?, self.column_position(column)?)
    }

    pub fn set(&mut self, date_idx: usize, column_idx: usize, value: Option<f64>) {
        let width = self.columns.len();
        self.values[date_idx * width + column_idx] = value.and_then(finite);
    }

    /// One date's row, in column order.
    pub fn row(&self, date_idx: usize) -> &[Option<f64>] {
        let width = self.columns.len();
        &self.values[date_idx * width..(date_idx + 1) * width]
    }

    /// One column along the date axis.
    pub fn column(&self, column: &str) -> Option<Vec<Option<f64>>> {
        let ci = self.column_position(column)?;
        Some((0..self.dates.len()).map(|di| self.value_at(di, ci)).collect())
    }

    /// Replace every undefined cell with `value`.
    pub fn fill_none(mut self, value: f64) -> Self {
        for cell in self.values.iter_mut() {
            if cell.is_none() {
                *cell = finite(value);
            }
        }
        self
    }

    pub fn has_undefined(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }

    /// Index of the last date carrying at least one defined value.
    pub fn last_defined_row(&self) -> Option<usize> {
        (0..self.dates.len())
            .rev()
            .find(|di| self.row(*di).iter().any(Option::is_some))
    }
}

/// Apply `f` to one panel field per instrument, in parallel, and gather the
/// outputs in instrument-axis order.
pub(crate) fn per_instrument<F>(panel: &Panel, field: &str, f: F) -> Vec<Vec<Option<f64>>>
where
    F: Fn(&[Option<f64>]) -> Vec<Option<f64>> + Sync,
{
    panel
        .instruments()
        .par_iter()
        .map(|inst| {
            let column = panel
                .column(field, inst)
                .unwrap_or_else(|| vec![None; panel.dates().len()]);
            f(&column)
        })
        .collect()
}
