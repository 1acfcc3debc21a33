//! TimeSeries — one instrument's daily history of named numeric fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily history of named numeric fields for a single instrument.
///
/// Columnar: every field vector has the same length as `dates`. After
/// canonicalisation the dates are strictly increasing and unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub instrument: String,
    pub dates: Vec<NaiveDate>,
    pub fields: BTreeMap<String, Vec<Option<f64>>>,
}

/// One raw row before canonicalisation: a date plus its field values.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Option<f64>>,
}

impl SeriesRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.values.insert(field.to_string(), Some(value));
        self
    }
}

impl TimeSeries {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            dates: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Build a single-field `close` series from parallel slices.
    pub fn from_closes(instrument: impl Into<String>, dates: &[NaiveDate], closes: &[f64]) -> Self {
        let mut series = Self::new(instrument);
        series.dates = dates.to_vec();
        series
            .fields
            .insert("close".into(), closes.iter().map(|c| Some(*c)).collect());
        series
    }

    /// Attach (or replace) a field column. The column must match `dates` in length.
    pub fn with_field(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.dates.len());
        self.fields.insert(name.to_string(), values);
        self
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Value of `field` at row `index`, `None` when the field or cell is absent.
    pub fn value(&self, field: &str, index: usize) -> Option<f64> {
        self.fields
            .get(field)
            .and_then(|col| col.get(index).copied().flatten())
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn from_closes_builds_close_column() {
        let ts = TimeSeries::from_closes("AAA", &[d(2), d(3)], &[10.0, 11.0]);
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.value("close", 1), Some(11.0));
        assert_eq!(ts.value("volume", 0), None);
        assert_eq!(ts.first_date(), Some(d(2)));
        assert_eq!(ts.last_date(), Some(d(3)));
    }

    #[test]
    fn series_row_builder() {
        let row = SeriesRow::new(d(2)).with("close", 1.5).with("volume", 100.0);
        assert_eq!(row.values["close"], Some(1.5));
        assert_eq!(row.values.len(), 2);
    }
}
