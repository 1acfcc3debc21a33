//! Panel — the canonical (date, instrument) keyed table of field values.
//!
//! Storage is a dense grid per field indexed by (date index, instrument index).
//! Every key on the two axes is present; a missing observation is a `None`
//! cell, never a missing key.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Composite key into a panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelKey {
    pub date: NaiveDate,
    pub instrument: String,
}

impl PanelKey {
    pub fn new(date: NaiveDate, instrument: impl Into<String>) -> Self {
        Self {
            date,
            instrument: instrument.into(),
        }
    }
}

/// Aligned field values for a universe of instruments on a fixed date axis.
///
/// Immutable once built; every engine takes it by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    instruments: Vec<String>,
    /// field → row-major grid of `dates.len() * instruments.len()` cells.
    cells: BTreeMap<String, Vec<Option<f64>>>,
    date_index: HashMap<NaiveDate, usize>,
    instrument_index: HashMap<String, usize>,
}

impl Panel {
    /// Assemble a panel from its axes and per-field grids.
    ///
    /// `dates` must be strictly ascending; each grid must hold
    /// `dates.len() * instruments.len()` cells in date-major order.
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        instruments: Vec<String>,
        cells: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Self {
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(cells
            .values()
            .all(|grid| grid.len() == dates.len() * instruments.len()));

        let date_index = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let instrument_index = instruments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self {
            dates,
            instruments,
            cells,
            date_index,
            instrument_index,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|k| k.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.cells.contains_key(field)
    }

    pub fn date_position(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn instrument_position(&self, instrument: &str) -> Option<usize> {
        self.instrument_index.get(instrument).copied()
    }

    /// Number of (date, instrument) keys.
    pub fn len(&self) -> usize {
        self.dates.len() * self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` lies on both axes. Presence does not imply a value.
    pub fn contains_key(&self, key: &PanelKey) -> bool {
        self.date_index.contains_key(&key.date)
            && self.instrument_index.contains_key(&key.instrument)
    }

    /// Cell value by axis positions.
    pub fn value_at(&self, field: &str, date_idx: usize, instrument_idx: usize) -> Option<f64> {
        let grid = self.cells.get(field)?;
        grid.get(date_idx * self.instruments.len() + instrument_idx)
            .copied()
            .flatten()
    }

    /// Cell value by date and instrument.
    pub fn get(&self, date: NaiveDate, instrument: &str, field: &str) -> Option<f64> {
        let di = self.date_position(date)?;
        let ii = self.instrument_position(instrument)?;
        self.value_at(field, di, ii)
    }

    /// All field values for one key, or `None` when the key is off-axis.
    pub fn row(&self, key: &PanelKey) -> Option<BTreeMap<&str, Option<f64>>> {
        let di = self.date_position(key.date)?;
        let ii = self.instrument_position(&key.instrument)?;
        Some(
            self.cells
                .keys()
                .map(|field| (field.as_str(), self.value_at(field, di, ii)))
                .collect(),
        )
    }

    /// All keys in (date, instrument) order.
    pub fn keys(&self) -> impl Iterator<Item = PanelKey> + '_ {
        self.dates.iter().flat_map(move |date| {
            self.instruments
                .iter()
                .map(move |inst| PanelKey::new(*date, inst.clone()))
        })
    }

    /// One instrument's values of `field` along the date axis.
    pub fn column(&self, field: &str, instrument: &str) -> Option<Vec<Option<f64>>> {
        let grid = self.cells.get(field)?;
        let ii = self.instrument_position(instrument)?;
        let width = self.instruments.len();
        Some((0..self.dates.len()).map(|di| grid[di * width + ii]).collect())
    }

    /// Every instrument's values of `field` on the date at `date_idx`, in
    /// instrument-axis order.
    pub fn cross_section(&self, field: &str, date_idx: usize) -> Option<&[Option<f64>]> {
        let grid = self.cells.get(field)?;
        let width = self.instruments.len();
        grid.get(date_idx * width..(date_idx + 1) * width)
    }

    /// Restrict the panel to the dates where `keep` returns true.
    pub fn filter_dates<F>(&self, mut keep: F) -> Panel
    where
        F: FnMut(usize, NaiveDate) -> bool,
    {
        let width = self.instruments.len();
        let kept: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(i, d)| keep(*i, **d))
            .map(|(i, _)| i)
            .collect();
        let dates = kept.iter().map(|i| self.dates[*i]).collect();
        let cells = self
            .cells
            .iter()
            .map(|(field, grid)| {
                let rows = kept
                    .iter()
                    .flat_map(|i| grid[i * width..(i + 1) * width].iter().copied())
                    .collect();
                (field.clone(), rows)
            })
            .collect();
        Panel::from_parts(dates, self.instruments.clone(), cells)
    }

    /// Count of defined cells for `field`.
    pub fn defined_count(&self, field: &str) -> usize {
        self.cells
            .get(field)
            .map(|grid| grid.iter().filter(|c| c.is_some()).count())
            .unwrap_or(0)
    }
}
