//! Canonicalisation of raw rows into a `TimeSeries`: sort, dedupe, columnise.

use crate::domain::{SeriesRow, TimeSeries};
use std::collections::BTreeSet;

/// Outcome of canonicalising one instrument's rows.
#[derive(Debug)]
pub struct Canonicalized {
    pub series: TimeSeries,
    /// Rows dropped because their date was already seen.
    pub duplicates_dropped: usize,
}

/// Canonicalizer for per-instrument rows
pub struct Canonicalizer;

impl Canonicalizer {
    /// Sort rows by date and collapse duplicate dates.
    ///
    /// The sort is stable, so among rows sharing a date the earliest-listed
    /// one survives. Every field seen in any row becomes a column; cells a
    /// row does not carry are `None`.
    pub fn canonicalize(instrument: &str, mut rows: Vec<SeriesRow>) -> Canonicalized {
        rows.sort_by_key(|r| r.date);

        let field_names: BTreeSet<String> = rows
            .iter()
            .flat_map(|r| r.values.keys().cloned())
            .collect();

        let mut series = TimeSeries::new(instrument);
        for name in &field_names {
            series.fields.insert(name.clone(), Vec::with_capacity(rows.len()));
        }

        let mut duplicates_dropped = 0;
        for row in rows {
            if series.dates.last() == Some(&row.date) {
                duplicates_dropped += 1;
                continue;
            }
            series.dates.push(row.date);
            for (name, column) in series.fields.iter_mut() {
                column.push(row.values.get(name).copied().flatten().filter(|v| v.is_finite()));
            }
        }

        Canonicalized {
            series,
            duplicates_dropped,
        }
    }

    /// Canonicalise an already columnar series that may be unsorted or
    /// carry repeated dates.
    pub fn canonicalize_series(series: TimeSeries) -> Canonicalized {
        if series.dates.windows(2).all(|w| w[0] < w[1]) {
            return Canonicalized {
                series,
                duplicates_dropped: 0,
            };
        }
        let rows = series
            .dates
            .iter()
            .enumerate()
            .map(|(i, date)| SeriesRow {
                date: *date,
                values: series
                    .fields
                    .iter()
                    .map(|(name, column)| (name.clone(), column.get(i).copied().flatten()))
                    .collect(),
            })
            .collect();
        Self::canonicalize(&series.instrument, rows)
    }
}
