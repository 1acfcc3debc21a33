//! CSV ingestion: one file per instrument, keyed by a `date` column.

use super::canonicalize::Canonicalizer;
use super::error::DataError;
use crate::domain::{SeriesRow, TimeSeries};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Name of the required date column.
pub const DATE_COLUMN: &str = "date";

/// A successfully ingested source.
#[derive(Debug)]
pub struct IngestedSource {
    pub source_name: String,
    pub series: TimeSeries,
    pub duplicates_dropped: usize,
    pub unparseable_dates: usize,
}

/// Read one instrument's CSV. The instrument id is the file stem.
pub fn read_csv(path: &Path) -> Result<IngestedSource, DataError> {
    let source_name = path.display().to_string();
    let instrument = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DataError::Ingest {
            source_name: source_name.clone(),
            reason: "file name is not valid UTF-8".into(),
        })?
        .to_string();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::Ingest {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

    frame_to_source(&instrument, &source_name, &df)
}

/// Convert a loaded frame into a canonical series.
///
/// Every non-date column that holds at least one number becomes a field.
/// Rows whose date cannot be parsed are dropped and counted.
pub fn frame_to_source(
    instrument: &str,
    source_name: &str,
    df: &DataFrame,
) -> Result<IngestedSource, DataError> {
    let ingest_err = |e: PolarsError| DataError::Ingest {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    };

    if df.height() == 0 {
        return Err(DataError::EmptySource(source_name.to_string()));
    }

    let date_col = df
        .column(DATE_COLUMN)
        .map_err(|_| DataError::MissingColumn {
            source_name: source_name.to_string(),
            column: DATE_COLUMN.to_string(),
        })?;
    let date_strings = date_col.cast(&DataType::String).map_err(ingest_err)?;
    let dates: Vec<Option<NaiveDate>> = date_strings
        .str()
        .map_err(ingest_err)?
        .into_iter()
        .map(|v| v.and_then(parse_date))
        .collect();

    let mut fields: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == DATE_COLUMN {
            continue;
        }
        let Ok(cast) = column.cast(&DataType::Float64) else {
            log::debug!("{source_name}: column '{name}' is not numeric, ignored");
            continue;
        };
        let values: Vec<Option<f64>> = cast.f64().map_err(ingest_err)?.into_iter().collect();
        if values.iter().all(|v| v.is_none()) {
            log::debug!("{source_name}: column '{name}' has no numeric values, ignored");
            continue;
        }
        fields.push((name.to_string(), values));
    }

    let mut rows = Vec::with_capacity(df.height());
    let mut unparseable_dates = 0;
    for (i, date) in dates.iter().enumerate() {
        let Some(date) = date else {
            unparseable_dates += 1;
            continue;
        };
        let mut row = SeriesRow::new(*date);
        for (name, values) in &fields {
            row.values.insert(name.clone(), values[i]);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataError::EmptySource(source_name.to_string()));
    }

    let canonical = Canonicalizer::canonicalize(instrument, rows);
    Ok(IngestedSource {
        source_name: source_name.to_string(),
        series: canonical.series,
        duplicates_dropped: canonical.duplicates_dropped,
        unparseable_dates,
    })
}

/// Read every `*.csv` file in `dir`, isolating failures per file.
///
/// Files are visited in sorted name order. Fails only when the directory
/// cannot be read or holds no CSV files at all.
pub fn read_csv_dir(
    dir: &Path,
) -> Result<Vec<(String, Result<IngestedSource, DataError>)>, DataError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(DataError::DataUnavailable(format!(
            "no CSV files found in folder '{}'",
            dir.display()
        )));
    }

    Ok(paths
        .into_iter()
        .map(|p| (p.display().to_string(), read_csv(&p)))
        .collect())
}

/// Parse a calendar date, stripping any time-of-day and timezone offset.
///
/// An offset is dropped without conversion, so the wall-clock date as
/// written in the source is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_local().date());
    }
    NaiveDate::parse_from_str(s, "%Y/%m/%d").ok()
}
