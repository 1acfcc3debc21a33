//! Structured error and warning types for the data layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from ingestion and panel construction.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("failed to ingest '{source_name}': {reason}")]
    Ingest { source_name: String, reason: String },

    #[error("source '{0}' contains no rows")]
    EmptySource(String),

    #[error("source '{source_name}' is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("instrument '{instrument}' not found (available: {available})")]
    InstrumentNotFound {
        instrument: String,
        available: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable conditions surfaced while building a panel.
///
/// None of these abort the build; they are returned next to the result
/// and logged at warn level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// A source failed to load and was left out of the instrument axis.
    SourceSkipped { source_name: String, reason: String },
    /// Duplicate dates were collapsed, keeping the earliest-listed row.
    DuplicateDates { instrument: String, dropped: usize },
    /// Rows whose date could not be parsed were dropped.
    UnparseableDates { instrument: String, dropped: usize },
    /// Requested fields not present for an instrument.
    MissingFields {
        instrument: String,
        fields: Vec<String>,
    },
    /// Common-mode alignment found no shared dates; the union axis was used.
    NoCommonDates,
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataWarning::SourceSkipped {
                source_name,
                reason,
            } => write!(f, "skipped source {source_name}: {reason}"),
            DataWarning::DuplicateDates {
                instrument,
                dropped,
            } => write!(
                f,
                "{instrument}: {dropped} duplicate date row(s) dropped, kept first occurrence"
            ),
            DataWarning::UnparseableDates {
                instrument,
                dropped,
            } => write!(f, "{instrument}: {dropped} row(s) with unparseable dates dropped"),
            DataWarning::MissingFields { instrument, fields } => {
                write!(f, "{instrument}: fields {fields:?} not found")
            }
            DataWarning::NoCommonDates => {
                write!(f, "no common dates across instruments, using union of dates")
            }
        }
    }
}
