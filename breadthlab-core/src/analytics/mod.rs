//! Cross-sectional analytics over an immutable `Panel`.
//!
//! - `breadth`: one market-breadth row per date
//! - `ranking`: per-instrument metric tables and top-N leader extraction
//! - `table`: the (date × instrument) metric table both produce or consume

pub mod breadth;
pub mod ranking;
pub mod table;

pub use breadth::{BreadthEngine, BreadthRow, BreadthTable};
pub use ranking::{top_n, RankWarning, RankingEngine, RsMethod, TopN};
pub use table::MetricTable;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the analytics engines.
///
/// Undefined ratios are never errors; they surface as `None` cells.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{what} '{name}' not found")]
    NotFound { what: &'static str, name: String },

    #[error("panel has no '{0}' field")]
    MissingField(String),

    #[error("date {0} not found")]
    DateNotFound(NaiveDate),
}

pub(crate) fn require_field(panel: &crate::data::Panel, field: &str) -> Result<(), AnalyticsError> {
    if panel.has_field(field) {
        Ok(())
    } else {
        Err(AnalyticsError::MissingField(field.to_string()))
    }
}

pub(crate) fn require_period(what: &str, period: usize) -> Result<(), AnalyticsError> {
    if period == 0 {
        Err(AnalyticsError::InvalidParameter(format!(
            "{what} must be positive, got 0"
        )))
    } else {
        Ok(())
    }
}
