//! Multi-instrument date alignment.
//!
//! Computes the canonical date axis for a set of series: the intersection
//! of every instrument's dates (common mode) or their union (union mode).
//! Cells for dates an instrument lacks are left as explicit "no value";
//! prices are never forward-filled.

use super::error::DataWarning;
use crate::domain::TimeSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How the date axis of a panel is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    /// Dates present in every instrument.
    #[default]
    Common,
    /// Dates present in any instrument.
    Union,
}

impl FromStr for AlignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(AlignMode::Common),
            "union" => Ok(AlignMode::Union),
            other => Err(format!("alignment mode must be 'common' or 'union', got '{other}'")),
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignMode::Common => write!(f, "common"),
            AlignMode::Union => write!(f, "union"),
        }
    }
}

/// Iterative pairwise intersection of every series' dates, ascending.
pub fn common_dates<'a, I>(series: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a TimeSeries>,
{
    let mut iter = series.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut common: BTreeSet<NaiveDate> = first.dates.iter().copied().collect();
    for ts in iter {
        let other: BTreeSet<NaiveDate> = ts.dates.iter().copied().collect();
        common = common.intersection(&other).copied().collect();
    }
    common.into_iter().collect()
}

/// Iterative pairwise union of every series' dates, ascending.
pub fn union_dates<'a, I>(series: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a TimeSeries>,
{
    let mut all = BTreeSet::new();
    for ts in series {
        all.extend(ts.dates.iter().copied());
    }
    all.into_iter().collect()
}

/// Resolve the date axis for `mode`.
///
/// An empty common axis falls back to the union axis and yields
/// `DataWarning::NoCommonDates`.
pub fn resolve_dates<'a, I>(series: I, mode: AlignMode) -> (Vec<NaiveDate>, Option<DataWarning>)
where
    I: IntoIterator<Item = &'a TimeSeries> + Clone,
{
    match mode {
        AlignMode::Union => (union_dates(series), None),
        AlignMode::Common => {
            let common = common_dates(series.clone());
            if common.is_empty() {
                log::warn!("No common dates found across all instruments, using union of dates");
                (union_dates(series), Some(DataWarning::NoCommonDates))
            } else {
                (common, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(name: &str, days: &[u32]) -> TimeSeries {
        let dates: Vec<NaiveDate> = days.iter().map(|x| d(*x)).collect();
        let closes: Vec<f64> = days.iter().map(|x| *x as f64).collect();
        TimeSeries::from_closes(name, &dates, &closes)
    }

    #[test]
    fn common_is_intersection() {
        let a = series("A", &[2, 3, 4]);
        let b = series("B", &[3, 4, 5]);
        assert_eq!(common_dates([&a, &b]), vec![d(3), d(4)]);
    }

    #[test]
    fn union_is_sorted_union() {
        let a = series("A", &[4, 2]);
        let b = series("B", &[3, 5]);
        assert_eq!(union_dates([&a, &b]), vec![d(2), d(3), d(4), d(5)]);
    }

    #[test]
    fn empty_common_falls_back_to_union_with_warning() {
        let a = series("A", &[2, 3]);
        let b = series("B", &[4, 5]);
        let (dates, warning) = resolve_dates([&a, &b], AlignMode::Common);
        assert_eq!(dates.len(), 4);
        assert_eq!(warning, Some(DataWarning::NoCommonDates));
    }

    #[test]
    fn single_series_no_alignment_needed() {
        let a = series("A", &[2, 3]);
        let (dates, warning) = resolve_dates([&a], AlignMode::Common);
        assert_eq!(dates, vec![d(2), d(3)]);
        assert!(warning.is_none());
    }

    #[test]
    fn align_mode_parses() {
        assert_eq!("union".parse::<AlignMode>().unwrap(), AlignMode::Union);
        assert!("outer".parse::<AlignMode>().is_err());
    }
}
