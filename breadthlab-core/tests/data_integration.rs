//! Integration tests for the data pipeline: CSV folder → aligned panel.

use breadthlab_core::data::{AlignMode, DataError, DataWarning, PanelBuild, PanelKey};
use chrono::NaiveDate;
use std::path::Path;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "AAA.csv",
        "date,open,close,volume\n\
         2024-01-02,10,10.5,100\n\
         2024-01-03,10.5,11.0,120\n\
         2024-01-04,11,11.5,130\n\
         2024-01-05,11.5,12.0,90\n",
    );
    // unsorted, with a duplicate date and a timezone-stamped row
    write(
        dir.path(),
        "BBB.csv",
        "date,close,volume\n\
         2024-01-04 00:00:00+05:30,21.0,300\n\
         2024-01-02,20.0,200\n\
         2024-01-03,20.5,250\n\
         2024-01-03,99.0,999\n",
    );
    write(dir.path(), "EMPTY.csv", "date,close\n");
    write(dir.path(), "NODATE.csv", "day,close\n2024-01-02,1\n");
    dir
}

#[test]
fn common_mode_builds_intersection_panel() {
    let dir = fixture();
    let built = PanelBuild::from_csv_dir(dir.path(), AlignMode::Common, None).unwrap();
    let panel = &built.panel;

    assert_eq!(panel.instruments(), &["AAA".to_string(), "BBB".to_string()]);
    assert_eq!(panel.dates(), &[d(2), d(3), d(4)]);
    assert_eq!(panel.len(), 6);
    // duplicate kept first occurrence
    assert_eq!(panel.get(d(3), "BBB", "close"), Some(20.5));
    // union of fields, absent field is "no value"
    assert!(panel.has_field("open"));
    assert_eq!(panel.get(d(2), "BBB", "open"), None);
    assert!(panel.contains_key(&PanelKey::new(d(2), "BBB")));
}

#[test]
fn union_mode_keeps_every_key() {
    let dir = fixture();
    let built = PanelBuild::from_csv_dir(dir.path(), AlignMode::Union, None).unwrap();
    let panel = &built.panel;
    assert_eq!(panel.dates().len(), 4);
    assert!(panel.contains_key(&PanelKey::new(d(5), "BBB")));
    assert_eq!(panel.get(d(5), "BBB", "close"), None);
    assert_eq!(panel.get(d(5), "AAA", "close"), Some(12.0));
}

#[test]
fn bad_sources_are_reported_not_fatal() {
    let dir = fixture();
    let built = PanelBuild::from_csv_dir(dir.path(), AlignMode::Common, None).unwrap();
    let skipped: Vec<&DataWarning> = built
        .warnings
        .iter()
        .filter(|w| matches!(w, DataWarning::SourceSkipped { .. }))
        .collect();
    assert_eq!(skipped.len(), 2);
    assert!(built
        .warnings
        .iter()
        .any(|w| matches!(w, DataWarning::DuplicateDates { dropped: 1, .. })));
}

#[test]
fn field_allowlist_restricts_fields() {
    let dir = fixture();
    let fields = vec!["close".to_string()];
    let built = PanelBuild::from_csv_dir(dir.path(), AlignMode::Common, Some(&fields)).unwrap();
    assert_eq!(built.panel.fields().collect::<Vec<_>>(), vec!["close"]);
}

#[test]
fn all_sources_failing_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "EMPTY.csv", "date,close\n");
    let err = PanelBuild::from_csv_dir(dir.path(), AlignMode::Common, None).unwrap_err();
    assert!(matches!(err, DataError::DataUnavailable(_)));
}

#[test]
fn missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err =
        PanelBuild::from_csv_dir(&dir.path().join("nope"), AlignMode::Common, None).unwrap_err();
    assert!(matches!(err, DataError::Io(_)));
}

#[test]
fn summary_describes_universe() {
    let dir = fixture();
    let built = PanelBuild::from_csv_dir(dir.path(), AlignMode::Common, None).unwrap();
    let summary = built.summary();
    assert_eq!(summary.instruments.len(), 2);
    assert_eq!(summary.first_date, Some(d(2)));
    assert_eq!(summary.last_date, Some(d(5)));
    assert_eq!(summary.common_dates, 3);
    assert_eq!(summary.union_dates, 4);
    assert_eq!(summary.shapes["AAA"], (4, 3));
    assert_eq!(built.series("BBB").unwrap().len(), 3);
}
