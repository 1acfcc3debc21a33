//! Flat table exports: signals, KPI summary, breadth.

use anyhow::{Context, Result};
use breadthlab_core::analytics::BreadthTable;
use breadthlab_core::domain::SignalEntry;
use std::path::Path;

use crate::metrics::KpiReport;

pub fn write_signals_csv(path: &Path, signals: &[SignalEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create signals CSV {}", path.display()))?;
    // header even when the stream is empty
    if signals.is_empty() {
        writer.write_record(["date", "instrument", "direction"])?;
    }
    for signal in signals {
        writer.serialize(signal)?;
    }
    writer.flush()?;
    Ok(())
}

/// One-row KPI summary. An undefined Sharpe is an empty cell.
pub fn write_kpi_csv(path: &Path, kpi: &KpiReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create KPI CSV {}", path.display()))?;
    writer.serialize(kpi)?;
    writer.flush()?;
    Ok(())
}

/// One row per date; undefined values are empty cells.
pub fn write_breadth_csv(path: &Path, breadth: &BreadthTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create breadth CSV {}", path.display()))?;

    let mut header = vec!["date".to_string()];
    header.extend(breadth.column_names());
    writer.write_record(&header)?;

    fn cell<T: ToString>(v: Option<T>) -> String {
        v.map(|x| x.to_string()).unwrap_or_default()
    }

    for row in &breadth.rows {
        let mut record = vec![
            row.date.to_string(),
            cell(row.advancers),
            cell(row.decliners),
            cell(row.unchanged),
            cell(row.total_stocks),
            cell(row.advance_ratio),
            cell(row.pct_above_sma),
            cell(row.valid_for_sma),
        ];
        record.extend(row.extra_windows.iter().map(|(_, v)| cell(*v)));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
