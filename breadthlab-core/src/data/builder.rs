//! Panel Builder — turns ragged per-instrument series into one aligned `Panel`.
//!
//! Sources are pushed one at a time, each either a loaded series or the
//! error it failed with. Failures are isolated: a bad source becomes a
//! `DataWarning::SourceSkipped` and the build only fails when nothing loaded.

use super::align::{common_dates, resolve_dates, union_dates, AlignMode};
use super::canonicalize::{Canonicalized, Canonicalizer};
use super::error::{DataError, DataWarning};
use super::ingest::{read_csv_dir, IngestedSource};
use super::panel::Panel;
use crate::domain::TimeSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Collects sources and builds a `Panel`.
#[derive(Debug, Default)]
pub struct PanelBuilder {
    mode: AlignMode,
    fields: Option<Vec<String>>,
    series: BTreeMap<String, TimeSeries>,
    warnings: Vec<DataWarning>,
}

/// A built panel plus the canonical series it came from and every warning raised.
#[derive(Debug, Clone)]
pub struct PanelBuild {
    pub panel: Panel,
    pub series: BTreeMap<String, TimeSeries>,
    pub warnings: Vec<DataWarning>,
    pub mode: AlignMode,
}

/// Overview of the loaded universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub instruments: Vec<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub common_dates: usize,
    pub union_dates: usize,
    /// instrument → (rows, fields)
    pub shapes: BTreeMap<String, (usize, usize)>,
}

impl PanelBuilder {
    pub fn new(mode: AlignMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Restrict the panel to these fields, in any order.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = fields.into_iter().map(Into::into).collect();
        list.sort();
        list.dedup();
        self.fields = Some(list);
        self
    }

    /// Add one instrument's series. Rows are sorted by date and repeated
    /// dates keep the earliest-listed row. A later series with the same
    /// instrument id replaces the earlier one.
    pub fn push_series(&mut self, series: TimeSeries) {
        if series.is_empty() {
            self.skip(&series.instrument, "series contains no rows".into());
            return;
        }
        let Canonicalized {
            series,
            duplicates_dropped,
        } = Canonicalizer::canonicalize_series(series);
        if duplicates_dropped > 0 {
            log::warn!(
                "Duplicate dates found in {}, keeping first occurrence ({duplicates_dropped} dropped)",
                series.instrument
            );
            self.warnings.push(DataWarning::DuplicateDates {
                instrument: series.instrument.clone(),
                dropped: duplicates_dropped,
            });
        }
        self.series.insert(series.instrument.clone(), series);
    }

    /// Add the outcome of ingesting one source.
    pub fn push_source(&mut self, source_name: &str, outcome: Result<IngestedSource, DataError>) {
        match outcome {
            Ok(ingested) => {
                let instrument = ingested.series.instrument.clone();
                if ingested.duplicates_dropped > 0 {
                    log::warn!(
                        "Duplicate dates found in {source_name}, keeping first occurrence ({} dropped)",
                        ingested.duplicates_dropped
                    );
                    self.warnings.push(DataWarning::DuplicateDates {
                        instrument: instrument.clone(),
                        dropped: ingested.duplicates_dropped,
                    });
                }
                if ingested.unparseable_dates > 0 {
                    log::warn!(
                        "{source_name}: {} row(s) with unparseable dates dropped",
                        ingested.unparseable_dates
                    );
                    self.warnings.push(DataWarning::UnparseableDates {
                        instrument,
                        dropped: ingested.unparseable_dates,
                    });
                }
                self.push_series(ingested.series);
            }
            Err(e) => self.skip(source_name, e.to_string()),
        }
    }

    /// Ingest every CSV in `dir`.
    pub fn push_csv_dir(&mut self, dir: &Path) -> Result<(), DataError> {
        for (name, outcome) in read_csv_dir(dir)? {
            self.push_source(&name, outcome);
        }
        Ok(())
    }

    fn skip(&mut self, source_name: &str, reason: String) {
        log::warn!("Error loading {source_name}: {reason}");
        self.warnings.push(DataWarning::SourceSkipped {
            source_name: source_name.to_string(),
            reason,
        });
    }

    /// Align all loaded series onto one date axis.
    ///
    /// Fails with `DataError::DataUnavailable` when no source loaded.
    pub fn build(self) -> Result<PanelBuild, DataError> {
        let PanelBuilder {
            mode,
            fields,
            series,
            mut warnings,
        } = self;

        let skipped = warnings
            .iter()
            .filter(|w| matches!(w, DataWarning::SourceSkipped { .. }))
            .count();
        if skipped > 0 {
            log::warn!("Failed to load {skipped} source(s)");
        }
        if series.is_empty() {
            return Err(DataError::DataUnavailable(
                "no valid data sources were loaded".into(),
            ));
        }

        let (dates, alignment_warning) = resolve_dates(series.values(), mode);
        warnings.extend(alignment_warning);

        let field_axis: Vec<String> = match &fields {
            Some(requested) => {
                for ts in series.values() {
                    let missing: Vec<String> = requested
                        .iter()
                        .filter(|f| !ts.has_field(f))
                        .cloned()
                        .collect();
                    if !missing.is_empty() {
                        log::warn!("Columns {missing:?} not found in {}", ts.instrument);
                        warnings.push(DataWarning::MissingFields {
                            instrument: ts.instrument.clone(),
                            fields: missing,
                        });
                    }
                }
                requested.clone()
            }
            None => {
                let mut all: Vec<String> = series
                    .values()
                    .flat_map(|ts| ts.field_names().map(str::to_string))
                    .collect();
                all.sort();
                all.dedup();
                all
            }
        };

        let instruments: Vec<String> = series.keys().cloned().collect();
        let width = instruments.len();
        let date_pos: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut cells: BTreeMap<String, Vec<Option<f64>>> = field_axis
            .iter()
            .map(|f| (f.clone(), vec![None; dates.len() * width]))
            .collect();

        for (ii, ts) in series.values().enumerate() {
            for (row, date) in ts.dates.iter().enumerate() {
                let Some(&di) = date_pos.get(date) else {
                    continue;
                };
                for (field, grid) in cells.iter_mut() {
                    grid[di * width + ii] = ts.value(field, row);
                }
            }
        }

        let panel = Panel::from_parts(dates, instruments, cells);
        log::info!(
            "Panel built: {} dates x {} instruments, {} field(s), mode={mode}",
            panel.dates().len(),
            panel.instruments().len(),
            field_axis.len()
        );

        Ok(PanelBuild {
            panel,
            series,
            warnings,
            mode,
        })
    }
}

impl PanelBuild {
    /// Load every CSV in `dir` and build with `mode`.
    pub fn from_csv_dir(
        dir: &Path,
        mode: AlignMode,
        fields: Option<&[String]>,
    ) -> Result<Self, DataError> {
        let mut builder = PanelBuilder::new(mode);
        if let Some(fields) = fields {
            builder = builder.with_fields(fields.iter().cloned());
        }
        builder.push_csv_dir(dir)?;
        builder.build()
    }

    /// The canonical (pre-alignment) series for one instrument.
    pub fn series(&self, instrument: &str) -> Result<&TimeSeries, DataError> {
        self.series
            .get(instrument)
            .ok_or_else(|| DataError::InstrumentNotFound {
                instrument: instrument.to_string(),
                available: self.series.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }

    /// Earliest and latest date across all loaded series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.series.values().filter_map(|s| s.first_date()).min()?;
        let last = self.series.values().filter_map(|s| s.last_date()).max()?;
        Some((first, last))
    }

    pub fn summary(&self) -> DataSummary {
        let range = self.date_range();
        DataSummary {
            instruments: self.series.keys().cloned().collect(),
            first_date: range.map(|r| r.0),
            last_date: range.map(|r| r.1),
            common_dates: common_dates(self.series.values()).len(),
            union_dates: union_dates(self.series.values()).len(),
            shapes: self
                .series
                .iter()
                .map(|(k, s)| (k.clone(), (s.len(), s.fields.len())))
                .collect(),
        }
    }
}
