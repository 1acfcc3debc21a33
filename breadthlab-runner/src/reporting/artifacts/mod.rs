//! Artifact manager for persisting run outputs.
//!
//! Layout: `<output>/<run_id>/{equity.csv, equity.parquet, signals.csv,
//! kpi.csv, breadth.csv, manifest.json}`.

mod equity;
mod manifest;
mod tables;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::BacktestConfig;
use crate::runner::PipelineResult;

pub use equity::{write_equity_csv, write_equity_parquet};
pub use manifest::{write_manifest, RunManifest};
pub use tables::{write_breadth_csv, write_kpi_csv, write_signals_csv};

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub manifest: PathBuf,
    pub equity_csv: PathBuf,
    pub equity_parquet: Option<PathBuf>,
    pub signals_csv: PathBuf,
    pub kpi_csv: PathBuf,
    pub breadth_csv: PathBuf,
}

/// Manages writing all artifacts for a run.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
    parquet: bool,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create artifact output directory")?;
        Ok(Self {
            output_dir,
            parquet: true,
        })
    }

    pub fn with_parquet(mut self, parquet: bool) -> Self {
        self.parquet = parquet;
        self
    }

    /// Save complete run artifacts.
    pub fn save_run(&self, result: &PipelineResult, config: &BacktestConfig) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(&result.run_id);
        std::fs::create_dir_all(&run_dir)
            .context("Failed to create run artifact directory")?;

        let equity_csv = run_dir.join("equity.csv");
        write_equity_csv(&equity_csv, &result.equity)?;
        let equity_parquet = if self.parquet {
            let path = run_dir.join("equity.parquet");
            write_equity_parquet(&path, &result.equity)?;
            Some(path)
        } else {
            None
        };

        let signals_csv = run_dir.join("signals.csv");
        write_signals_csv(&signals_csv, &result.signals)?;

        let kpi_csv = run_dir.join("kpi.csv");
        write_kpi_csv(&kpi_csv, &result.kpi)?;

        let breadth_csv = run_dir.join("breadth.csv");
        write_breadth_csv(&breadth_csv, &result.breadth)?;

        let manifest_path = run_dir.join("manifest.json");
        write_manifest(&manifest_path, result, config)?;

        log::info!("Artifacts written to {}", run_dir.display());
        Ok(ArtifactPaths {
            run_dir,
            manifest: manifest_path,
            equity_csv,
            equity_parquet,
            signals_csv,
            kpi_csv,
            breadth_csv,
        })
    }
}

/// Write every artifact for `result` under the configured output directory.
pub fn save_artifacts(result: &PipelineResult, config: &BacktestConfig) -> Result<ArtifactPaths> {
    ArtifactManager::new(&config.output.dir)?
        .with_parquet(config.output.parquet)
        .save_run(result, config)
}
