//! Run manifest export (JSON).

use anyhow::{Context, Result};
use breadthlab_core::analytics::RankWarning;
use breadthlab_core::data::DataWarning;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::BacktestConfig;
use crate::metrics::KpiReport;
use crate::runner::{Leaderboard, PipelineResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub run_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub dataset_hash: String,
    pub strategy: String,
    pub instruments: Vec<String>,
    pub num_dates: usize,
    pub num_signals: usize,
    pub num_executions: usize,
    pub skipped_signals: usize,
    pub config: BacktestConfig,
    pub kpi: KpiReport,
    pub leaders: Vec<Leaderboard>,
    pub data_warnings: Vec<DataWarning>,
    pub rank_warnings: Vec<RankWarning>,
}

pub fn write_manifest(path: &Path, result: &PipelineResult, config: &BacktestConfig) -> Result<()> {
    let manifest = RunManifest {
        schema_version: result.schema_version,
        run_id: result.run_id.clone(),
        timestamp: chrono::Utc::now(),
        dataset_hash: result.dataset_hash.clone(),
        strategy: result.strategy.clone(),
        instruments: result.instruments.clone(),
        num_dates: result.equity.len(),
        num_signals: result.signals.len(),
        num_executions: result.executions.len(),
        skipped_signals: result.skipped_signals,
        config: config.clone(),
        kpi: result.kpi.clone(),
        leaders: result.leaders.clone(),
        data_warnings: result.data_warnings.clone(),
        rank_warnings: result.rank_warnings.clone(),
    };

    let json = serde_json::to_string_pretty(&manifest)
        .context("Failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}
