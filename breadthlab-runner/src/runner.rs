//! Pipeline runner: wires together data, analytics, strategy, simulation and KPIs.
//!
//! Two entry points:
//! - `run_pipeline()`: loads the configured folder, then runs. Used by the CLI.
//! - `run_on_data()`: takes an already loaded panel. Used by tests and callers
//!   that reuse one dataset across several configs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use breadthlab_core::analytics::{
    top_n, AnalyticsError, BreadthEngine, BreadthTable, RankWarning, RankingEngine, TopN,
};
use breadthlab_core::data::{DataError, DataWarning};
use breadthlab_core::domain::{EquityPoint, SignalEntry};
use breadthlab_core::engine::{EngineError, Execution, Simulator};
use breadthlab_core::signals::{SignalSource, SmaCrossover};

use crate::config::{BacktestConfig, ConfigError, StrategyConfig};
use crate::data_loader::{load_panel, LoadedData};
use crate::metrics::{KpiReport, MetricsError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("simulation error: {0}")]
    Engine(#[from] EngineError),
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

const CLOSE: &str = "close";

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Leaders for one ranking metric on its latest date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub metric: String,
    pub top: TopN,
}

/// Complete result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub schema_version: u32,
    pub run_id: String,
    pub dataset_hash: String,
    pub strategy: String,
    pub instruments: Vec<String>,
    pub equity: Vec<EquityPoint>,
    pub signals: Vec<SignalEntry>,
    pub executions: Vec<Execution>,
    pub skipped_signals: usize,
    pub breadth: BreadthTable,
    pub leaders: Vec<Leaderboard>,
    pub kpi: KpiReport,
    pub data_warnings: Vec<DataWarning>,
    pub rank_warnings: Vec<RankWarning>,
}

/// Run the full pipeline from the configured data folder.
pub fn run_pipeline(config: &BacktestConfig) -> Result<PipelineResult, RunError> {
    config.validate()?;
    let loaded = load_panel(&config.data)?;
    run_on_data(config, &loaded)
}

/// Run the pipeline on pre-loaded data.
pub fn run_on_data(config: &BacktestConfig, loaded: &LoadedData) -> Result<PipelineResult, RunError> {
    config.validate()?;
    let run_id = config.run_id()?;
    let panel = &loaded.build.panel;
    if panel.defined_count(CLOSE) == 0 {
        log::warn!("No valid close price data found in the loaded universe");
        return Err(DataError::DataUnavailable("no valid close price data found".into()).into());
    }

    // Step 1: breadth
    let breadth =
        BreadthEngine::new(panel)?.compute_multi(&config.breadth.windows, config.breadth.min_stocks)?;

    // Step 2: ranking leaders (informational)
    let (leaders, rank_warnings) = rank_leaders(config, loaded)?;

    // Step 3: signals
    let source = build_source(&config.strategy)?;
    let signals = source.generate(panel, Some(&breadth));

    // Step 4: simulate
    let run = Simulator::new(config.simulation).run(panel, &signals)?;

    // Step 5: KPIs
    let kpi = KpiReport::from_points(&run.equity)?;
    log::info!(
        "Run {run_id}: total return {:.2}%, max drawdown {:.2}%",
        kpi.total_return * 100.0,
        kpi.max_drawdown * 100.0
    );

    Ok(PipelineResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id.to_string(),
        dataset_hash: loaded.dataset_hash.to_string(),
        strategy: source.name().to_string(),
        instruments: panel.instruments().to_vec(),
        equity: run.equity,
        signals,
        executions: run.executions,
        skipped_signals: run.skipped_signals,
        breadth,
        leaders,
        kpi,
        data_warnings: loaded.build.warnings.clone(),
        rank_warnings,
    })
}

/// Instantiate the configured signal source.
pub fn build_source(config: &StrategyConfig) -> Result<Box<dyn SignalSource>, AnalyticsError> {
    match config {
        StrategyConfig::SmaCrossover { short, long } => {
            Ok(Box::new(SmaCrossover::new(*short, *long)?))
        }
    }
}

fn rank_leaders(
    config: &BacktestConfig,
    loaded: &LoadedData,
) -> Result<(Vec<Leaderboard>, Vec<RankWarning>), AnalyticsError> {
    let panel = &loaded.build.panel;
    let engine = RankingEngine::new(panel);
    let n = config.ranking.top_n;
    let mut boards = Vec::new();

    boards.push(Leaderboard {
        metric: format!("momentum_{}", config.ranking.momentum_period),
        top: top_n(&engine.momentum(config.ranking.momentum_period)?, n, None),
    });
    if panel.has_field("volume") {
        boards.push(Leaderboard {
            metric: format!("volume_{}", config.ranking.volume_period),
            top: top_n(&engine.volume_rank(config.ranking.volume_period)?, n, None),
        });
    } else {
        log::warn!("No volume field loaded, skipping volume ranking");
    }
    if let Some(benchmark) = &config.ranking.benchmark {
        let rs = engine.relative_strength(benchmark, config.ranking.rs_method)?;
        boards.push(Leaderboard {
            metric: format!("rs_{}_{benchmark}", config.ranking.rs_method),
            top: top_n(&rs, n, None),
        });
    }

    let warnings = boards
        .iter()
        .flat_map(|b| b.top.warnings.iter().cloned())
        .collect();
    Ok((boards, warnings))
}
