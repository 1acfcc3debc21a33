//! BreadthLab Runner — configuration, pipeline orchestration, KPIs and artifacts.
//!
//! This crate builds on `breadthlab-core` to provide:
//! - TOML run configuration with defaults and validation
//! - Folder loading with a dataset fingerprint
//! - The end-to-end pipeline (breadth, leaders, signals, simulation, KPIs)
//! - Artifact export (CSV, Parquet, JSON manifest)

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod reporting;
pub mod runner;

pub use config::{
    BacktestConfig, BreadthConfig, ConfigError, DataConfig, OutputConfig, RankingConfig,
    StrategyConfig,
};
pub use data_loader::{load_panel, LoadedData};
pub use metrics::{KpiReport, MetricsError};
pub use reporting::{save_artifacts, ArtifactManager, ArtifactPaths, RunManifest};
pub use runner::{
    build_source, run_on_data, run_pipeline, Leaderboard, PipelineResult, RunError,
    SCHEMA_VERSION,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<BacktestConfig>();
        assert_sync::<BacktestConfig>();
        assert_send::<StrategyConfig>();
        assert_sync::<StrategyConfig>();
    }

    #[test]
    fn pipeline_result_is_send_sync() {
        assert_send::<PipelineResult>();
        assert_sync::<PipelineResult>();
    }

    #[test]
    fn kpi_report_is_send_sync() {
        assert_send::<KpiReport>();
        assert_sync::<KpiReport>();
    }

    #[test]
    fn loaded_data_is_send_sync() {
        assert_send::<LoadedData>();
        assert_sync::<LoadedData>();
    }
}
