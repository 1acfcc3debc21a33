//! Serializable backtest configuration (TOML).
//!
//! Every key has a default, so an empty document is a valid config:
//!
//! ```toml
//! [data]
//! dir = "data"
//! align = "common"
//!
//! [simulation]
//! initial_cash = 1000000.0
//! slippage = 0.001
//!
//! [breadth]
//! windows = [20, 50, 200]
//!
//! [ranking]
//! benchmark = "NIFTY50"
//!
//! [strategy]
//! type = "sma_crossover"
//! short = 20
//! long = 50
//! ```

use breadthlab_core::analytics::RsMethod;
use breadthlab_core::data::AlignMode;
use breadthlab_core::engine::SimulationConfig;
use breadthlab_core::fingerprint::RunId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestConfig {
    pub data: DataConfig,
    pub simulation: SimulationConfig,
    pub breadth: BreadthConfig,
    pub ranking: RankingConfig,
    pub strategy: StrategyConfig,
    pub output: OutputConfig,
}

/// Where instrument CSVs live and how they are aligned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub align: AlignMode,
    /// Field allowlist; all numeric columns when absent.
    pub fields: Option<Vec<String>>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            align: AlignMode::Common,
            fields: None,
        }
    }
}

/// Breadth windows; the first entry is the base window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BreadthConfig {
    pub windows: Vec<usize>,
    pub min_stocks: usize,
}

impl Default for BreadthConfig {
    fn default() -> Self {
        Self {
            windows: vec![50],
            min_stocks: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    pub momentum_period: usize,
    pub volume_period: usize,
    /// Relative strength is skipped when no benchmark is set.
    pub benchmark: Option<String>,
    pub rs_method: RsMethod,
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            momentum_period: 5,
            volume_period: 5,
            benchmark: None,
            rs_method: RsMethod::Cumulative,
            top_n: 10,
        }
    }
}

/// Signal source selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Moving average crossover: enter when the short SMA crosses above the long SMA.
    SmaCrossover {
        #[serde(default = "default_short")]
        short: usize,
        #[serde(default = "default_long")]
        long: usize,
    },
}

fn default_short() -> usize {
    20
}

fn default_long() -> usize {
    50
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::SmaCrossover {
            short: default_short(),
            long: default_long(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub parquet: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            parquet: true,
        }
    }
}

impl BacktestConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject settings no engine can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.breadth.windows.is_empty() {
            return Err(ConfigError::Invalid("breadth.windows cannot be empty".into()));
        }
        if self.breadth.windows.contains(&0) {
            return Err(ConfigError::Invalid("breadth.windows must be positive".into()));
        }
        if self.ranking.momentum_period == 0 || self.ranking.volume_period == 0 {
            return Err(ConfigError::Invalid(
                "ranking periods must be positive".into(),
            ));
        }
        match self.strategy {
            StrategyConfig::SmaCrossover { short, long } if short == 0 || short >= long => {
                Err(ConfigError::Invalid(format!(
                    "strategy needs 0 < short < long, got short={short}, long={long}"
                )))
            }
            StrategyConfig::SmaCrossover { .. } => Ok(()),
        }
    }

    /// Deterministic identifier: BLAKE3 of the canonical JSON form.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        Ok(RunId::of_config(self)?)
    }
}
