//! Simulation configuration and run result types.

use super::EngineError;
use crate::domain::{Direction, EquityPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configuration for a single simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_cash: f64,
    /// Linear slippage fraction applied on entry and exit.
    pub slippage: f64,
    /// Carried with the run but not charged.
    pub commission: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_cash: 1_000_000.0,
            slippage: 0.001,
            commission: 0.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if !self.slippage.is_finite() || !(0.0..1.0).contains(&self.slippage) {
            return Err(EngineError::InvalidConfig(format!(
                "slippage must be in [0, 1), got {}",
                self.slippage
            )));
        }
        if !self.commission.is_finite() || self.commission < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "commission must be >= 0, got {}",
                self.commission
            )));
        }
        Ok(())
    }
}

/// One applied trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub date: NaiveDate,
    pub instrument: String,
    pub side: Direction,
    pub quantity: f64,
    /// Fill price after slippage.
    pub price: f64,
    pub cash_after: f64,
}

/// Output of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    /// One point per panel date, ascending.
    pub equity: Vec<EquityPoint>,
    pub executions: Vec<Execution>,
    /// Signals that were not applied: off-axis dates, missing closes,
    /// duplicates, or enter/exit preconditions not met.
    pub skipped_signals: usize,
    pub final_cash: f64,
    /// Instruments still held after the last date.
    pub open_positions: Vec<String>,
}

impl SimulationRun {
    pub fn final_equity(&self) -> Option<f64> {
        self.equity.last().map(|p| p.equity)
    }
}
