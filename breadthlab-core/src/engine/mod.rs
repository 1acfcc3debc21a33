//! Simulation Engine: sequential, state-carrying replay of a signal stream.
//!
//! The engine walks the panel's date axis once, in ascending order. On each
//! date it applies that date's signals against cash and open positions, then
//! marks the portfolio to market and appends one equity point.

pub mod simulator;
pub mod slippage;
pub mod state;

pub use simulator::{Simulator, ALLOCATION_FRACTION};
pub use slippage::LinearSlippage;
pub use state::{Execution, SimulationConfig, SimulationRun};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("panel has no '{0}' field")]
    MissingField(String),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}
