//! Domain types for breadthlab

pub mod equity;
pub mod portfolio;
pub mod position;
pub mod series;
pub mod signal;

pub use equity::EquityPoint;
pub use portfolio::Portfolio;
pub use position::Position;
pub use series::{SeriesRow, TimeSeries};
pub use signal::{Direction, SignalEntry};

/// Instrument identifier (ticker).
pub type Instrument = String;
