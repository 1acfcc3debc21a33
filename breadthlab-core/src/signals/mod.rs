//! Signal sources: strategies that turn a panel into a signal stream.
//!
//! The simulator treats whatever a source returns as an opaque, read-only
//! stream of (date, instrument, direction) triples.

pub mod sma_crossover;

pub use sma_crossover::SmaCrossover;

use crate::analytics::BreadthTable;
use crate::data::Panel;
use crate::domain::SignalEntry;

/// A strategy producing signals from market data.
///
/// Implementations must be pure: the same panel yields the same stream.
pub trait SignalSource: Send + Sync {
    /// Short identifier, e.g. "sma_20_50".
    fn name(&self) -> &str;

    /// Signals ordered by date, then instrument.
    fn generate(&self, panel: &Panel, breadth: Option<&BreadthTable>) -> Vec<SignalEntry>;
}
