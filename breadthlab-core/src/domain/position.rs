use serde::{Deserialize, Serialize};

/// An open long holding. Exists only while held: quantity > 0 and entry_price > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub instrument: String,
    pub quantity: f64,
    /// Slipped price paid on entry.
    pub entry_price: f64,
}

impl Position {
    pub fn new(instrument: impl Into<String>, quantity: f64, entry_price: f64) -> Self {
        debug_assert!(quantity > 0.0 && entry_price > 0.0);
        Self {
            instrument: instrument.into(),
            quantity,
            entry_price,
        }
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.entry_price)
    }
}
