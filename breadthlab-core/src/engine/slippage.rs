//! Linear slippage: a fixed fraction of the close charged against the trader.
//!
//! Buys fill at `close * (1 + fraction)`, sells at `close * (1 - fraction)`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSlippage {
    pub fraction: f64,
}

impl LinearSlippage {
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    pub fn buy_price(&self, close: f64) -> f64 {
        close * (1.0 + self.fraction)
    }

    pub fn sell_price(&self, close: f64) -> f64 {
        close * (1.0 - self.fraction)
    }
}

impl Default for LinearSlippage {
    fn default() -> Self {
        Self::new(0.001)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slippage_works_against_the_trader() {
        let slip = LinearSlippage::new(0.001);
        assert!((slip.buy_price(100.0) - 100.1).abs() < 1e-10);
        assert!((slip.sell_price(100.0) - 99.9).abs() < 1e-10);
    }

    #[test]
    fn zero_slippage_is_frictionless() {
        let slip = LinearSlippage::new(0.0);
        assert_eq!(slip.buy_price(42.0), 42.0);
        assert_eq!(slip.sell_price(42.0), 42.0);
    }
}
