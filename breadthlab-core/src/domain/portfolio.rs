//! Portfolio — cash plus all open positions.

use super::position::Position;
use std::collections::BTreeMap;

/// Aggregate simulation state.
///
/// Positions are kept in a `BTreeMap` so that mark-to-market sums always
/// visit instruments in the same order and re-runs are bit-for-bit identical.
/// The accounting identity `equity == cash + sum(position market values)`
/// holds after every simulated date.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: BTreeMap<String, Position>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: BTreeMap::new(),
        }
    }

    /// Total equity = cash + sum of position market values.
    ///
    /// `price_of` returns the current close; when it has none the position
    /// is valued at its entry price.
    pub fn equity<F>(&self, price_of: F) -> f64
    where
        F: Fn(&str) -> Option<f64>,
    {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(instrument, pos)| {
                let price = price_of(instrument).unwrap_or(pos.entry_price);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    pub fn has_position(&self, instrument: &str) -> bool {
        self.positions.contains_key(instrument)
    }

    pub fn get_position(&self, instrument: &str) -> Option<&Position> {
        self.positions.get(instrument)
    }

    pub fn open(&mut self, position: Position) {
        self.positions.insert(position.instrument.clone(), position);
    }

    pub fn close(&mut self, instrument: &str) -> Option<Position> {
        self.positions.remove(instrument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_with_no_positions() {
        let portfolio = Portfolio::new(100_000.0);
        assert_eq!(portfolio.equity(|_| None), 100_000.0);
    }

    #[test]
    fn equity_with_position() {
        let mut portfolio = Portfolio::new(90_000.0);
        portfolio.open(Position::new("SPY", 100.0, 100.0));
        // 90_000 + 100 * 110 = 101_000
        assert_eq!(portfolio.equity(|_| Some(110.0)), 101_000.0);
    }

    #[test]
    fn missing_price_falls_back_to_entry() {
        let mut portfolio = Portfolio::new(90_000.0);
        portfolio.open(Position::new("SPY", 100.0, 100.0));
        assert_eq!(portfolio.equity(|_| None), 100_000.0);
    }

    #[test]
    fn open_and_close() {
        let mut portfolio = Portfolio::new(100_000.0);
        assert!(!portfolio.has_position("SPY"));
        portfolio.open(Position::new("SPY", 1.0, 100.0));
        assert!(portfolio.has_position("SPY"));
        assert!(portfolio.close("SPY").is_some());
        assert!(portfolio.get_position("SPY").is_none());
    }
}
