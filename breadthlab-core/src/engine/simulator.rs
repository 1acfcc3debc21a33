//! Date-by-date simulation over a panel and a signal stream.

use super::slippage::LinearSlippage;
use super::state::{Execution, SimulationConfig, SimulationRun};
use super::EngineError;
use crate::data::Panel;
use crate::domain::{Direction, EquityPoint, Portfolio, Position, SignalEntry};
use std::collections::BTreeMap;

/// Fraction of current cash committed to each new position.
pub const ALLOCATION_FRACTION: f64 = 0.1;

const CLOSE: &str = "close";

/// Replays signals against a panel's closes.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation.
    ///
    /// Signals are grouped per date; within a date instruments are handled in
    /// ascending identifier order and only the first signal per instrument
    /// counts. An enter for a held instrument, an exit for one not held, a
    /// signal without a close that day, or a signal dated off the panel axis
    /// is skipped.
    pub fn run(&self, panel: &Panel, signals: &[SignalEntry]) -> Result<SimulationRun, EngineError> {
        self.config.validate()?;
        if !panel.has_field(CLOSE) {
            return Err(EngineError::MissingField(CLOSE.into()));
        }

        let mut skipped = 0usize;
        let mut by_date: BTreeMap<usize, BTreeMap<&str, Direction>> = BTreeMap::new();
        for signal in signals {
            let Some(di) = panel.date_position(signal.date) else {
                skipped += 1;
                continue;
            };
            let day = by_date.entry(di).or_default();
            if day.contains_key(signal.instrument.as_str()) {
                skipped += 1;
            } else {
                day.insert(signal.instrument.as_str(), signal.direction);
            }
        }

        let slippage = LinearSlippage::new(self.config.slippage);
        let mut portfolio = Portfolio::new(self.config.initial_cash);
        let mut equity = Vec::with_capacity(panel.dates().len());
        let mut executions = Vec::new();

        for (di, date) in panel.dates().iter().enumerate() {
            let close_of = |instrument: &str| {
                panel
                    .instrument_position(instrument)
                    .and_then(|ii| panel.value_at(CLOSE, di, ii))
            };

            for (&instrument, &direction) in by_date.get(&di).into_iter().flatten() {
                let Some(close) = close_of(instrument).filter(|c| *c > 0.0) else {
                    skipped += 1;
                    continue;
                };
                match direction {
                    Direction::Enter if !portfolio.has_position(instrument) => {
                        let allocated = portfolio.cash * ALLOCATION_FRACTION;
                        let price = slippage.buy_price(close);
                        let quantity = allocated / price;
                        portfolio.cash -= allocated;
                        portfolio.open(Position::new(instrument, quantity, price));
                        executions.push(Execution {
                            date: *date,
                            instrument: instrument.to_string(),
                            side: Direction::Enter,
                            quantity,
                            price,
                            cash_after: portfolio.cash,
                        });
                    }
                    Direction::Exit if portfolio.has_position(instrument) => {
                        let price = slippage.sell_price(close);
                        if let Some(position) = portfolio.close(instrument) {
                            portfolio.cash += position.quantity * price;
                            executions.push(Execution {
                                date: *date,
                                instrument: instrument.to_string(),
                                side: Direction::Exit,
                                quantity: position.quantity,
                                price,
                                cash_after: portfolio.cash,
                            });
                        }
                    }
                    _ => skipped += 1,
                }
            }

            equity.push(EquityPoint {
                date: *date,
                equity: portfolio.equity(close_of),
            });
        }

        log::info!(
            "Simulation complete: {} dates, {} executions, {} signal(s) skipped",
            equity.len(),
            executions.len(),
            skipped
        );

        Ok(SimulationRun {
            equity,
            executions,
            skipped_signals: skipped,
            final_cash: portfolio.cash,
            open_positions: portfolio.positions.keys().cloned().collect(),
        })
    }
}
