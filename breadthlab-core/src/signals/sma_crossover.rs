//! Moving average crossover: enter on a golden cross, exit on a death cross.
//!
//! Per instrument the state is 1 while the short SMA is above the long SMA
//! (both defined) and 0 otherwise. A 0 → 1 change emits an enter signal,
//! 1 → 0 an exit signal. The first date never signals.

use super::SignalSource;
use crate::analytics::{AnalyticsError, BreadthTable};
use crate::data::Panel;
use crate::domain::SignalEntry;
use crate::indicators::{ColumnIndicator, RollingMean};
use rayon::prelude::*;

const CLOSE: &str = "close";

#[derive(Debug, Clone)]
pub struct SmaCrossover {
    short: usize,
    long: usize,
    name: String,
}

impl SmaCrossover {
    pub fn new(short: usize, long: usize) -> Result<Self, AnalyticsError> {
        if short == 0 || short >= long {
            return Err(AnalyticsError::InvalidParameter(format!(
                "crossover windows need 0 < short < long, got short={short}, long={long}"
            )));
        }
        Ok(Self {
            short,
            long,
            name: format!("sma_{short}_{long}"),
        })
    }

    pub fn short(&self) -> usize {
        self.short
    }

    pub fn long(&self) -> usize {
        self.long
    }

    fn states(&self, closes: &[Option<f64>]) -> Vec<bool> {
        let short = RollingMean::new(self.short).compute(closes);
        let long = RollingMean::new(self.long).compute(closes);
        short
            .iter()
            .zip(&long)
            .map(|(s, l)| matches!((s, l), (Some(s), Some(l)) if s > l))
            .collect()
    }
}

impl SignalSource for SmaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, panel: &Panel, _breadth: Option<&BreadthTable>) -> Vec<SignalEntry> {
        if !panel.has_field(CLOSE) {
            log::warn!("{}: panel has no close field, no signals generated", self.name);
            return Vec::new();
        }

        let states: Vec<Vec<bool>> = panel
            .instruments()
            .par_iter()
            .map(|inst| {
                let closes = panel.column(CLOSE, inst).unwrap_or_default();
                self.states(&closes)
            })
            .collect();

        let mut signals = Vec::new();
        for (di, date) in panel.dates().iter().enumerate().skip(1) {
            for (inst, state) in panel.instruments().iter().zip(&states) {
                match (state[di - 1], state[di]) {
                    (false, true) => signals.push(SignalEntry::enter(*date, inst.clone())),
                    (true, false) => signals.push(SignalEntry::exit(*date, inst.clone())),
                    _ => {}
                }
            }
        }

        log::info!("{}: generated {} signals", self.name, signals.len());
        signals
    }
}
