//! Simulation engine scenarios against hand-computed equity.

use breadthlab_core::data::{AlignMode, Panel, PanelBuilder};
use breadthlab_core::domain::{Direction, SignalEntry, TimeSeries};
use breadthlab_core::engine::{SimulationConfig, Simulator};
use breadthlab_core::signals::{SignalSource, SmaCrossover};
use chrono::NaiveDate;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

/// Three instruments over five trading days; A closes 10..14.
fn scenario_panel() -> Panel {
    let axis = vec![d(2), d(3), d(4), d(5), d(8)];
    let mut b = PanelBuilder::new(AlignMode::Common);
    b.push_series(TimeSeries::from_closes("A", &axis, &[10.0, 11.0, 12.0, 13.0, 14.0]));
    b.push_series(TimeSeries::from_closes("B", &axis, &[50.0, 49.0, 51.0, 52.0, 50.0]));
    b.push_series(TimeSeries::from_closes("C", &axis, &[5.0, 5.0, 5.0, 5.0, 5.0]));
    b.build().unwrap().panel
}

#[test]
fn round_trip_trade_matches_closed_form() {
    let panel = scenario_panel();
    // enter at close 12, exit at close 13
    let signals = vec![SignalEntry::enter(d(4), "A"), SignalEntry::exit(d(5), "A")];
    let run = Simulator::new(SimulationConfig::default())
        .run(&panel, &signals)
        .unwrap();

    let entry_price = 12.0 * 1.001;
    let quantity = 100_000.0 / entry_price;
    let exit_price = 13.0 * 0.999;
    let proceeds = quantity * exit_price;

    assert_eq!(run.executions.len(), 2);
    assert_eq!(run.executions[0].side, Direction::Enter);
    assert!((run.executions[0].quantity - quantity).abs() < 1e-9);
    assert!((run.executions[0].price - 12.012).abs() < 1e-9);
    assert!((run.executions[1].price - 12.987).abs() < 1e-9);

    assert_eq!(run.equity.len(), 5);
    assert_eq!(run.equity[0].equity, 1_000_000.0);
    assert_eq!(run.equity[1].equity, 1_000_000.0);
    // marked at the raw close on the entry date
    assert!((run.equity[2].equity - (900_000.0 + quantity * 12.0)).abs() < 1e-6);

    let expected_final = 900_000.0 + proceeds;
    assert!((run.equity[4].equity - expected_final).abs() < 1e-6);
    assert!((run.final_cash - expected_final).abs() < 1e-6);
    assert!(run.open_positions.is_empty());
    // realized P&L net of slippage on both legs
    let pnl = quantity * (exit_price - entry_price);
    assert!((run.equity[4].equity - (1_000_000.0 + pnl)).abs() < 1e-6);
}

#[test]
fn equity_dates_match_panel_axis() {
    let panel = scenario_panel();
    let run = Simulator::default().run(&panel, &[]).unwrap();
    let dates: Vec<NaiveDate> = run.equity.iter().map(|p| p.date).collect();
    assert_eq!(dates, panel.dates());
}

#[test]
fn crossover_signals_drive_simulation_deterministically() {
    let panel = scenario_panel();
    let source = SmaCrossover::new(1, 2).unwrap();
    let signals = source.generate(&panel, None);
    assert!(!signals.is_empty());

    let sim = Simulator::default();
    let first = sim.run(&panel, &signals).unwrap();
    let second = sim.run(&panel, &signals).unwrap();
    assert_eq!(first.equity, second.equity);
    assert_eq!(first.equity.len(), panel.dates().len());
}
