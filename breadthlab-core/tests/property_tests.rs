//! Property tests for analytics and simulation invariants.
//!
//! Uses proptest to verify:
//! 1. Breadth ratios are undefined or within [0, 1]
//! 2. Dates below the instrument minimum are fully masked
//! 3. Momentum and volume tables have no undefined cells
//! 4. `top_n` is bounded by n and never yields an undefined value
//! 5. The simulator emits one equity point per date and is idempotent

use breadthlab_core::analytics::{top_n, BreadthEngine, RankingEngine};
use breadthlab_core::data::{AlignMode, Panel, PanelBuilder};
use breadthlab_core::domain::{SignalEntry, TimeSeries};
use breadthlab_core::engine::Simulator;
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

const INSTRUMENTS: [&str; 4] = ["AAA", "BBB", "CCC", "DDD"];

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(i as i64)
}

/// Per instrument: (first day offset, closes with gaps, volumes).
fn arb_series() -> impl Strategy<Value = (usize, Vec<Option<f64>>)> {
    (
        0..5usize,
        prop::collection::vec(prop::option::weighted(0.85, 1.0..200.0_f64), 2..40),
    )
}

fn arb_panel() -> impl Strategy<Value = (Panel, bool)> {
    (prop::collection::vec(arb_series(), 1..=4), any::<bool>()).prop_map(|(specs, union)| {
        let mode = if union { AlignMode::Union } else { AlignMode::Common };
        let mut builder = PanelBuilder::new(mode);
        for (name, (offset, closes)) in INSTRUMENTS.iter().zip(specs) {
            let dates: Vec<NaiveDate> = (0..closes.len()).map(|i| day(offset + i)).collect();
            let volume: Vec<Option<f64>> = closes.iter().map(|c| c.map(|v| v * 10.0)).collect();
            let mut ts = TimeSeries::new(*name);
            ts.dates = dates;
            builder.push_series(ts.with_field("close", closes).with_field("volume", volume));
        }
        (builder.build().unwrap().panel, union)
    })
}

fn arb_signals(panel: &Panel) -> impl Strategy<Value = Vec<SignalEntry>> {
    let dates = panel.dates().to_vec();
    let instruments = panel.instruments().to_vec();
    prop::collection::vec(
        (0..dates.len(), 0..instruments.len(), any::<bool>()),
        0..30,
    )
    .prop_map(move |raw| {
        raw.into_iter()
            .map(|(di, ii, enter)| {
                if enter {
                    SignalEntry::enter(dates[di], instruments[ii].clone())
                } else {
                    SignalEntry::exit(dates[di], instruments[ii].clone())
                }
            })
            .collect()
    })
}

fn in_unit(v: Option<f64>) -> bool {
    v.map_or(true, |x| (0.0..=1.0).contains(&x))
}

proptest! {
    #[test]
    fn breadth_ratios_are_bounded((panel, _) in arb_panel(), window in 1..30usize) {
        let table = BreadthEngine::new(&panel).unwrap().compute_multi(&[window, 3], 1).unwrap();
        for row in &table.rows {
            prop_assert!(in_unit(row.advance_ratio));
            prop_assert!(in_unit(row.pct_above_sma));
            for (_, v) in &row.extra_windows {
                prop_assert!(in_unit(*v));
            }
        }
    }

    #[test]
    fn masked_dates_are_fully_undefined((panel, _) in arb_panel(), min in 0..6usize) {
        let table = BreadthEngine::new(&panel).unwrap().compute_multi(&[5, 10], min).unwrap();
        for row in &table.rows {
            if row.total_stocks.map_or(true, |t| t < min) {
                prop_assert!(row.advancers.is_none());
                prop_assert!(row.decliners.is_none());
                prop_assert!(row.unchanged.is_none());
                prop_assert!(row.total_stocks.is_none());
                prop_assert!(row.advance_ratio.is_none());
                prop_assert!(row.pct_above_sma.is_none());
                prop_assert!(row.valid_for_sma.is_none());
                prop_assert!(row.extra_windows.iter().all(|(_, v)| v.is_none()));
            }
        }
    }

    #[test]
    fn ranking_tables_are_zero_filled((panel, _) in arb_panel(), period in 1..10usize) {
        let engine = RankingEngine::new(&panel);
        prop_assert!(!engine.momentum(period).unwrap().has_undefined());
        prop_assert!(!engine.volume_rank(period).unwrap().has_undefined());
    }

    #[test]
    fn top_n_is_bounded((panel, _) in arb_panel(), n in 0..6usize) {
        let table = RankingEngine::new(&panel).momentum(2).unwrap();
        let top = top_n(&table, n, None);
        prop_assert!(top.leaders.len() <= n);
        prop_assert!(top.leaders.iter().all(|(_, v)| v.is_finite()));
        prop_assert!(top.leaders.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn simulation_one_point_per_date_and_idempotent(
        (panel, signals) in arb_panel().prop_flat_map(|(panel, _)| {
            let signals = arb_signals(&panel);
            (Just(panel), signals)
        })
    ) {
        let sim = Simulator::default();
        let first = sim.run(&panel, &signals).unwrap();
        let second = sim.run(&panel, &signals).unwrap();
        prop_assert_eq!(first.equity.len(), panel.dates().len());
        prop_assert!(first.equity.windows(2).all(|w| w[0].date < w[1].date));
        prop_assert!(first.equity.iter().all(|p| p.equity.is_finite() && p.equity > 0.0));
        prop_assert_eq!(first, second);
    }
}
