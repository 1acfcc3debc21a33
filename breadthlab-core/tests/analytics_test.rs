//! Breadth and ranking over a small CSV-free universe.

use breadthlab_core::analytics::{top_n, BreadthEngine, RankingEngine, RsMethod};
use breadthlab_core::data::{AlignMode, Panel, PanelBuilder};
use breadthlab_core::domain::TimeSeries;
use breadthlab_core::indicators::Rsi;
use chrono::NaiveDate;

fn dates(n: usize) -> Vec<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    (0..n).map(|i| base + chrono::Duration::days(i as i64)).collect()
}

fn universe() -> Panel {
    let n = 30;
    let axis = dates(n);
    let mut builder = PanelBuilder::new(AlignMode::Common);
    let shapes: [(&str, fn(usize) -> f64); 4] = [
        ("UP", |i| 100.0 + i as f64),
        ("DOWN", |i| 100.0 - i as f64),
        ("WAVE", |i| 100.0 + (i as f64 * 0.7).sin() * 5.0),
        ("IDX", |i| 100.0 + i as f64 * 0.5),
    ];
    for (name, f) in shapes {
        let closes: Vec<f64> = (0..n).map(f).collect();
        let volume: Vec<Option<f64>> = (0..n).map(|i| Some(1000.0 + i as f64)).collect();
        builder.push_series(TimeSeries::from_closes(name, &axis, &closes).with_field("volume", volume));
    }
    builder.build().unwrap().panel
}

#[test]
fn breadth_rows_cover_every_date() {
    let panel = universe();
    let table = BreadthEngine::new(&panel)
        .unwrap()
        .compute_multi(&[5, 10, 20], 1)
        .unwrap();
    assert_eq!(table.len(), panel.dates().len());
    assert_eq!(
        table.column_names(),
        vec![
            "advancers",
            "decliners",
            "unchanged",
            "total_stocks",
            "advance_ratio",
            "pct_above_sma_5",
            "valid_for_sma",
            "pct_above_sma_10",
            "pct_above_sma_20",
        ]
    );

    let last = table.rows.last().unwrap();
    assert_eq!(last.total_stocks, Some(4));
    // UP and IDX rise, DOWN falls
    assert!(last.advancers.unwrap() >= 2);
    assert!(last.decliners.unwrap() >= 1);
    assert!(table.rows[0].total_stocks.is_none());
}

#[test]
fn leaders_by_momentum() {
    let panel = universe();
    let engine = RankingEngine::new(&panel);
    let momentum = engine.momentum(5).unwrap();
    let top = top_n(&momentum, 2, None);
    assert_eq!(top.date, panel.dates().last().copied());
    let names: Vec<&str> = top.leaders.iter().map(|(n, _)| n.as_str()).collect();
    // WAVE swings about +9.8% over the last five days, UP about +4%
    assert_eq!(names, vec!["WAVE", "UP"]);
    assert!(top.leaders[0].1 >= top.leaders[1].1);
}

#[test]
fn cumulative_rs_is_one_on_first_date() {
    let panel = universe();
    let rs = RankingEngine::new(&panel)
        .relative_strength("IDX", RsMethod::Cumulative)
        .unwrap();
    assert!(!rs.columns().contains(&"IDX".to_string()));
    let first = rs.dates()[0];
    for col in rs.columns() {
        assert_eq!(rs.get(first, col), Some(1.0));
    }
}

#[test]
fn rsi_through_indicator_metric() {
    let panel = universe();
    let rsi = RankingEngine::new(&panel)
        .indicator_metric("close", &Rsi::new(14))
        .unwrap();
    let last = *panel.dates().last().unwrap();
    assert_eq!(rsi.get(last, "UP"), Some(100.0));
    assert_eq!(rsi.get(last, "DOWN"), Some(0.0));
    assert_eq!(rsi.get(panel.dates()[3], "UP"), None);
}
