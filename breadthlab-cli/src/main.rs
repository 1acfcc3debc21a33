//! BreadthLab CLI — pipeline runs and ad-hoc cross-sectional queries.
//!
//! Commands:
//! - `run` — execute the full pipeline from a TOML config and save artifacts
//! - `breadth` — compute market breadth for a data folder
//! - `rank` — print the top instruments by one metric
//! - `summary` — describe the instruments and date coverage of a folder

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use breadthlab_core::analytics::{top_n, BreadthEngine, BreadthRow, RankingEngine, RsMethod};
use breadthlab_core::data::{AlignMode, PanelBuild};
use breadthlab_core::indicators::Rsi;
use breadthlab_runner::{run_pipeline, save_artifacts, BacktestConfig, PipelineResult};

#[derive(Parser)]
#[command(
    name = "breadthlab",
    about = "BreadthLab CLI — market breadth, ranking and signal backtests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Override the data folder from the config.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Override the artifact output folder from the config.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Align on the union of dates instead of the common dates.
        #[arg(long, default_value_t = false)]
        union: bool,
    },
    /// Compute market breadth and print the latest complete row.
    Breadth {
        /// Folder of per-instrument CSV files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Moving-average windows; the first is the base window.
        #[arg(long, value_delimiter = ',', default_value = "50")]
        windows: Vec<usize>,

        /// Minimum instruments with a defined return for a row to count.
        #[arg(long, default_value_t = 1)]
        min_stocks: usize,

        /// Report this date instead of the latest complete one (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = false)]
        union: bool,

        /// Also write the full table to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the top instruments by one metric.
    Rank {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = Metric::Momentum)]
        metric: Metric,

        /// Lookback period for momentum, volume and RSI.
        #[arg(long, default_value_t = 5)]
        period: usize,

        /// Benchmark instrument for relative strength.
        #[arg(long)]
        benchmark: Option<String>,

        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Ranking date (YYYY-MM-DD). Defaults to the latest date with data.
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = false)]
        union: bool,
    },
    /// Describe the instruments and date coverage of a data folder.
    Summary {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Metric {
    Momentum,
    Volume,
    RsDaily,
    RsCumulative,
    Rsi,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            output_dir,
            union,
        } => run_cmd(config, data_dir, output_dir, union),
        Commands::Breadth {
            data_dir,
            windows,
            min_stocks,
            date,
            union,
            output,
        } => breadth_cmd(data_dir, &windows, min_stocks, date.as_deref(), union, output),
        Commands::Rank {
            data_dir,
            metric,
            period,
            benchmark,
            top,
            date,
            union,
        } => rank_cmd(
            data_dir,
            metric,
            period,
            benchmark.as_deref(),
            top,
            date.as_deref(),
            union,
        ),
        Commands::Summary { data_dir } => summary_cmd(data_dir),
    }
}

fn align_mode(union: bool) -> AlignMode {
    if union {
        AlignMode::Union
    } else {
        AlignMode::Common
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
    })
    .transpose()
}

fn load(data_dir: &Path, union: bool) -> Result<PanelBuild> {
    let build = PanelBuild::from_csv_dir(data_dir, align_mode(union), None)
        .with_context(|| format!("failed to load data from {}", data_dir.display()))?;
    for warning in &build.warnings {
        println!("WARNING: {warning}");
    }
    Ok(build)
}

fn run_cmd(
    config_path: PathBuf,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    union: bool,
) -> Result<()> {
    let mut config = BacktestConfig::from_file(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    if union {
        config.data.align = AlignMode::Union;
    }

    let result = run_pipeline(&config)?;
    print_run_summary(&result);

    let paths = save_artifacts(&result, &config)?;
    println!("Artifacts saved to: {}", paths.run_dir.display());
    Ok(())
}

fn breadth_cmd(
    data_dir: PathBuf,
    windows: &[usize],
    min_stocks: usize,
    date: Option<&str>,
    union: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let date = parse_date(date)?;
    let build = load(&data_dir, union)?;
    let table = BreadthEngine::new(&build.panel)?.compute_multi(windows, min_stocks)?;

    if let Some(path) = output {
        breadthlab_runner::reporting::artifacts::write_breadth_csv(&path, &table)?;
        println!("Breadth table written to: {}", path.display());
    }

    match table.summary(date)? {
        Some(row) => print_breadth_row(row, table.window),
        None => println!("No breadth data."),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn rank_cmd(
    data_dir: PathBuf,
    metric: Metric,
    period: usize,
    benchmark: Option<&str>,
    top: usize,
    date: Option<&str>,
    union: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let build = load(&data_dir, union)?;
    let engine = RankingEngine::new(&build.panel);

    const NEED_BENCHMARK: &str = "--benchmark is required for relative strength";
    let table = match metric {
        Metric::Momentum => engine.momentum(period)?,
        Metric::Volume => engine.volume_rank(period)?,
        Metric::RsDaily => engine.relative_strength(benchmark.context(NEED_BENCHMARK)?, RsMethod::Daily)?,
        Metric::RsCumulative => {
            engine.relative_strength(benchmark.context(NEED_BENCHMARK)?, RsMethod::Cumulative)?
        }
        Metric::Rsi => {
            if period == 0 {
                bail!("--period must be positive");
            }
            engine.indicator_metric("close", &Rsi::new(period))?
        }
    };

    let ranked = top_n(&table, top, date);
    for warning in &ranked.warnings {
        println!("WARNING: {warning}");
    }
    let Some(on) = ranked.date else {
        println!("No ranking data.");
        return Ok(());
    };

    println!();
    println!("=== Top {top} by {metric:?} on {on} ===");
    for (i, (instrument, value)) in ranked.leaders.iter().enumerate() {
        println!("{:>3}. {:<12} {:>12.4}", i + 1, instrument, value);
    }
    println!();
    Ok(())
}

fn summary_cmd(data_dir: PathBuf) -> Result<()> {
    let build = load(&data_dir, false)?;
    let summary = build.summary();

    println!();
    println!("=== Data Summary ===");
    println!("Folder:         {}", data_dir.display());
    println!("Instruments:    {}", summary.instruments.len());
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("Date Range:     {first} to {last}");
    }
    println!("Common Dates:   {}", summary.common_dates);
    println!("Union Dates:    {}", summary.union_dates);
    println!();
    println!("{:<12} {:>8} {:>8}", "Instrument", "Rows", "Fields");
    println!("{}", "-".repeat(30));
    for (instrument, (rows, fields)) in &summary.shapes {
        println!("{instrument:<12} {rows:>8} {fields:>8}");
    }
    println!();
    Ok(())
}

fn fmt_count(v: Option<usize>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".into())
}

fn fmt_pct(v: Option<f64>) -> String {
    v.map(|x| format!("{:.1}%", x * 100.0))
        .unwrap_or_else(|| "-".into())
}

fn print_breadth_row(row: &BreadthRow, window: usize) {
    println!();
    println!("=== Market Breadth on {} ===", row.date);
    println!("Advancers:      {}", fmt_count(row.advancers));
    println!("Decliners:      {}", fmt_count(row.decliners));
    println!("Unchanged:      {}", fmt_count(row.unchanged));
    println!("Total:          {}", fmt_count(row.total_stocks));
    println!("Advance Ratio:  {}", fmt_pct(row.advance_ratio));
    println!("Above SMA{window:<4}:  {}", fmt_pct(row.pct_above_sma));
    for (w, value) in &row.extra_windows {
        println!("Above SMA{w:<4}:  {}", fmt_pct(*value));
    }
    println!();
}

fn print_run_summary(result: &PipelineResult) {
    println!();
    println!("=== Pipeline Result ===");
    println!("Run:            {}", result.run_id);
    println!("Dataset:        {}", result.dataset_hash);
    println!("Strategy:       {}", result.strategy);
    println!("Instruments:    {}", result.instruments.len());
    if let (Some(first), Some(last)) = (result.equity.first(), result.equity.last()) {
        println!("Period:         {} to {}", first.date, last.date);
    }
    println!("Signals:        {}", result.signals.len());
    println!("Executions:     {}", result.executions.len());
    println!("Skipped:        {}", result.skipped_signals);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", result.kpi.total_return * 100.0);
    println!("Ann. Return:    {:.2}%", result.kpi.annualized_return * 100.0);
    println!("Ann. Vol:       {:.2}%", result.kpi.annualized_volatility * 100.0);
    match result.kpi.sharpe {
        Some(s) => println!("Sharpe:         {s:.3}"),
        None => println!("Sharpe:         -"),
    }
    println!("Max Drawdown:   {:.2}%", result.kpi.max_drawdown * 100.0);

    for board in &result.leaders {
        println!();
        match board.top.date {
            Some(on) => println!("--- Leaders: {} ({on}) ---", board.metric),
            None => println!("--- Leaders: {} ---", board.metric),
        }
        for (i, (instrument, value)) in board.top.leaders.iter().enumerate() {
            println!("{:>3}. {:<12} {:>12.4}", i + 1, instrument, value);
        }
    }
    for warn in &result.data_warnings {
        println!("WARNING: {warn}");
    }
    for warn in &result.rank_warnings {
        println!("WARNING: {warn}");
    }
    println!();
}
