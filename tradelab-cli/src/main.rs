//! TradeLab CLI — run backtests and robustness analyses from the shell.
//!
//! Commands:
//! - `run` — execute a backtest from a bars CSV and a request JSON
//! - `monte-carlo` — resample a run's trade sequence
//! - `walk-forward` — split the series into windows and run each one
//! - `heatmap` — sweep the stop-loss / take-profit grid
//! - `strategies` — list the strategy catalog

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tradelab_core::domain::{Bar, BarSeries};
use tradelab_runner::{
    equity_to_csv, response_to_json, run_heatmap, run_monte_carlo, run_request, run_walk_forward,
    trades_to_csv, BacktestRequest, HeatmapConfig, MonteCarloConfig, Resampling, StrategyName,
    WalkForwardConfig,
};

#[derive(Parser)]
#[command(name = "tradelab", about = "TradeLab — strategy backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest and print the response JSON.
    Run {
        /// Bars CSV with columns: date, open, high, low, close, volume.
        #[arg(long)]
        bars: PathBuf,

        /// Request JSON file.
        #[arg(long)]
        request: PathBuf,

        /// Also write the trade tape as CSV to this path.
        #[arg(long)]
        trades_csv: Option<PathBuf>,

        /// Also write the equity curve as CSV to this path.
        #[arg(long)]
        equity_csv: Option<PathBuf>,
    },
    /// Monte Carlo resampling of the run's trade sequence.
    MonteCarlo {
        #[arg(long)]
        bars: PathBuf,

        #[arg(long)]
        request: PathBuf,

        /// Number of simulations.
        #[arg(long, default_value_t = 1000)]
        simulations: usize,

        /// Resample trades with replacement instead of shuffling.
        #[arg(long, default_value_t = false)]
        bootstrap: bool,

        /// Master RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Walk-forward analysis over sequential windows.
    WalkForward {
        #[arg(long)]
        bars: PathBuf,

        #[arg(long)]
        request: PathBuf,

        /// Number of windows.
        #[arg(long, default_value_t = 5)]
        windows: usize,
    },
    /// Stop-loss / take-profit grid sweep.
    Heatmap {
        #[arg(long)]
        bars: PathBuf,

        #[arg(long)]
        request: PathBuf,

        /// Stop-loss grid, percent values.
        #[arg(long, value_delimiter = ',')]
        stop_loss_grid: Option<Vec<f64>>,

        /// Take-profit grid, percent values.
        #[arg(long, value_delimiter = ',')]
        take_profit_grid: Option<Vec<f64>>,
    },
    /// List the strategy catalog.
    Strategies,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            bars,
            request,
            trades_csv,
            equity_csv,
        } => cmd_run(&bars, &request, trades_csv.as_deref(), equity_csv.as_deref()),
        Commands::MonteCarlo {
            bars,
            request,
            simulations,
            bootstrap,
            seed,
        } => cmd_monte_carlo(&bars, &request, simulations, bootstrap, seed),
        Commands::WalkForward {
            bars,
            request,
            windows,
        } => cmd_walk_forward(&bars, &request, windows),
        Commands::Heatmap {
            bars,
            request,
            stop_loss_grid,
            take_profit_grid,
        } => cmd_heatmap(&bars, &request, stop_loss_grid, take_profit_grid),
        Commands::Strategies => {
            for name in StrategyName::all() {
                println!("{}", name.as_str());
            }
            Ok(())
        }
    }
}

fn load_series(path: &Path) -> Result<BarSeries> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open bars CSV {}", path.display()))?;
    let bars: Vec<Bar> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("failed to parse bars CSV {}", path.display()))?;
    BarSeries::from_bars(bars).context("bars CSV failed validation")
}

fn load_request(path: &Path) -> Result<BacktestRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse request {}", path.display()))
}

fn cmd_run(
    bars: &Path,
    request: &Path,
    trades_csv: Option<&Path>,
    equity_csv: Option<&Path>,
) -> Result<()> {
    let series = load_series(bars)?;
    let request = load_request(request)?;
    let response = run_request(&series, &request)?;

    if let Some(path) = trades_csv {
        fs::write(path, trades_to_csv(&response.trades)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = equity_csv {
        fs::write(path, equity_to_csv(&response.equity_curve)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    println!("{}", response_to_json(&response)?);
    Ok(())
}

fn cmd_monte_carlo(
    bars: &Path,
    request: &Path,
    simulations: usize,
    bootstrap: bool,
    seed: u64,
) -> Result<()> {
    let series = load_series(bars)?;
    let request = load_request(request)?;
    let response = run_request(&series, &request)?;

    let config = MonteCarloConfig {
        simulations,
        resampling: if bootstrap {
            Resampling::Bootstrap
        } else {
            Resampling::Shuffle
        },
        seed,
    };
    let summary = run_monte_carlo(&response.trades, response.starting_capital, &config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_walk_forward(bars: &Path, request: &Path, windows: usize) -> Result<()> {
    let series = load_series(bars)?;
    let request = load_request(request)?;
    request.validate()?;

    let config = WalkForwardConfig {
        num_windows: windows,
    };
    let report = run_walk_forward(
        &series,
        &request.to_strategy_params(),
        &request.to_execution_params(),
        &config,
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_heatmap(
    bars: &Path,
    request: &Path,
    stop_loss_grid: Option<Vec<f64>>,
    take_profit_grid: Option<Vec<f64>>,
) -> Result<()> {
    let series = load_series(bars)?;
    let request = load_request(request)?;
    request.validate()?;

    let defaults = HeatmapConfig::default();
    let config = HeatmapConfig {
        stop_loss_grid: stop_loss_grid.unwrap_or(defaults.stop_loss_grid),
        take_profit_grid: take_profit_grid.unwrap_or(defaults.take_profit_grid),
    };
    let report = run_heatmap(
        &series,
        &request.to_strategy_params(),
        &request.to_execution_params(),
        &config,
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!(
        "best cell: sl {} / tp {} ({:.2}%)",
        report.best.stop_loss, report.best.take_profit, report.best.return_pct
    );
    Ok(())
}
