//! Walk-forward analysis: split the series into sequential windows and
//! run the strategy in each one independently.
//!
//! Every window starts from fresh capital and a flat book, so a single
//! lucky stretch cannot carry later windows. A window too short to trade
//! still produces a record (zero return, not profitable) instead of
//! sinking the whole report.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradelab_core::domain::BarSeries;
use tradelab_core::engine::{run_backtest, ExecutionParams};
use tradelab_core::strategy::StrategyParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub num_windows: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self { num_windows: 5 }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalkForwardError {
    #[error("walk-forward needs at least 1 window")]
    NoWindows,
    #[error("{bars} bars cannot fill {windows} windows")]
    NotEnoughBars { bars: usize, windows: usize },
}

/// Result of one walk-forward window. `window` is 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowResult {
    pub window: usize,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub bars: usize,
    pub trades: usize,
    pub return_pct: f64,
    pub profitable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub windows: Vec<WindowResult>,
    pub profitable_windows: usize,
    /// Share of profitable windows, in percent.
    pub overall_consistency: f64,
    /// Mean of per-window returns, in percent.
    pub average_return: f64,
}

/// Split `len` bars into `num_windows` contiguous half-open ranges.
///
/// Windows get `len / num_windows` bars each; the last window absorbs the
/// remainder.
pub fn window_ranges(len: usize, num_windows: usize) -> Vec<(usize, usize)> {
    let width = len / num_windows;
    (0..num_windows)
        .map(|w| {
            let start = w * width;
            let end = if w + 1 == num_windows {
                len
            } else {
                start + width
            };
            (start, end)
        })
        .collect()
}

/// Run the strategy over every window of the series.
pub fn run_walk_forward(
    series: &BarSeries,
    strategy: &StrategyParams,
    exec: &ExecutionParams,
    config: &WalkForwardConfig,
) -> Result<WalkForwardReport, WalkForwardError> {
    if config.num_windows == 0 {
        return Err(WalkForwardError::NoWindows);
    }
    if series.len() < config.num_windows {
        return Err(WalkForwardError::NotEnoughBars {
            bars: series.len(),
            windows: config.num_windows,
        });
    }

    let ranges = window_ranges(series.len(), config.num_windows);
    let windows: Vec<WindowResult> = ranges
        .par_iter()
        .enumerate()
        .map(|(index, &(start, end))| {
            let window_series = series.slice(start, end);
            let bars = window_series.bars();
            let (trades, return_pct) = match run_backtest(&window_series, strategy, exec) {
                Ok(output) => {
                    let pct = (output.final_equity - exec.starting_capital)
                        / exec.starting_capital
                        * 100.0;
                    (output.trades.len(), pct)
                }
                // Window too short to run: flat record, never a failure.
                Err(_) => (0, 0.0),
            };
            WindowResult {
                window: index + 1,
                start_date: bars[0].date,
                end_date: bars[bars.len() - 1].date,
                bars: bars.len(),
                trades,
                return_pct,
                profitable: return_pct > 0.0,
            }
        })
        .collect();

    let profitable_windows = windows.iter().filter(|w| w.profitable).count();
    let average_return =
        windows.iter().map(|w| w.return_pct).sum::<f64>() / windows.len() as f64;

    Ok(WalkForwardReport {
        overall_consistency: profitable_windows as f64 / windows.len() as f64 * 100.0,
        profitable_windows,
        average_return,
        windows,
    })
}
