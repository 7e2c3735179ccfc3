//! Stop-loss / take-profit heatmap: one backtest per grid cell.
//!
//! The cell list is row-major with take-profit as the outer axis, so a
//! consumer can reshape it into a `take_profit_grid.len()` by
//! `stop_loss_grid.len()` matrix directly. Ties for the best cell go to
//! the earlier cell in that order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradelab_core::domain::BarSeries;
use tradelab_core::engine::{run_backtest, ExecutionParams, RunError};
use tradelab_core::strategy::StrategyParams;

use crate::metrics::BacktestMetrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    pub stop_loss_grid: Vec<f64>,
    pub take_profit_grid: Vec<f64>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            stop_loss_grid: vec![0.5, 1.0, 2.0, 3.0, 4.0, 5.0],
            take_profit_grid: vec![1.0, 2.0, 4.0, 6.0, 8.0, 10.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub return_pct: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    pub final_equity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapReport {
    pub cells: Vec<HeatmapCell>,
    pub best: HeatmapCell,
    /// Number of (stop-loss, take-profit) combinations swept.
    pub parameters_tested: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeatmapError {
    #[error("heatmap grids must not be empty")]
    EmptyGrid,
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Run the strategy once per (stop-loss, take-profit) combination.
///
/// Every other execution knob is taken from `base_exec` unchanged.
pub fn run_heatmap(
    series: &BarSeries,
    strategy: &StrategyParams,
    base_exec: &ExecutionParams,
    config: &HeatmapConfig,
) -> Result<HeatmapReport, HeatmapError> {
    if config.stop_loss_grid.is_empty() || config.take_profit_grid.is_empty() {
        return Err(HeatmapError::EmptyGrid);
    }

    let combos: Vec<(f64, f64)> = config
        .take_profit_grid
        .iter()
        .flat_map(|&tp| config.stop_loss_grid.iter().map(move |&sl| (sl, tp)))
        .collect();

    let cells = combos
        .par_iter()
        .map(|&(stop_loss, take_profit)| {
            let exec = ExecutionParams {
                stop_loss_pct: stop_loss,
                take_profit_pct: take_profit,
                ..base_exec.clone()
            };
            let output = run_backtest(series, strategy, &exec)?;
            let metrics = BacktestMetrics::compute(
                &output.equity_curve,
                &output.trades,
                output.starting_capital,
            );
            Ok(HeatmapCell {
                stop_loss,
                take_profit,
                return_pct: metrics.total_return,
                win_rate: metrics.win_rate,
                max_drawdown: metrics.max_drawdown,
                sharpe_ratio: metrics.sharpe_ratio,
                total_trades: metrics.total_trades,
                final_equity: output.final_equity,
            })
        })
        .collect::<Result<Vec<_>, HeatmapError>>()?;

    let mut best = cells[0].clone();
    for cell in &cells[1..] {
        if cell.return_pct > best.return_pct {
            best = cell.clone();
        }
    }

    Ok(HeatmapReport {
        parameters_tested: cells.len(),
        cells,
        best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_series;
    use tradelab_core::domain::{DirectionMode, PositionSizing};
    use tradelab_core::engine::SameBarTieBreak;

    fn exec() -> ExecutionParams {
        ExecutionParams {
            stop_loss_pct: 1.0,
            take_profit_pct: 1.0,
            direction: DirectionMode::Both,
            sizing: PositionSizing::Fixed { lots: 10.0 },
            slippage_pct: 0.0,
            commission_per_trade: 0.0,
            starting_capital: 10_000.0,
            tie_break: SameBarTieBreak::StopLossFirst,
        }
    }

    fn wavy_series() -> BarSeries {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + 12.0 * ((i as f64) * 0.35).sin())
            .collect();
        make_series(&closes)
    }

    fn crossover() -> StrategyParams {
        StrategyParams::SmaCrossover {
            fast_period: 2,
            slow_period: 3,
        }
    }

    #[test]
    fn default_grid_is_row_major_by_take_profit() {
        let config = HeatmapConfig::default();
        let report = run_heatmap(&wavy_series(), &crossover(), &exec(), &config).unwrap();
        assert_eq!(report.cells.len(), 36);
        assert_eq!(report.parameters_tested, 36);
        // First row: take_profit fixed at 1.0, stop_loss sweeping.
        assert_eq!(report.cells[0].stop_loss, 0.5);
        assert_eq!(report.cells[0].take_profit, 1.0);
        assert_eq!(report.cells[5].stop_loss, 5.0);
        assert_eq!(report.cells[5].take_profit, 1.0);
        assert_eq!(report.cells[6].stop_loss, 0.5);
        assert_eq!(report.cells[6].take_profit, 2.0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = HeatmapConfig {
            stop_loss_grid: vec![],
            take_profit_grid: vec![1.0],
        };
        let result = run_heatmap(&wavy_series(), &crossover(), &exec(), &config);
        assert_eq!(result.unwrap_err(), HeatmapError::EmptyGrid);
    }

    #[test]
    fn best_cell_is_first_argmax() {
        let report = run_heatmap(
            &wavy_series(),
            &crossover(),
            &exec(),
            &HeatmapConfig::default(),
        )
        .unwrap();
        let max = report
            .cells
            .iter()
            .map(|c| c.return_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.best.return_pct, max);
        let first = report
            .cells
            .iter()
            .find(|c| c.return_pct == max)
            .unwrap();
        assert_eq!(first.stop_loss, report.best.stop_loss);
        assert_eq!(first.take_profit, report.best.take_profit);
    }

    #[test]
    fn base_execution_knobs_are_preserved() {
        let mut base = exec();
        base.commission_per_trade = 2.0;
        let config = HeatmapConfig {
            stop_loss_grid: vec![2.0],
            take_profit_grid: vec![4.0],
        };
        let report = run_heatmap(&wavy_series(), &crossover(), &base, &config).unwrap();
        assert_eq!(report.cells.len(), 1);
        // A run with commissions must not beat the same run without them.
        let free = run_heatmap(&wavy_series(), &crossover(), &exec(), &config).unwrap();
        assert!(report.cells[0].final_equity <= free.cells[0].final_equity);
    }
}
