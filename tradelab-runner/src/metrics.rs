//! Performance metrics — pure functions that compute run statistics.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! scalar out. Percent-valued metrics are expressed in percent (2.5 means
//! 2.5%), and max drawdown is reported as a non-positive number. Any
//! metric whose inputs are degenerate (no trades, no losses, constant
//! equity) collapses to 0.0 rather than NaN.

use serde::{Deserialize, Serialize};
use tradelab_core::domain::{EquityPoint, TradeRecord};

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestMetrics {
    /// Percent gain over starting capital.
    pub total_return: f64,
    /// Percent of trades with positive P&L.
    pub win_rate: f64,
    /// Deepest peak-to-trough equity decline, in percent (<= 0).
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio of per-bar equity returns.
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    /// Gross profit over gross loss.
    pub profit_factor: f64,
    /// Average win over average absolute loss.
    pub risk_reward_ratio: f64,
    /// Longest run of consecutive winning trades.
    pub best_streak: usize,
    /// Longest run of consecutive losing trades.
    pub worst_streak: usize,
}

impl BacktestMetrics {
    pub fn compute(
        equity_curve: &[EquityPoint],
        trades: &[TradeRecord],
        starting_capital: f64,
    ) -> Self {
        let (best_streak, worst_streak) = streaks(trades);
        Self {
            total_return: total_return(equity_curve, starting_capital),
            win_rate: win_rate(trades),
            max_drawdown: max_drawdown(equity_curve),
            sharpe_ratio: sharpe_ratio(equity_curve),
            total_trades: trades.len(),
            profit_factor: profit_factor(trades),
            risk_reward_ratio: risk_reward_ratio(trades),
            best_streak,
            worst_streak,
        }
    }
}

/// Total return in percent: (final - starting_capital) / starting_capital
/// * 100. The baseline is the run's starting capital, not the first
/// equity point, so a loss on the very first bar still counts.
pub fn total_return(equity_curve: &[EquityPoint], starting_capital: f64) -> f64 {
    let last = match equity_curve.last() {
        Some(last) => last.equity,
        None => return 0.0,
    };
    if starting_capital <= 0.0 {
        return 0.0;
    }
    (last - starting_capital) / starting_capital * 100.0
}

/// Percent of closed trades with strictly positive P&L.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades.iter().filter(|trade| trade.is_winner()).count();
    wins as f64 / trades.len() as f64 * 100.0
}

/// Deepest drawdown in percent, as a non-positive number.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for point in equity_curve {
        peak = peak.max(point.equity);
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            worst = worst.min(dd);
        }
    }
    worst
}

/// Annualized Sharpe ratio of per-bar equity returns.
///
/// mean / sample-std (n - 1) of bar-over-bar percent changes, scaled by
/// sqrt(252). Constant equity or fewer than two bars yields 0.0.
pub fn sharpe_ratio(equity_curve: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = equity_curve
        .windows(2)
        .filter(|pair| pair[0].equity > 0.0)
        .map(|pair| (pair[1].equity - pair[0].equity) / pair[0].equity)
        .collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / (returns.len() - 1) as f64;
    let std = variance.sqrt();
    if std < 1e-15 {
        return 0.0;
    }
    mean / std * (252.0_f64).sqrt()
}

/// Gross profit / gross loss. Zero when there are no losing trades.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades.iter().map(|t| t.pnl.max(0.0)).sum();
    let gross_loss: f64 = trades.iter().map(|t| (-t.pnl).max(0.0)).sum();
    if gross_loss <= 0.0 {
        return 0.0;
    }
    gross_profit / gross_loss
}

/// Average winning P&L / average absolute losing P&L. Zero when either
/// side is empty.
pub fn risk_reward_ratio(trades: &[TradeRecord]) -> f64 {
    let wins: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_winner())
        .map(|t| t.pnl)
        .collect();
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| !t.is_winner())
        .map(|t| t.pnl.abs())
        .collect();
    if wins.is_empty() || losses.is_empty() {
        return 0.0;
    }
    let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
    let avg_loss = losses.iter().sum::<f64>() / losses.len() as f64;
    if avg_loss <= 0.0 {
        return 0.0;
    }
    avg_win / avg_loss
}

/// (longest winning streak, longest losing streak), scanning trades in
/// close order.
pub fn streaks(trades: &[TradeRecord]) -> (usize, usize) {
    let mut best = 0usize;
    let mut worst = 0usize;
    let mut current_wins = 0usize;
    let mut current_losses = 0usize;
    for trade in trades {
        if trade.is_winner() {
            current_wins += 1;
            current_losses = 0;
        } else {
            current_losses += 1;
            current_wins = 0;
        }
        best = best.max(current_wins);
        worst = worst.max(current_losses);
    }
    (best, worst)
}
