//! Bar-by-bar event loop — the heart of the backtester.
//!
//! Per-bar order of operations:
//! 1. Protective exits: check the bar's range against the open position's
//!    stop-loss and take-profit thresholds.
//! 2. Strategy evaluation at the close; signal exits fill at the close,
//!    entries open at the close. A bar that closed a trade never re-enters.
//! 3. Equity point at the close.
//!
//! Any position still open after the last bar is force-closed at that
//! bar's close so the equity curve and trade list agree.

use serde::{Deserialize, Serialize};

use crate::domain::{BarSeries, EquityPoint, ExitReason, TradeDirection, TradeRecord};
use crate::strategy::{Signal, StrategyParams};

use super::execution::ExecutionParams;
use super::portfolio::Portfolio;
use super::RunError;

/// Everything a single backtest produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub starting_capital: f64,
    pub final_equity: f64,
}

/// Run one strategy over one bar series.
///
/// The equity curve has exactly one point per bar, marked at the close.
pub fn run_backtest(
    series: &BarSeries,
    strategy: &StrategyParams,
    exec: &ExecutionParams,
) -> Result<RunOutput, RunError> {
    let bars = series.bars();
    if bars.is_empty() {
        return Err(RunError::NoData);
    }
    let last = bars.len() - 1;
    let indicators = strategy.compute_indicators(bars);

    let mut portfolio = Portfolio::new(exec.starting_capital);
    let mut equity_curve = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let mut closed_this_bar = portfolio.check_protective_exits(i, bar, exec);

        match strategy.evaluate(bars, i, &indicators, portfolio.position()) {
            Some(Signal::Exit) => {
                if portfolio.position().is_some() {
                    portfolio.exit(i, bar.date, bar.close, ExitReason::Signal, exec, true);
                    closed_this_bar = true;
                }
            }
            Some(Signal::EnterLong) => {
                maybe_enter(
                    &mut portfolio,
                    i,
                    bar.date,
                    bar.close,
                    TradeDirection::Long,
                    exec,
                    closed_this_bar,
                    last,
                );
            }
            Some(Signal::EnterShort) => {
                maybe_enter(
                    &mut portfolio,
                    i,
                    bar.date,
                    bar.close,
                    TradeDirection::Short,
                    exec,
                    closed_this_bar,
                    last,
                );
            }
            None => {}
        }

        if i == last && portfolio.position().is_some() {
            // Mark-out close, no slippage.
            portfolio.exit(i, bar.date, bar.close, ExitReason::EndOfData, exec, false);
        }

        equity_curve.push(EquityPoint {
            date: bar.date,
            equity: portfolio.equity(bar.close),
        });
    }

    let final_equity = equity_curve
        .last()
        .map(|point| point.equity)
        .unwrap_or(exec.starting_capital);

    Ok(RunOutput {
        trades: portfolio.into_trades(),
        equity_curve,
        starting_capital: exec.starting_capital,
        final_equity,
    })
}

#[allow(clippy::too_many_arguments)]
fn maybe_enter(
    portfolio: &mut Portfolio,
    i: usize,
    date: chrono::NaiveDate,
    close: f64,
    side: TradeDirection,
    exec: &ExecutionParams,
    closed_this_bar: bool,
    last: usize,
) {
    // No flip-in-one-bar, no entry that would be force-closed immediately.
    if portfolio.position().is_some() || closed_this_bar || i == last {
        return;
    }
    if !exec.direction.allows(side) {
        return;
    }
    portfolio.try_enter(i, date, close, side, exec);
}
