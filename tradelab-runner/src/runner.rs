//! Single-backtest orchestration: request in, response out.
//!
//! The response echoes the validated request, carries the full run
//! artifacts, and attaches whichever robustness analyses the request
//! asked for.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradelab_core::domain::{drawdown_curve, BarSeries, EquityPoint, TradeRecord};
use tradelab_core::engine::{run_backtest, RunError};

use crate::heatmap::{run_heatmap, HeatmapConfig, HeatmapError, HeatmapReport};
use crate::metrics::BacktestMetrics;
use crate::monte_carlo::{run_monte_carlo, MonteCarloConfig, MonteCarloError, MonteCarloSummary};
use crate::request::{BacktestRequest, RequestError};
use crate::walk_forward::{run_walk_forward, WalkForwardConfig, WalkForwardError, WalkForwardReport};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    MonteCarlo(#[from] MonteCarloError),
    #[error(transparent)]
    WalkForward(#[from] WalkForwardError),
    #[error(transparent)]
    Heatmap(#[from] HeatmapError),
}

/// Full result of a single validated backtest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResponse {
    /// The request as validated, echoed for the caller.
    pub request: BacktestRequest,
    pub metrics: BacktestMetrics,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    /// Percent drawdown at each bar, aligned with `equity_curve`.
    pub drawdown_curve: Vec<EquityPoint>,
    pub starting_capital: f64,
    pub final_equity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_forward: Option<WalkForwardReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<HeatmapReport>,
}

/// Clip the series to the request's optional date range.
fn clip_to_dates(series: &BarSeries, request: &BacktestRequest) -> BarSeries {
    let bars = series.bars();
    let start = match request.start_date {
        Some(date) => bars.partition_point(|bar| bar.date < date),
        None => 0,
    };
    let end = match request.end_date {
        Some(date) => bars.partition_point(|bar| bar.date <= date),
        None => bars.len(),
    };
    series.slice(start, end)
}

/// Validate a request, run it over the series, and compute metrics.
///
/// Monte Carlo, walk-forward, and heatmap reports are attached when the
/// request's `include_*` flags ask for them, using default analyzer
/// settings.
pub fn run_request(
    series: &BarSeries,
    request: &BacktestRequest,
) -> Result<BacktestResponse, RunnerError> {
    request.validate()?;
    let strategy = request.to_strategy_params();
    let exec = request.to_execution_params();
    let clipped = clip_to_dates(series, request);
    let output = run_backtest(&clipped, &strategy, &exec)?;
    let metrics = BacktestMetrics::compute(
        &output.equity_curve,
        &output.trades,
        output.starting_capital,
    );

    let monte_carlo = if request.include_monte_carlo {
        Some(run_monte_carlo(
            &output.trades,
            output.starting_capital,
            &MonteCarloConfig::default(),
        )?)
    } else {
        None
    };
    let walk_forward = if request.include_walk_forward {
        Some(run_walk_forward(
            &clipped,
            &strategy,
            &exec,
            &WalkForwardConfig::default(),
        )?)
    } else {
        None
    };
    let heatmap = if request.include_heatmap {
        Some(run_heatmap(
            &clipped,
            &strategy,
            &exec,
            &HeatmapConfig::default(),
        )?)
    } else {
        None
    };

    Ok(BacktestResponse {
        request: request.clone(),
        metrics,
        drawdown_curve: drawdown_curve(&output.equity_curve),
        trades: output.trades,
        equity_curve: output.equity_curve,
        starting_capital: output.starting_capital,
        final_equity: output.final_equity,
        monte_carlo,
        walk_forward,
        heatmap,
    })
}
