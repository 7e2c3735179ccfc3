//! TradeLab Runner — run orchestration, metrics, and robustness analyzers.
//!
//! Builds on `tradelab-core` to provide:
//! - Request validation and translation into engine parameters
//! - Single-backtest runner producing metrics and curves
//! - Monte Carlo resampling of the trade sequence
//! - Walk-forward window analysis
//! - Stop-loss / take-profit heatmap sweeps
//! - CSV / JSON export

pub mod export;
pub mod heatmap;
pub mod metrics;
pub mod monte_carlo;
pub mod request;
pub mod runner;
pub mod walk_forward;

#[cfg(test)]
pub(crate) mod testutil;

pub use export::{equity_to_csv, response_to_json, trades_to_csv, ExportError};
pub use heatmap::{run_heatmap, HeatmapCell, HeatmapConfig, HeatmapError, HeatmapReport};
pub use metrics::BacktestMetrics;
pub use monte_carlo::{
    run_monte_carlo, MonteCarloConfig, MonteCarloError, MonteCarloSummary, Resampling,
};
pub use request::{BacktestRequest, PositionType, RequestError, StrategyName};
pub use runner::{run_request, BacktestResponse, RunnerError};
pub use walk_forward::{
    run_walk_forward, window_ranges, WalkForwardConfig, WalkForwardError, WalkForwardReport,
    WindowResult,
};
