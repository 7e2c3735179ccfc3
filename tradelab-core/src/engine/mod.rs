//! Backtesting engine — execution model, portfolio state, and the bar loop.

pub mod execution;
pub mod loop_runner;
pub mod portfolio;

pub use execution::{ExecutionParams, SameBarTieBreak};
pub use loop_runner::{run_backtest, RunOutput};
pub use portfolio::Portfolio;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("bar series is empty")]
    NoData,
}
