//! Execution parameters and fill pricing.
//!
//! All orders fill at bar prices adjusted for symmetric percentage
//! slippage: entries fill against the trader (long entries above the
//! reference price, short entries below), exits likewise. Commission is a
//! flat per-order charge, so a round trip pays it twice.

use serde::{Deserialize, Serialize};

use crate::domain::{DirectionMode, PositionSizing, TradeDirection};

/// Resolution order when a bar's range touches both the stop-loss and the
/// take-profit threshold.
///
/// Daily bars carry no intrabar ordering, so the conservative default
/// assumes the stop was hit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameBarTieBreak {
    #[default]
    StopLossFirst,
    TakeProfitFirst,
}

/// Everything the engine needs to know about order handling, independent
/// of the strategy being run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Stop-loss distance from entry, in percent (2.0 = 2%).
    pub stop_loss_pct: f64,
    /// Take-profit distance from entry, in percent.
    pub take_profit_pct: f64,
    pub direction: DirectionMode,
    pub sizing: PositionSizing,
    /// Per-fill slippage, in percent of the reference price.
    pub slippage_pct: f64,
    /// Flat commission charged on every fill.
    pub commission_per_trade: f64,
    pub starting_capital: f64,
    #[serde(default)]
    pub tie_break: SameBarTieBreak,
}

impl ExecutionParams {
    /// Price at which an entry order fills, given the bar reference price.
    pub fn entry_fill(&self, price: f64, side: TradeDirection) -> f64 {
        let slip = self.slippage_pct / 100.0;
        match side {
            TradeDirection::Long => price * (1.0 + slip),
            TradeDirection::Short => price * (1.0 - slip),
        }
    }

    /// Price at which an exit order fills, given the bar reference price.
    pub fn exit_fill(&self, price: f64, side: TradeDirection) -> f64 {
        let slip = self.slippage_pct / 100.0;
        match side {
            TradeDirection::Long => price * (1.0 - slip),
            TradeDirection::Short => price * (1.0 + slip),
        }
    }

    /// Stop-loss threshold price for a position opened at `entry_price`.
    pub fn stop_price(&self, entry_price: f64, side: TradeDirection) -> f64 {
        let frac = self.stop_loss_pct / 100.0;
        match side {
            TradeDirection::Long => entry_price * (1.0 - frac),
            TradeDirection::Short => entry_price * (1.0 + frac),
        }
    }

    /// Take-profit threshold price for a position opened at `entry_price`.
    pub fn take_profit_price(&self, entry_price: f64, side: TradeDirection) -> f64 {
        let frac = self.take_profit_pct / 100.0;
        match side {
            TradeDirection::Long => entry_price * (1.0 + frac),
            TradeDirection::Short => entry_price * (1.0 - frac),
        }
    }
}
