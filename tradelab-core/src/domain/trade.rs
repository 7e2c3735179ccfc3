//! TradeRecord — a completed round-trip trade.

use super::position::TradeDirection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// The strategy produced an exit (or opposing) signal.
    Signal,
    /// Forced close at the final bar so equity and trade count stay defined.
    EndOfData,
}

/// A complete round-trip trade record: entry → exit.
///
/// Immutable once closed — appended to the run's trade list and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: TradeDirection,

    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    pub size: f64,

    /// Net P&L: `(exit - entry) * size * sign` minus both commissions.
    pub pnl: f64,
    /// Net P&L as a percentage of entry notional.
    pub pnl_pct: f64,

    pub exit_reason: ExitReason,
}

impl TradeRecord {
    /// Winners are strictly positive; `pnl == 0` counts as a loss so that
    /// win rate and loss share always sum to 100%.
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }
}
