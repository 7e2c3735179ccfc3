//! Open position state and the enums that control how one is opened.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of an open position or closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    /// +1.0 for long, -1.0 for short. P&L is `(exit - entry) * size * sign`.
    pub fn sign(&self) -> f64 {
        match self {
            TradeDirection::Long => 1.0,
            TradeDirection::Short => -1.0,
        }
    }
}

/// Which entry signals the position manager is allowed to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionMode {
    Long,
    Short,
    Both,
}

impl DirectionMode {
    pub fn allows(&self, direction: TradeDirection) -> bool {
        match self {
            DirectionMode::Both => true,
            DirectionMode::Long => direction == TradeDirection::Long,
            DirectionMode::Short => direction == TradeDirection::Short,
        }
    }
}

/// Position sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSizing {
    /// A fixed number of lots per entry.
    Fixed { lots: f64 },
    /// `floor(equity * fraction / fill_price)` shares per entry.
    PercentOfEquity { fraction: f64 },
}

impl PositionSizing {
    /// Shares for a new entry. Zero means the entry is skipped.
    pub fn size_for(&self, equity: f64, fill_price: f64) -> f64 {
        match *self {
            PositionSizing::Fixed { lots } => lots,
            PositionSizing::PercentOfEquity { fraction } => {
                if fill_price <= 0.0 {
                    return 0.0;
                }
                (equity * fraction / fill_price).floor()
            }
        }
    }
}

/// Transient open position — at most one per run at any time.
///
/// Created on entry, destroyed on exit (converted into a `TradeRecord`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub side: TradeDirection,
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub size: f64,
}

impl Position {
    /// Unrealized P&L at the given mark price.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.size * self.side.sign()
    }

    /// Signed return fraction at the given mark price (positive = in favor).
    pub fn return_fraction(&self, price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (price - self.entry_price) / self.entry_price * self.side.sign()
    }
}
