//! Equity curve points and the derived drawdown curve.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One mark-to-market broker value per bar: cash plus any open position
/// valued at the bar close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Derive the drawdown curve from an equity curve.
///
/// Each point carries the percentage decline from the running peak as a
/// non-positive value (0 at new highs), on the same dates as the input.
pub fn drawdown_curve(equity_curve: &[EquityPoint]) -> Vec<EquityPoint> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve
        .iter()
        .map(|point| {
            if point.equity > peak {
                peak = point.equity;
            }
            let dd = if peak > 0.0 {
                (peak - point.equity) / peak * 100.0
            } else {
                0.0
            };
            EquityPoint {
                date: point.date,
                equity: -dd,
            }
        })
        .collect()
}
