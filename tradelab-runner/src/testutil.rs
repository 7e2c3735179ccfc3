//! Shared helpers for unit tests in this crate.

use chrono::NaiveDate;
use tradelab_core::domain::{Bar, BarSeries, ExitReason, TradeDirection, TradeRecord};

/// Build a daily bar series from close prices.
///
/// open = previous close, high/low pad the open-close range by 1.0,
/// volume 1000, dates counting up from 2024-01-02.
pub fn make_series(closes: &[f64]) -> BarSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();
    BarSeries::from_bars(bars).unwrap()
}

/// A closed trade with the given P&L; other fields are placeholders.
pub fn trade(pnl: f64) -> TradeRecord {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    TradeRecord {
        side: TradeDirection::Long,
        entry_bar: 0,
        entry_date: date,
        entry_price: 100.0,
        exit_bar: 1,
        exit_date: date,
        exit_price: 100.0 + pnl,
        size: 1.0,
        pnl,
        pnl_pct: pnl,
        exit_reason: ExitReason::Signal,
    }
}
