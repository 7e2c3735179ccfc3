//! RSI mean reversion.
//!
//! Entries fire on threshold crossings: long when RSI recovers up through
//! the oversold level, short when it falls down through the overbought
//! level. Sitting below oversold for ten bars fires once, on the bar the
//! level is reclaimed. Exits are level checks: a long leaves as soon as
//! RSI reaches overbought, a short as soon as it reaches oversold.

use crate::domain::{Position, TradeDirection};

use super::Signal;

pub(crate) fn evaluate(
    i: usize,
    rsi: &[f64],
    oversold: f64,
    overbought: f64,
    position: Option<&Position>,
) -> Option<Signal> {
    let cur = rsi[i];
    if cur.is_nan() {
        return None;
    }

    if let Some(pos) = position {
        return match pos.side {
            TradeDirection::Long if cur >= overbought => Some(Signal::Exit),
            TradeDirection::Short if cur <= oversold => Some(Signal::Exit),
            _ => None,
        };
    }

    if i == 0 {
        return None;
    }
    let prev = rsi[i - 1];
    if prev.is_nan() {
        return None;
    }
    if prev <= oversold && cur > oversold {
        Some(Signal::EnterLong)
    } else if prev >= overbought && cur < overbought {
        Some(Signal::EnterShort)
    } else {
        None
    }
}
