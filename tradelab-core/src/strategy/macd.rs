//! MACD line vs signal line crossover.
//!
//! Bullish cross (MACD crosses above signal) enters long when flat and
//! exits a short; bearish cross mirrors it.

use crate::domain::{Position, TradeDirection};

use super::{crossed_above, Signal};

pub(crate) fn evaluate(
    i: usize,
    macd: &[f64],
    signal: &[f64],
    position: Option<&Position>,
) -> Option<Signal> {
    let bullish = crossed_above(macd, signal, i);
    let bearish = crossed_above(signal, macd, i);

    match position {
        Some(pos) => match pos.side {
            TradeDirection::Long if bearish => Some(Signal::Exit),
            TradeDirection::Short if bullish => Some(Signal::Exit),
            _ => None,
        },
        None if bullish => Some(Signal::EnterLong),
        None if bearish => Some(Signal::EnterShort),
        None => None,
    }
}
