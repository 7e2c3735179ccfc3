//! Bollinger band mean reversion.
//!
//! Enter long on the bar the close first touches or breaks the lower
//! band, short on the upper-band mirror. Positions exit when the close
//! comes back to the middle band (the reversion target). The previous
//! close is compared against the current bar's band, so a touch fires
//! once instead of on every bar spent outside the band.

use crate::domain::{Bar, Position, TradeDirection};

use super::Signal;

pub(crate) fn evaluate(
    bars: &[Bar],
    i: usize,
    upper: &[f64],
    middle: &[f64],
    lower: &[f64],
    position: Option<&Position>,
) -> Option<Signal> {
    if i == 0 {
        return None;
    }
    if upper[i].is_nan() || middle[i].is_nan() || lower[i].is_nan() {
        return None;
    }
    let prev = bars[i - 1].close;
    let cur = bars[i].close;

    match position {
        Some(pos) => match pos.side {
            TradeDirection::Long if cur >= middle[i] && prev < middle[i] => Some(Signal::Exit),
            TradeDirection::Short if cur <= middle[i] && prev > middle[i] => Some(Signal::Exit),
            _ => None,
        },
        None => {
            if cur <= lower[i] && prev > lower[i] {
                Some(Signal::EnterLong)
            } else if cur >= upper[i] && prev < upper[i] {
                Some(Signal::EnterShort)
            } else {
                None
            }
        }
    }
}
