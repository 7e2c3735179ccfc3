//! VWAP + trend filter + volume confirmation.
//!
//! Entries require all three conditions on the same bar:
//! - close on the favorable side of VWAP,
//! - close on the same side of the long moving average (trend filter),
//! - volume above `volume_mult` times its rolling average (participation).
//!
//! This strategy never emits exit signals; positions leave only through
//! their stop-loss and take-profit brackets.

use crate::domain::{Bar, Position};

use super::Signal;

pub(crate) fn evaluate(
    bars: &[Bar],
    i: usize,
    vwap: &[f64],
    ma: &[f64],
    volume_avg: &[f64],
    volume_mult: f64,
    position: Option<&Position>,
) -> Option<Signal> {
    if position.is_some() {
        return None;
    }
    let (v, m, va) = (vwap[i], ma[i], volume_avg[i]);
    if v.is_nan() || m.is_nan() || va.is_nan() {
        return None;
    }

    let volume_spike = bars[i].volume as f64 > volume_mult * va;
    if !volume_spike {
        return None;
    }
    let close = bars[i].close;
    if close > v && close > m {
        Some(Signal::EnterLong)
    } else if close < v && close < m {
        Some(Signal::EnterShort)
    } else {
        None
    }
}
