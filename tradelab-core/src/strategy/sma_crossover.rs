//! Fast/slow moving-average crossover.
//!
//! Golden cross (fast crosses above slow) enters long when flat and exits
//! a short; death cross does the reverse. Reversal takes two bars: the
//! cross bar exits, a later cross re-enters.

use crate::domain::{Position, TradeDirection};

use super::{crossed_above, Signal};

pub(crate) fn evaluate(
    i: usize,
    fast: &[f64],
    slow: &[f64],
    position: Option<&Position>,
) -> Option<Signal> {
    let cross_up = crossed_above(fast, slow, i);
    let cross_down = crossed_above(slow, fast, i);

    match position {
        Some(pos) => match pos.side {
            TradeDirection::Long if cross_down => Some(Signal::Exit),
            TradeDirection::Short if cross_up => Some(Signal::Exit),
            _ => None,
        },
        None if cross_up => Some(Signal::EnterLong),
        None if cross_down => Some(Signal::EnterShort),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn position(side: TradeDirection) -> Position {
        Position {
            side,
            entry_bar: 0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entry_price: 100.0,
            size: 10.0,
        }
    }

    #[test]
    fn golden_cross_enters_long() {
        let fast = [9.0, 11.0];
        let slow = [10.0, 10.0];
        assert_eq!(evaluate(1, &fast, &slow, None), Some(Signal::EnterLong));
    }

    #[test]
    fn death_cross_enters_short() {
        let fast = [11.0, 9.0];
        let slow = [10.0, 10.0];
        assert_eq!(evaluate(1, &fast, &slow, None), Some(Signal::EnterShort));
    }

    #[test]
    fn death_cross_exits_long() {
        let fast = [11.0, 9.0];
        let slow = [10.0, 10.0];
        let pos = position(TradeDirection::Long);
        assert_eq!(evaluate(1, &fast, &slow, Some(&pos)), Some(Signal::Exit));
    }

    #[test]
    fn golden_cross_exits_short() {
        let fast = [9.0, 11.0];
        let slow = [10.0, 10.0];
        let pos = position(TradeDirection::Short);
        assert_eq!(evaluate(1, &fast, &slow, Some(&pos)), Some(Signal::Exit));
    }

    #[test]
    fn no_signal_without_cross() {
        let fast = [11.0, 12.0];
        let slow = [10.0, 10.0];
        assert_eq!(evaluate(1, &fast, &slow, None), None);
        let pos = position(TradeDirection::Long);
        assert_eq!(evaluate(1, &fast, &slow, Some(&pos)), None);
    }

    #[test]
    fn touching_then_separating_counts_as_cross() {
        // Equality on the previous bar still arms the crossing.
        let fast = [10.0, 11.0];
        let slow = [10.0, 10.0];
        assert_eq!(evaluate(1, &fast, &slow, None), Some(Signal::EnterLong));
    }
}
