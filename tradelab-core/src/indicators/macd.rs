//! MACD — difference of two EMAs plus an EMA signal line.
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal) of the MACD
//! line. The signal line's warm-up composes both lookbacks: the MACD line
//! is defined from index slow-1, so the signal line is defined from index
//! slow-1 + signal-1.

use super::ema::ema_of_series;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(
            fast_period >= 1 && slow_period >= 1 && signal_period >= 1,
            "MACD periods must be >= 1"
        );
        assert!(
            fast_period < slow_period,
            "MACD fast period must be < slow period"
        );
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Leading bars before the signal line is defined.
    pub fn lookback(&self) -> usize {
        self.slow_period - 1 + self.signal_period - 1
    }

    /// Compute `(macd_line, signal_line)` in one pass over the series.
    pub fn compute_lines(&self, bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let fast = ema_of_series(&closes, self.fast_period);
        let slow = ema_of_series(&closes, self.slow_period);

        let macd_line: Vec<f64> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| f - s) // NaN until both EMAs are defined
            .collect();

        let signal_line = ema_of_series(&macd_line, self.signal_period);
        (macd_line, signal_line)
    }
}
