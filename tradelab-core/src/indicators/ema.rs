//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (period + 1). Seed: SMA of the first `period` closes.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// EMA over a pre-extracted f64 series, tolerating a leading NaN prefix.
///
/// The seed SMA starts at the first non-NaN value, which lets composed
/// indicators (the MACD signal line) smooth a series that itself has a
/// warm-up window.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    let first_valid = match values.iter().position(|v| !v.is_nan()) {
        Some(i) => i,
        None => return result,
    };

    if n - first_valid < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed_end = first_valid + period;

    let seed = values[first_valid..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let mut prev = seed;
    for i in seed_end..n {
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
