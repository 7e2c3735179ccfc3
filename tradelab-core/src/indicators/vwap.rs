//! Volume-Weighted Average Price over a trailing window.
//!
//! VWAP[i] = Σ(close·volume) / Σ(volume) over the last `period` bars.
//! Lookback: period - 1. A window with zero total volume yields NaN.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Vwap {
    period: usize,
    name: String,
}

impl Vwap {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "VWAP period must be >= 1");
        Self {
            period,
            name: format!("vwap_{period}"),
        }
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut pv_sum = 0.0;
        let mut vol_sum = 0.0;
        for bar in bars.iter().take(self.period) {
            pv_sum += bar.close * bar.volume as f64;
            vol_sum += bar.volume as f64;
        }
        result[self.period - 1] = ratio(pv_sum, vol_sum);

        for i in self.period..n {
            let leaving = &bars[i - self.period];
            let entering = &bars[i];
            pv_sum = pv_sum - leaving.close * leaving.volume as f64
                + entering.close * entering.volume as f64;
            vol_sum = vol_sum - leaving.volume as f64 + entering.volume as f64;
            result[i] = ratio(pv_sum, vol_sum);
        }

        result
    }
}

fn ratio(pv_sum: f64, vol_sum: f64) -> f64 {
    if vol_sum > 0.0 {
        pv_sum / vol_sum
    } else {
        f64::NAN
    }
}
