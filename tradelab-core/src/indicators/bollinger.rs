//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N), computed in a single pass from
//! running sum and sum of squares.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let suffix = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{suffix}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
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

        let p = self.period as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for i in 0..n {
            let close = bars[i].close;
            sum += close;
            sum_sq += close * close;
            if i >= self.period {
                let old = bars[i - self.period].close;
                sum -= old;
                sum_sq -= old * old;
            }
            if i + 1 < self.period {
                continue;
            }

            let mean = sum / p;
            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    // E[x^2] - E[x]^2 can dip fractionally below zero on
                    // flat windows; clamp before the sqrt.
                    let variance = (sum_sq / p - mean * mean).max(0.0);
                    let offset = self.multiplier * variance.sqrt();
                    match self.band {
                        BollingerBand::Upper => mean + offset,
                        _ => mean - offset,
                    }
                }
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use proptest::prelude::*;

    #[test]
    fn middle_band_is_sma() {
        let bars = make_bars(&[10.0, 12.0, 14.0, 16.0]);
        let result = Bollinger::middle(3, 2.0).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 12.0, DEFAULT_EPSILON);
        assert_approx(result[3], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_known_values() {
        // Window [10, 12, 14]: mean 12, population variance = 8/3, stddev = sqrt(8/3)
        let bars = make_bars(&[10.0, 12.0, 14.0]);
        let stddev = (8.0_f64 / 3.0).sqrt();
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        assert_approx(upper[2], 12.0 + 2.0 * stddev, DEFAULT_EPSILON);
        assert_approx(lower[2], 12.0 - 2.0 * stddev, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_collapse_on_flat_series() {
        let bars = make_bars(&[100.0; 5]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = Bollinger::middle(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        assert_approx(upper[4], 100.0, DEFAULT_EPSILON);
        assert_approx(middle[4], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[4], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn upper_above_lower() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        for i in 2..bars.len() {
            assert!(upper[i] >= lower[i], "bands inverted at {i}");
        }
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }

    proptest! {
        #[test]
        fn running_sums_match_direct_window_math(
            closes in prop::collection::vec(10.0f64..1000.0, 1..60),
            period in 1usize..10,
        ) {
            let bars = make_bars(&closes);
            let upper = Bollinger::upper(period, 2.0).compute(&bars);
            for i in 0..bars.len() {
                if i + 1 < period {
                    prop_assert!(upper[i].is_nan());
                } else {
                    let window = &closes[(i + 1 - period)..=i];
                    let mean = window.iter().sum::<f64>() / period as f64;
                    let variance = window
                        .iter()
                        .map(|c| (c - mean) * (c - mean))
                        .sum::<f64>()
                        / period as f64;
                    let expected = mean + 2.0 * variance.sqrt();
                    prop_assert!((upper[i] - expected).abs() < 1e-6);
                }
            }
        }
    }
}
