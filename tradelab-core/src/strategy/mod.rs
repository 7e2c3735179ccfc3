//! Strategy evaluators — five closed-dispatch rule sets.
//!
//! Each variant is a pure function `(bars, index, indicator set, current
//! position) -> Option<Signal>`. Dispatch is a closed enum rather than
//! trait objects: the strategy catalog is fixed, every evaluator is
//! independently testable, and no shared mutable base state exists.
//!
//! Evaluators never act before their indicators are defined (NaN values
//! produce no signal), which enforces the warm-up contract.

pub mod bollinger;
pub mod macd;
pub mod rsi;
pub mod sma_crossover;
pub mod vwap_ma_volume;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Position};
use crate::indicators::{Bollinger, Indicator, Macd, Rsi, Sma, VolumeSma, Vwap};

/// Signal emitted by a strategy evaluator for one bar.
///
/// Absence of a signal is `None` at the `Option` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    EnterLong,
    EnterShort,
    Exit,
}

/// Per-strategy configuration. Defaults match the shipped catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyParams {
    VwapMaVolume {
        vwap_period: usize,
        ma_period: usize,
        volume_period: usize,
        volume_mult: f64,
    },
    SmaCrossover {
        fast_period: usize,
        slow_period: usize,
    },
    Rsi {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
    Macd {
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    },
    BollingerBands {
        period: usize,
        std_dev_mult: f64,
    },
}

/// Indicator columns precomputed for the active strategy, one value per bar.
#[derive(Debug, Clone)]
pub enum IndicatorSet {
    VwapMaVolume {
        vwap: Vec<f64>,
        ma: Vec<f64>,
        volume_avg: Vec<f64>,
    },
    SmaCrossover {
        fast: Vec<f64>,
        slow: Vec<f64>,
    },
    Rsi {
        rsi: Vec<f64>,
    },
    Macd {
        macd: Vec<f64>,
        signal: Vec<f64>,
    },
    Bollinger {
        upper: Vec<f64>,
        middle: Vec<f64>,
        lower: Vec<f64>,
    },
}

impl StrategyParams {
    pub fn vwap_ma_volume() -> Self {
        StrategyParams::VwapMaVolume {
            vwap_period: 14,
            ma_period: 200,
            volume_period: 20,
            volume_mult: 1.5,
        }
    }

    pub fn sma_crossover() -> Self {
        StrategyParams::SmaCrossover {
            fast_period: 10,
            slow_period: 50,
        }
    }

    pub fn rsi() -> Self {
        StrategyParams::Rsi {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }

    pub fn macd() -> Self {
        StrategyParams::Macd {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }

    pub fn bollinger_bands() -> Self {
        StrategyParams::BollingerBands {
            period: 20,
            std_dev_mult: 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyParams::VwapMaVolume { .. } => "vwap_ma_volume",
            StrategyParams::SmaCrossover { .. } => "sma_crossover",
            StrategyParams::Rsi { .. } => "rsi",
            StrategyParams::Macd { .. } => "macd",
            StrategyParams::BollingerBands { .. } => "bollinger_bands",
        }
    }

    /// Number of leading bars before the strategy can emit any signal.
    ///
    /// Crossover-style strategies need one extra bar beyond the indicator
    /// lookback for the previous-bar comparison.
    pub fn warmup_bars(&self) -> usize {
        match *self {
            StrategyParams::VwapMaVolume {
                vwap_period,
                ma_period,
                volume_period,
                ..
            } => Vwap::new(vwap_period)
                .lookback()
                .max(Sma::new(ma_period).lookback())
                .max(VolumeSma::new(volume_period).lookback()),
            StrategyParams::SmaCrossover {
                fast_period,
                slow_period,
            } => Sma::new(fast_period)
                .lookback()
                .max(Sma::new(slow_period).lookback())
                + 1,
            StrategyParams::Rsi { period, .. } => Rsi::new(period).lookback() + 1,
            StrategyParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => Macd::new(fast_period, slow_period, signal_period).lookback() + 1,
            StrategyParams::BollingerBands { period, .. } => {
                Bollinger::middle(period, 1.0).lookback() + 1
            }
        }
    }

    /// Precompute every indicator column this strategy needs — one forward
    /// pass per column, O(n) total.
    pub fn compute_indicators(&self, bars: &[Bar]) -> IndicatorSet {
        match *self {
            StrategyParams::VwapMaVolume {
                vwap_period,
                ma_period,
                volume_period,
                ..
            } => IndicatorSet::VwapMaVolume {
                vwap: Vwap::new(vwap_period).compute(bars),
                ma: Sma::new(ma_period).compute(bars),
                volume_avg: VolumeSma::new(volume_period).compute(bars),
            },
            StrategyParams::SmaCrossover {
                fast_period,
                slow_period,
            } => IndicatorSet::SmaCrossover {
                fast: Sma::new(fast_period).compute(bars),
                slow: Sma::new(slow_period).compute(bars),
            },
            StrategyParams::Rsi { period, .. } => IndicatorSet::Rsi {
                rsi: Rsi::new(period).compute(bars),
            },
            StrategyParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => {
                let (macd, signal) =
                    Macd::new(fast_period, slow_period, signal_period).compute_lines(bars);
                IndicatorSet::Macd { macd, signal }
            }
            StrategyParams::BollingerBands {
                period,
                std_dev_mult,
            } => IndicatorSet::Bollinger {
                upper: Bollinger::upper(period, std_dev_mult).compute(bars),
                middle: Bollinger::middle(period, std_dev_mult).compute(bars),
                lower: Bollinger::lower(period, std_dev_mult).compute(bars),
            },
        }
    }

    /// Evaluate the strategy at bar `i`.
    ///
    /// `indicators` must have been produced by `compute_indicators` on the
    /// same bars; a mismatched set yields no signal.
    pub fn evaluate(
        &self,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorSet,
        position: Option<&Position>,
    ) -> Option<Signal> {
        match (self, indicators) {
            (
                StrategyParams::VwapMaVolume { volume_mult, .. },
                IndicatorSet::VwapMaVolume {
                    vwap,
                    ma,
                    volume_avg,
                },
            ) => vwap_ma_volume::evaluate(bars, i, vwap, ma, volume_avg, *volume_mult, position),
            (StrategyParams::SmaCrossover { .. }, IndicatorSet::SmaCrossover { fast, slow }) => {
                sma_crossover::evaluate(i, fast, slow, position)
            }
            (
                StrategyParams::Rsi {
                    oversold,
                    overbought,
                    ..
                },
                IndicatorSet::Rsi { rsi },
            ) => rsi::evaluate(i, rsi, *oversold, *overbought, position),
            (StrategyParams::Macd { .. }, IndicatorSet::Macd { macd, signal }) => {
                macd::evaluate(i, macd, signal, position)
            }
            (
                StrategyParams::BollingerBands { .. },
                IndicatorSet::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            ) => bollinger::evaluate(bars, i, upper, middle, lower, position),
            _ => {
                debug_assert!(false, "indicator set does not match strategy");
                None
            }
        }
    }
}

/// True when series `a` crossed above series `b` between bars `i-1` and `i`.
///
/// NaN on either bar (warm-up) means no crossing.
pub(crate) fn crossed_above(a: &[f64], b: &[f64], i: usize) -> bool {
    if i == 0 {
        return false;
    }
    let (pa, pb, ca, cb) = (a[i - 1], b[i - 1], a[i], b[i]);
    if pa.is_nan() || pb.is_nan() || ca.is_nan() || cb.is_nan() {
        return false;
    }
    pa <= pb && ca > cb
}
