//! Bar — the fundamental market data unit — and the ordered series of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single ticker over a single interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLCV sanity check: high bounds the body from above, low from below.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Errors from `BarSeries` construction.
#[derive(Debug, Error)]
pub enum BarSeriesError {
    #[error("bar {index} is not in strictly increasing date order")]
    OutOfOrder { index: usize },
    #[error("bar {index} fails the OHLC sanity check")]
    InvalidBar { index: usize },
}

/// Ordered, immutable bar sequence for one ticker/interval/date-range.
///
/// Construction validates strictly increasing dates and per-bar OHLC sanity;
/// after that the series is read-only and may be shared across concurrent
/// analyzer units without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, BarSeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(BarSeriesError::InvalidBar { index });
            }
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(BarSeriesError::OutOfOrder { index });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Sub-series over bar indices `[start, end)`, clamped to the data.
    ///
    /// Ordering was validated at construction, so the slice is trivially
    /// valid and no re-validation happens.
    pub fn slice(&self, start: usize, end: usize) -> BarSeries {
        let end = end.min(self.bars.len());
        let start = start.min(end);
        BarSeries {
            bars: self.bars[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar(day: u32) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar(2).is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar(2);
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn series_accepts_ordered_bars() {
        let series = BarSeries::from_bars(vec![sample_bar(2), sample_bar(3), sample_bar(4)]);
        assert_eq!(series.unwrap().len(), 3);
    }

    #[test]
    fn series_rejects_out_of_order() {
        let result = BarSeries::from_bars(vec![sample_bar(3), sample_bar(2)]);
        assert!(matches!(result, Err(BarSeriesError::OutOfOrder { index: 1 })));
    }

    #[test]
    fn series_rejects_duplicate_date() {
        let result = BarSeries::from_bars(vec![sample_bar(2), sample_bar(2)]);
        assert!(matches!(result, Err(BarSeriesError::OutOfOrder { index: 1 })));
    }

    #[test]
    fn series_rejects_invalid_bar() {
        let mut bad = sample_bar(3);
        bad.low = 110.0;
        let result = BarSeries::from_bars(vec![sample_bar(2), bad]);
        assert!(matches!(result, Err(BarSeriesError::InvalidBar { index: 1 })));
    }

    #[test]
    fn slice_clamps_out_of_bounds() {
        let series =
            BarSeries::from_bars(vec![sample_bar(2), sample_bar(3), sample_bar(4)]).unwrap();
        let sliced = series.slice(1, 100);
        assert_eq!(sliced.len(), 2);
        assert_eq!(sliced.bars()[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar(2);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar.date, deser.date);
        assert_eq!(bar.close, deser.close);
        assert_eq!(bar.volume, deser.volume);
    }
}
