//! Property tests for the analyzers and metric functions.

use chrono::NaiveDate;
use proptest::prelude::*;
use tradelab_core::domain::{ExitReason, TradeDirection, TradeRecord};
use tradelab_runner::metrics;
use tradelab_runner::monte_carlo::{
    percentile, run_monte_carlo, MonteCarloConfig, Resampling,
};
use tradelab_runner::walk_forward::window_ranges;

fn trade(pnl: f64) -> TradeRecord {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    TradeRecord {
        side: TradeDirection::Long,
        entry_bar: 0,
        entry_date: date,
        entry_price: 100.0,
        exit_bar: 1,
        exit_date: date,
        exit_price: 100.0 + pnl,
        size: 1.0,
        pnl,
        pnl_pct: pnl,
        exit_reason: ExitReason::Signal,
    }
}

proptest! {
    #[test]
    fn window_ranges_partition(len in 1usize..500, windows in 1usize..10) {
        prop_assume!(windows <= len);
        let ranges = window_ranges(len, windows);
        prop_assert_eq!(ranges.len(), windows);
        prop_assert_eq!(ranges[0].0, 0);
        prop_assert_eq!(ranges[ranges.len() - 1].1, len);
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].1, pair[1].0);
        }
        for &(start, end) in &ranges {
            prop_assert!(end > start);
        }
    }

    #[test]
    fn shuffle_keeps_total_return_fixed(
        pnls in prop::collection::vec(-100.0f64..100.0, 2..20),
        seed in any::<u64>(),
    ) {
        let trades: Vec<TradeRecord> = pnls.iter().map(|&p| trade(p)).collect();
        let config = MonteCarloConfig {
            simulations: 50,
            resampling: Resampling::Shuffle,
            seed,
        };
        let summary = run_monte_carlo(&trades, 10_000.0, &config).unwrap();
        let expected = pnls.iter().sum::<f64>() / 10_000.0 * 100.0;
        prop_assert!((summary.best_return_pct - expected).abs() < 1e-6);
        prop_assert!((summary.worst_return_pct - expected).abs() < 1e-6);
        prop_assert!((summary.median_return_pct - expected).abs() < 1e-6);
    }

    #[test]
    fn bootstrap_stays_within_extremes(
        pnls in prop::collection::vec(-100.0f64..100.0, 2..15),
        seed in any::<u64>(),
    ) {
        let trades: Vec<TradeRecord> = pnls.iter().map(|&p| trade(p)).collect();
        let config = MonteCarloConfig {
            simulations: 40,
            resampling: Resampling::Bootstrap,
            seed,
        };
        let summary = run_monte_carlo(&trades, 10_000.0, &config).unwrap();
        let n = pnls.len() as f64;
        let max_pnl = pnls.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_pnl = pnls.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assert!(summary.best_return_pct <= n * max_pnl / 10_000.0 * 100.0 + 1e-6);
        prop_assert!(summary.worst_return_pct >= n * min_pnl / 10_000.0 * 100.0 - 1e-6);
        prop_assert!(summary.worst_return_pct <= summary.median_return_pct + 1e-9);
        prop_assert!(summary.median_return_pct <= summary.best_return_pct + 1e-9);
        prop_assert!(summary.p5_return_pct <= summary.median_return_pct + 1e-9);
        prop_assert!(summary.median_return_pct <= summary.p95_return_pct + 1e-9);
        prop_assert!((0.0..=1.0).contains(&summary.probability_of_profit));
    }

    #[test]
    fn percentile_is_monotone_and_bounded(
        mut values in prop::collection::vec(-1e6f64..1e6, 1..50),
        p_low in 0.0f64..100.0,
        p_high in 0.0f64..100.0,
    ) {
        values.sort_by(|a, b| a.total_cmp(b));
        let (lo, hi) = if p_low <= p_high { (p_low, p_high) } else { (p_high, p_low) };
        let v_lo = percentile(&values, lo);
        let v_hi = percentile(&values, hi);
        prop_assert!(v_lo <= v_hi + 1e-9);
        prop_assert!(v_lo >= values[0] - 1e-9);
        prop_assert!(v_hi <= values[values.len() - 1] + 1e-9);
    }

    #[test]
    fn trade_metrics_stay_in_range(
        pnls in prop::collection::vec(-500.0f64..500.0, 0..30),
    ) {
        let trades: Vec<TradeRecord> = pnls.iter().map(|&p| trade(p)).collect();
        let win_rate = metrics::win_rate(&trades);
        prop_assert!((0.0..=100.0).contains(&win_rate));
        prop_assert!(metrics::profit_factor(&trades) >= 0.0);
        prop_assert!(metrics::risk_reward_ratio(&trades) >= 0.0);
        let (best, worst) = metrics::streaks(&trades);
        prop_assert!(best <= trades.len());
        prop_assert!(worst <= trades.len());
    }
}
