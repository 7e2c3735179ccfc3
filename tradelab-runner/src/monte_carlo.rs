//! Monte Carlo analysis over the closed-trade P&L sequence.
//!
//! Each simulation reorders (or bootstrap-resamples) the trade P&L list,
//! rebuilds the equity path from starting capital, and records the total
//! return and the deepest drawdown along the way. Shuffling preserves the
//! total return (the sum is order-independent) but not the drawdown;
//! bootstrap varies both.
//!
//! Simulations are independent and fan out across the rayon pool. Each
//! draws its RNG from the master seed plus its own index, so results are
//! identical regardless of thread scheduling.
//!
//! Fewer than 2 trades leaves nothing to resample: the summary collapses
//! to the single deterministic outcome instead of failing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradelab_core::domain::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resampling {
    /// Permute the observed trades; every simulation uses each trade once.
    #[default]
    Shuffle,
    /// Sample trades with replacement.
    Bootstrap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub simulations: usize,
    pub resampling: Resampling,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            simulations: 1000,
            resampling: Resampling::Shuffle,
            seed: 42,
        }
    }
}

/// One point of the return distribution, sampled every 5th percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionPoint {
    pub percentile: u8,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    /// Requested simulation count, echoed from the config.
    pub simulations: usize,
    pub starting_capital: f64,
    pub best_return_pct: f64,
    pub worst_return_pct: f64,
    pub median_return_pct: f64,
    pub p5_return_pct: f64,
    pub p95_return_pct: f64,
    /// Fraction of simulations ending above starting capital.
    pub probability_of_profit: f64,
    /// Median of per-path deepest drawdowns, in percent (<= 0).
    pub median_max_drawdown: f64,
    /// Worst per-path deepest drawdown across all simulations.
    pub worst_max_drawdown: f64,
    /// Total return at percentiles 0, 5, ..., 100.
    pub distribution: Vec<DistributionPoint>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonteCarloError {
    #[error("monte carlo needs at least 1 simulation")]
    NoSimulations,
}

/// Run the full Monte Carlo analysis over a trade list.
pub fn run_monte_carlo(
    trades: &[TradeRecord],
    starting_capital: f64,
    config: &MonteCarloConfig,
) -> Result<MonteCarloSummary, MonteCarloError> {
    if config.simulations == 0 {
        return Err(MonteCarloError::NoSimulations);
    }
    let pnls: Vec<f64> = trades.iter().map(|trade| trade.pnl).collect();

    // With 0 or 1 trades every permutation is the identity.
    let paths: Vec<(f64, f64)> = if pnls.len() < 2 {
        vec![walk_path(starting_capital, &pnls)]
    } else {
        (0..config.simulations)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let sampled = resample(&pnls, config.resampling, &mut rng);
                walk_path(starting_capital, &sampled)
            })
            .collect()
    };

    let mut returns: Vec<f64> = paths
        .iter()
        .map(|&(final_equity, _)| (final_equity - starting_capital) / starting_capital * 100.0)
        .collect();
    let mut drawdowns: Vec<f64> = paths.iter().map(|&(_, drawdown)| drawdown).collect();
    returns.sort_by(|a, b| a.total_cmp(b));
    drawdowns.sort_by(|a, b| a.total_cmp(b));

    let profitable = returns.iter().filter(|&&r| r > 0.0).count();
    let distribution = (0..=100)
        .step_by(5)
        .map(|p| DistributionPoint {
            percentile: p as u8,
            return_pct: percentile(&returns, p as f64),
        })
        .collect();

    Ok(MonteCarloSummary {
        // Echoes the request even when <2 trades collapse to one path.
        simulations: config.simulations,
        starting_capital,
        best_return_pct: returns[returns.len() - 1],
        worst_return_pct: returns[0],
        median_return_pct: percentile(&returns, 50.0),
        p5_return_pct: percentile(&returns, 5.0),
        p95_return_pct: percentile(&returns, 95.0),
        probability_of_profit: profitable as f64 / returns.len() as f64,
        median_max_drawdown: percentile(&drawdowns, 50.0),
        worst_max_drawdown: drawdowns[0],
        distribution,
    })
}

fn resample(pnls: &[f64], resampling: Resampling, rng: &mut StdRng) -> Vec<f64> {
    match resampling {
        Resampling::Shuffle => {
            let mut sampled = pnls.to_vec();
            sampled.shuffle(rng);
            sampled
        }
        Resampling::Bootstrap => (0..pnls.len())
            .map(|_| pnls[rng.gen_range(0..pnls.len())])
            .collect(),
    }
}

/// (final equity, deepest percent drawdown) of one cumulative P&L path.
fn walk_path(starting_capital: f64, pnls: &[f64]) -> (f64, f64) {
    let mut equity = starting_capital;
    let mut peak = starting_capital;
    let mut worst = 0.0_f64;
    for pnl in pnls {
        equity += pnl;
        peak = peak.max(equity);
        if peak > 0.0 {
            worst = worst.min((equity - peak) / peak * 100.0);
        }
    }
    (equity, worst)
}

/// Linear-interpolation percentile over a sorted slice.
///
/// rank = p/100 * (n-1); fractional ranks interpolate between neighbors.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = rank - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}
