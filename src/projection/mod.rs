//! Monte Carlo forward projection
//!
//! Simulates monthly portfolio growth from the expected return and
//! volatility, with optional monthly contributions. Paths run in parallel
//! over rayon; each path draws from its own RNG seeded from
//! (seed, horizon, path index), so results are reproducible regardless of
//! thread scheduling.


use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::config::SimulationConfig;
use crate::types::{money_to_f64, to_money, PortfolioMetrics, ProjectionBand};

pub const PESSIMISTIC_PERCENTILE: f64 = 0.15;
pub const EXPECTED_PERCENTILE: f64 = 0.50;
pub const OPTIMISTIC_PERCENTILE: f64 = 0.85;

/// Source of standard normal variates
pub trait NormalSampler {
    fn next_standard_normal(&mut self) -> f64;
}

/// Box-Muller transform over any uniform RNG
#[derive(Debug, Clone)]
pub struct BoxMuller<R: Rng> {
    rng: R,
    spare: Option<f64>,
}

impl<R: Rng> BoxMuller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, spare: None }
    }
}

impl BoxMuller<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NormalSampler for BoxMuller<R> {
    fn next_standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        let u1 = self.rng.random::<f64>().max(f64::MIN_POSITIVE);
        let u2 = self.rng.random::<f64>();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(radius * angle.sin());
        radius * angle.cos()
    }
}

/// SplitMix64 finalizer, used to derive independent per-path seeds
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

pub fn path_seed(seed: u64, horizon_months: u32, path: usize) -> u64 {
    mix(mix(seed ^ u64::from(horizon_months)) ^ path as u64)
}

/// Sorted-sample percentile: index floor(n * p), clamped to n - 1
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((sorted.len() as f64 * p).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}

#[derive(Debug, Clone)]
pub struct MonteCarloProjector {
    paths: usize,
    seed: u64,
}

impl Default for MonteCarloProjector {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl MonteCarloProjector {
    pub fn new(paths: usize, seed: u64) -> Self {
        Self {
            paths: paths.max(1),
            seed,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.paths, config.seed)
    }

    pub fn paths(&self) -> usize {
        self.paths
    }

    /// Project one horizon with the default seeded Box-Muller sampler
    pub fn project(
        &self,
        metrics: &PortfolioMetrics,
        initial: Decimal,
        monthly_contribution: Decimal,
        horizon_months: u32,
    ) -> ProjectionBand {
        let seed = self.seed;
        self.project_with(metrics, initial, monthly_contribution, horizon_months, |path| {
            BoxMuller::seeded(path_seed(seed, horizon_months, path))
        })
    }

    /// Project one horizon, building each path's sampler with `make_sampler(path_index)`
    pub fn project_with<S, F>(
        &self,
        metrics: &PortfolioMetrics,
        initial: Decimal,
        monthly_contribution: Decimal,
        horizon_months: u32,
        make_sampler: F,
    ) -> ProjectionBand
    where
        S: NormalSampler,
        F: Fn(usize) -> S + Sync,
    {
        let start = money_to_f64(initial);
        let contribution = money_to_f64(monthly_contribution);
        let mu = (1.0 + metrics.expected_return / 100.0).max(0.0).powf(1.0 / 12.0) - 1.0;
        let sigma = metrics.expected_volatility.abs() / 100.0 / 12f64.sqrt();

        let mut terminal: Vec<f64> = (0..self.paths)
            .into_par_iter()
            .map(|path| {
                let mut sampler = make_sampler(path);
                let mut value = start;
                for _ in 0..horizon_months {
                    let z = sampler.next_standard_normal();
                    value = (value * (1.0 + mu + sigma * z)).max(0.0);
                    value += contribution;
                }
                value
            })
            .collect();
        terminal.sort_by(|a, b| a.total_cmp(b));

        let baseline = start + contribution * f64::from(horizon_months);
        let pessimistic = percentile(&terminal, PESSIMISTIC_PERCENTILE);
        let expected = percentile(&terminal, EXPECTED_PERCENTILE);
        let optimistic = percentile(&terminal, OPTIMISTIC_PERCENTILE);
        let losses = terminal.iter().filter(|v| **v < baseline).count();

        let change = |value: f64| {
            if baseline > 0.0 {
                (value / baseline - 1.0) * 100.0
            } else {
                0.0
            }
        };

        tracing::debug!(
            "Projection {}m over {} paths: p15={:.2} p50={:.2} p85={:.2}",
            horizon_months,
            self.paths,
            pessimistic,
            expected,
            optimistic
        );

        ProjectionBand {
            horizon_months,
            pessimistic: to_money(pessimistic),
            expected: to_money(expected),
            optimistic: to_money(optimistic),
            baseline: to_money(baseline),
            pessimistic_change_pct: change(pessimistic),
            expected_change_pct: change(expected),
            optimistic_change_pct: change(optimistic),
            probability_of_loss: losses as f64 / terminal.len() as f64,
        }
    }

    /// Project each horizon from scratch
    pub fn project_horizons(
        &self,
        metrics: &PortfolioMetrics,
        initial: Decimal,
        monthly_contribution: Decimal,
        horizons: &[u32],
    ) -> Vec<ProjectionBand> {
        let bands: Vec<ProjectionBand> = horizons
            .iter()
            .map(|&h| self.project(metrics, initial, monthly_contribution, h))
            .collect();
        tracing::info!("Projected {} horizon(s) over {} paths", bands.len(), self.paths);
        bands
    }
}
