//! Constrained weight allocator
//!
//! Weights start proportional to objective-adjusted scores, are penalized for
//! highly correlated pairs, then clamped into the profile's per-asset bounds
//! with a water-filling pass. Aggressive or growth strategies get one extra
//! pass that shifts weight from the lower half toward the top-ranked asset.

use thiserror::Error;

use super::correlation::CorrelationMatrix;
use crate::error::Error;
use crate::types::{AssetClass, Objective, ScoreResult, StrategyConfig};

/// Correlation above which the weaker asset of a pair is penalized
pub const HIGH_CORRELATION: f64 = 0.8;
/// Weight shrink per unit of correlation above [`HIGH_CORRELATION`]
const CORRELATION_PENALTY: f64 = 0.3;
/// Share of its own weight a lower-half asset gives to the top asset
const REDISTRIBUTION_SHARE: f64 = 0.2;
/// Sharpe assumed when an asset has none
const NEUTRAL_SHARPE: f64 = 0.5;
const MIN_ADJUSTED_SCORE: f64 = 0.05;
const TOLERANCE: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("Cannot allocate an empty selection")]
    Empty,

    #[error("Dimension mismatch: {assets} assets but a {matrix}x{matrix} correlation matrix")]
    DimensionMismatch { assets: usize, matrix: usize },

    #[error("Infeasible bounds: {count} assets cannot satisfy per-asset weights in [{min}, {max}]")]
    InfeasibleBounds { count: usize, min: f64, max: f64 },

    #[error("Non-finite weight produced for asset {index}")]
    NonFinite { index: usize },
}

impl From<AllocationError> for Error {
    fn from(e: AllocationError) -> Self {
        Error::numeric(format!("allocation: {}", e))
    }
}

/// Objective-adjusted attractiveness of an asset, floored at 0.05
pub fn adjusted_score(result: &ScoreResult, objective: Objective) -> f64 {
    let asset = &result.asset;
    let class = asset.class();
    let vol = asset.volatility_or_estimate();
    let ret = asset.return_or_estimate();
    let sharpe = asset.headline_sharpe();
    let dividend = asset.dividend_yield.filter(|v| v.is_finite()).unwrap_or(0.0);

    let mut score = sharpe.unwrap_or(NEUTRAL_SHARPE);

    match objective {
        Objective::Retirement => {
            if class.is_bond() {
                score += 0.8;
            }
            if dividend >= 2.0 {
                score += 0.2;
            }
            if vol < 12.0 {
                score += 0.3;
            }
            if class.is_growth_tilted() {
                score -= 0.3;
            }
        }
        Objective::House => {
            if class.is_bond() {
                score += 0.5;
            }
            if vol < 10.0 {
                score += 0.4;
            } else if vol > 20.0 {
                score -= 0.3;
            }
        }
        Objective::Emergency => {
            if class.is_bond() {
                score += 0.7;
            }
            if vol < 8.0 {
                score += 0.5;
            } else if vol > 15.0 {
                score -= 0.5;
            }
        }
        Objective::Growth => {
            if ret > 10.0 {
                score += 0.4;
            }
            if sharpe.is_some_and(|s| s > 1.0) {
                score += 0.3;
            }
            if class.is_growth_tilted() {
                score += 0.3;
            }
            if vol < 8.0 {
                score -= 0.2;
            }
            if class.is_bond() {
                score -= 0.3;
            }
        }
        Objective::Income => {
            if dividend >= 3.0 {
                score += 0.5;
            } else if dividend >= 2.0 {
                score += 0.2;
            }
            if matches!(class, AssetClass::Bonds | AssetClass::RealEstate) {
                score += 0.2;
            }
            if dividend < 1.0 {
                score -= 0.3;
            }
        }
    }

    let expense = asset.expense_ratio_or_estimate();
    if expense <= 0.10 {
        score += 0.1;
    } else if expense > 0.50 {
        score -= 0.1;
    }

    let drawdown = asset.drawdown_magnitude();
    if drawdown <= 15.0 {
        score += 0.1;
    } else if drawdown > 40.0 {
        score -= 0.1;
    }

    score += f64::from(result.composite) / 100.0 * 0.5;

    if score.is_finite() {
        score.max(MIN_ADJUSTED_SCORE)
    } else {
        MIN_ADJUSTED_SCORE
    }
}

/// Compute portfolio weights for `selected`, in the same order.
///
/// The result sums to 1 within 1e-6 and every weight lies within the
/// profile's `[min_weight, max_weight]`.
pub fn allocate(
    selected: &[ScoreResult],
    correlation: &CorrelationMatrix,
    strategy: &StrategyConfig,
) -> Result<Vec<f64>, AllocationError> {
    let n = selected.len();
    if n == 0 {
        return Err(AllocationError::Empty);
    }
    if correlation.len() != n {
        return Err(AllocationError::DimensionMismatch {
            assets: n,
            matrix: correlation.len(),
        });
    }

    let bounds = strategy.bounds();
    check_feasible(n, bounds.min_weight, bounds.max_weight)?;

    let adjusted: Vec<f64> = selected
        .iter()
        .map(|s| adjusted_score(s, strategy.objective))
        .collect();
    let total: f64 = adjusted.iter().sum();
    let mut weights: Vec<f64> = adjusted.iter().map(|a| a / total).collect();

    for (i, j, c) in correlation.pairs_above(HIGH_CORRELATION) {
        let weaker = if adjusted[i] < adjusted[j] { i } else { j };
        let factor = 1.0 - (c - HIGH_CORRELATION) * CORRELATION_PENALTY;
        tracing::debug!(
            "Correlation {:.2} between {} and {}: shrinking {} by {:.3}",
            c,
            selected[i].symbol,
            selected[j].symbol,
            selected[weaker].symbol,
            factor
        );
        weights[weaker] *= factor;
    }

    normalize_within_bounds(&mut weights, bounds.min_weight, bounds.max_weight)?;

    if strategy.favours_concentration() && n > 1 {
        redistribute_to_top(&mut weights, &adjusted, bounds.min_weight, bounds.max_weight);
        normalize_within_bounds(&mut weights, bounds.min_weight, bounds.max_weight)?;
    }

    if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
        return Err(AllocationError::NonFinite { index });
    }

    tracing::info!(
        "Allocated {} asset(s) for {} / {}",
        n,
        strategy.risk_profile,
        strategy.objective
    );

    Ok(weights)
}

fn check_feasible(n: usize, min: f64, max: f64) -> Result<(), AllocationError> {
    let count = n as f64;
    if min > max || count * min > 1.0 + TOLERANCE || count * max < 1.0 - TOLERANCE {
        return Err(AllocationError::InfeasibleBounds { count: n, min, max });
    }
    Ok(())
}

/// Rescale `weights` to sum to 1 with every entry in `[min, max]`.
///
/// Water-filling: weights that breach a bound are pinned to it and the
/// remaining mass is spread over the free weights in proportion to their
/// current values. A final headroom pass absorbs any residual.
pub fn normalize_within_bounds(weights: &mut [f64], min: f64, max: f64) -> Result<(), AllocationError> {
    let n = weights.len();
    if n == 0 {
        return Err(AllocationError::Empty);
    }
    check_feasible(n, min, max)?;

    let raw: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    let mut pinned: Vec<Option<f64>> = vec![None; n];

    for _ in 0..=n {
        let pinned_mass: f64 = pinned.iter().flatten().sum();
        let remaining = 1.0 - pinned_mass;
        let free: Vec<usize> = (0..n).filter(|&i| pinned[i].is_none()).collect();
        if free.is_empty() {
            break;
        }

        let free_raw: f64 = free.iter().map(|&i| raw[i]).sum();
        for &i in &free {
            weights[i] = if free_raw > TOLERANCE {
                raw[i] / free_raw * remaining
            } else {
                remaining / free.len() as f64
            };
        }

        let mut changed = false;
        for &i in &free {
            if weights[i] > max + TOLERANCE {
                pinned[i] = Some(max);
                changed = true;
            } else if weights[i] < min - TOLERANCE {
                pinned[i] = Some(min);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for (w, p) in weights.iter_mut().zip(&pinned) {
        if let Some(value) = p {
            *w = *value;
        }
        *w = w.clamp(min, max);
    }

    settle_residual(weights, min, max);
    Ok(())
}

/// Spread `1 - sum` over the available headroom (or slack) proportionally
fn settle_residual(weights: &mut [f64], min: f64, max: f64) {
    let residual = 1.0 - weights.iter().sum::<f64>();
    if residual.abs() <= f64::EPSILON {
        return;
    }

    if residual > 0.0 {
        let headroom: f64 = weights.iter().map(|w| max - w).sum();
        if headroom > 0.0 {
            for w in weights.iter_mut() {
                *w += residual * (max - *w) / headroom;
            }
        }
    } else {
        let slack: f64 = weights.iter().map(|w| w - min).sum();
        if slack > 0.0 {
            for w in weights.iter_mut() {
                *w += residual * (*w - min) / slack;
            }
        }
    }
}

/// Shift weight from the lower-ranked half toward the top-ranked asset
fn redistribute_to_top(weights: &mut [f64], adjusted: &[f64], min: f64, max: f64) {
    let n = weights.len();
    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| adjusted[b].total_cmp(&adjusted[a]).then(a.cmp(&b)));

    let top = ranked[0];
    let mut moved = 0.0;
    for &i in &ranked[n.div_ceil(2)..] {
        let headroom = max - weights[top];
        if headroom <= 0.0 {
            break;
        }
        let transfer = (weights[i] * REDISTRIBUTION_SHARE)
            .min(headroom)
            .min((weights[i] - min).max(0.0));
        weights[i] -= transfer;
        weights[top] += transfer;
        moved += transfer;
    }

    tracing::debug!("Redistributed {:.4} of weight to asset {}", moved, top);
}
