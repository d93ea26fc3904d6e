//! Portfolio-level metric aggregation
//!
//! Every figure is a weight-blended sum of per-asset values. Volatility is
//! not diversified by correlation and VaR/CVaR are parametric
//! approximations, both reported as such.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::types::{
    to_money, money_to_f64, ClassAllocation, PortfolioMetrics, ScoreResult, StrategyBounds,
};

/// z-score multiplier for the 95% VaR approximation
pub const VAR_95_MULTIPLIER: f64 = 1.645;
/// Multiplier for the 95% CVaR approximation
pub const CVAR_95_MULTIPLIER: f64 = 2.0;

const MIN_VOLATILITY: f64 = 1e-9;

pub fn compute_metrics(
    selected: &[ScoreResult],
    weights: &[f64],
    amount: Decimal,
    risk_free_rate: f64,
) -> PortfolioMetrics {
    let expected_return = weighted(selected, weights, |s| s.asset.return_or_estimate());
    let expected_volatility = weighted(selected, weights, |s| s.asset.volatility_or_estimate());
    let expense_ratio = weighted(selected, weights, |s| s.asset.expense_ratio_or_estimate());
    let dividend_yield = weighted(selected, weights, |s| {
        s.asset.dividend_yield.filter(|v| v.is_finite()).unwrap_or(0.0)
    });
    let max_drawdown = -weighted(selected, weights, |s| s.asset.drawdown_magnitude());

    let sharpe_ratio = if expected_volatility > MIN_VOLATILITY {
        (expected_return - risk_free_rate) / expected_volatility
    } else {
        0.0
    };

    let annual_fee = to_money(money_to_f64(amount) * expense_ratio / 100.0);

    PortfolioMetrics {
        expected_return,
        expected_volatility,
        sharpe_ratio,
        max_drawdown,
        expense_ratio,
        dividend_yield,
        var_95: -VAR_95_MULTIPLIER * expected_volatility,
        cvar_95: -CVAR_95_MULTIPLIER * expected_volatility,
        annual_fee,
    }
}

fn weighted(selected: &[ScoreResult], weights: &[f64], value: impl Fn(&ScoreResult) -> f64) -> f64 {
    selected.iter().zip(weights).map(|(s, w)| w * value(s)).sum()
}

/// 0-100: 30% from holding count (saturating at 5), 70% from mean quality
pub fn diversification_score(selected: &[ScoreResult]) -> u8 {
    if selected.is_empty() {
        return 0;
    }
    let count_term = (20.0 * selected.len() as f64).min(100.0);
    let mean_composite =
        selected.iter().map(|s| f64::from(s.composite)).sum::<f64>() / selected.len() as f64;
    (0.3 * count_term + 0.7 * mean_composite).round().clamp(0.0, 100.0) as u8
}

/// 1 / sum(w^2)
pub fn effective_holdings(weights: &[f64]) -> f64 {
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    if sum_sq > 0.0 {
        1.0 / sum_sq
    } else {
        0.0
    }
}

/// Weight per class group against the profile's target ranges
pub fn class_breakdown(
    selected: &[ScoreResult],
    weights: &[f64],
    bounds: &StrategyBounds,
) -> Vec<ClassAllocation> {
    bounds
        .class_targets
        .iter()
        .map(|target| {
            let weight: f64 = selected
                .iter()
                .zip(weights)
                .filter(|(s, _)| s.class().group() == target.group)
                .map(|(_, w)| w)
                .sum();
            ClassAllocation {
                group: target.group,
                weight,
                target_min: target.min,
                target_max: target.max,
                within_target: weight >= target.min - 1e-9 && weight <= target.max + 1e-9,
            }
        })
        .collect()
}

/// Weight-blended sector exposure (%), largest first
pub fn sector_exposure(selected: &[ScoreResult], weights: &[f64]) -> Vec<(String, f64)> {
    let mut exposure: HashMap<&str, f64> = HashMap::new();
    for (s, w) in selected.iter().zip(weights) {
        for (sector, pct) in &s.asset.sector_weights {
            if pct.is_finite() {
                *exposure.entry(sector.as_str()).or_insert(0.0) += w * pct;
            }
        }
    }

    let mut sorted: Vec<(String, f64)> = exposure
        .into_iter()
        .map(|(sector, pct)| (sector.to_string(), pct))
        .collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}
