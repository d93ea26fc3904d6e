//! # Portfolio Construction Module
//!
//! Turns a selected set of scored ETFs into a weighted portfolio:
//! - Heuristic correlation estimation ([`correlation`])
//! - Constrained weight allocation ([`allocator`])
//! - Metric aggregation ([`metrics`])
//!
//! ```rust,ignore
//! use etf_portfolio_engine::portfolio::construct;
//!
//! let portfolio = construct(&selected, &strategy, 2.0)?;
//! assert!((portfolio.weights().iter().sum::<f64>() - 1.0).abs() < 1e-6);
//! ```

pub mod allocator;
pub mod correlation;
pub mod metrics;


pub use allocator::{adjusted_score, allocate, normalize_within_bounds, AllocationError};
pub use correlation::{correlate, pair_correlation, CorrelationMatrix};
pub use metrics::{
    class_breakdown, compute_metrics, diversification_score, effective_holdings, sector_exposure,
};

use rust_decimal::Decimal;

use crate::error::Result;
use crate::types::{to_money, money_to_f64, Holding, ScoreResult, SelectedPortfolio, StrategyConfig};

/// Correlate, allocate and measure a selection
pub fn construct(
    selected: &[ScoreResult],
    strategy: &StrategyConfig,
    risk_free_rate: f64,
) -> Result<SelectedPortfolio> {
    let correlation = correlate(selected);
    let weights = allocate(selected, &correlation, strategy)?;
    Ok(assemble(selected, &weights, strategy, risk_free_rate))
}

/// Build the portfolio record from fixed weights
pub fn assemble(
    selected: &[ScoreResult],
    weights: &[f64],
    strategy: &StrategyConfig,
    risk_free_rate: f64,
) -> SelectedPortfolio {
    let bounds = strategy.bounds();
    let amounts = split_amount(strategy.amount, weights);

    let holdings: Vec<Holding> = selected
        .iter()
        .zip(weights)
        .zip(amounts)
        .map(|((score, &weight), amount)| Holding {
            score: score.clone(),
            weight,
            amount,
        })
        .collect();

    let metrics = compute_metrics(selected, weights, strategy.amount, risk_free_rate);
    tracing::info!(
        "Portfolio metrics: return={:.2}% vol={:.2}% sharpe={:.2}",
        metrics.expected_return,
        metrics.expected_volatility,
        metrics.sharpe_ratio
    );

    SelectedPortfolio {
        holdings,
        metrics,
        diversification_score: diversification_score(selected),
        class_breakdown: class_breakdown(selected, weights, &bounds),
        sector_exposure: sector_exposure(selected, weights),
        effective_holdings: effective_holdings(weights),
    }
}

/// Split `amount` by weight in cents; the rounding residual goes to the largest holding
fn split_amount(amount: Decimal, weights: &[f64]) -> Vec<Decimal> {
    let total = money_to_f64(amount);
    let mut amounts: Vec<Decimal> = weights.iter().map(|w| to_money(total * w)).collect();

    let residual = amount.round_dp(2) - amounts.iter().copied().sum::<Decimal>();
    if !residual.is_zero() {
        if let Some(largest) = weights
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
        {
            amounts[largest] += residual;
        }
    }
    amounts
}
