//! Multi-factor ETF quality scoring
//!
//! Each component is mapped to [0, 1] through fixed threshold bands, then
//! blended with objective-specific weights into a 0-100 composite.
//! Missing inputs fall back to documented neutral values; a fallback-derived
//! component is tracked so the rationale never praises it.

use crate::types::{AssetRecord, Component, ComponentScores, Objective, ScoreResult};

#[cfg(test)]
mod tests;

/// Neutral component values used when the input is unknown
pub const NEUTRAL_PERFORMANCE: f64 = 0.5;
pub const NEUTRAL_CONSISTENCY: f64 = 0.6;
pub const NEUTRAL_VOLATILITY: f64 = 0.6;
pub const NEUTRAL_LIQUIDITY: f64 = 0.6;
pub const NEUTRAL_DIVIDEND: f64 = 0.6;

/// Composite below which the rationale names the weakest component
const WEAKNESS_THRESHOLD: u8 = 70;

/// Component weights for the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub performance: f64,
    pub consistency: f64,
    pub volatility_control: f64,
    pub liquidity: f64,
    pub cost_efficiency: f64,
    pub dividend_quality: f64,
}

impl ScoreWeights {
    /// Weights used for every objective except income
    pub const BALANCED: ScoreWeights = ScoreWeights {
        performance: 0.35,
        consistency: 0.25,
        volatility_control: 0.20,
        liquidity: 0.10,
        cost_efficiency: 0.05,
        dividend_quality: 0.05,
    };

    pub const INCOME: ScoreWeights = ScoreWeights {
        performance: 0.05,
        consistency: 0.15,
        volatility_control: 0.25,
        liquidity: 0.10,
        cost_efficiency: 0.05,
        dividend_quality: 0.40,
    };

    pub fn for_objective(objective: Objective) -> Self {
        match objective {
            Objective::Income => Self::INCOME,
            _ => Self::BALANCED,
        }
    }

    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Performance => self.performance,
            Component::Consistency => self.consistency,
            Component::VolatilityControl => self.volatility_control,
            Component::Liquidity => self.liquidity,
            Component::CostEfficiency => self.cost_efficiency,
            Component::DividendQuality => self.dividend_quality,
        }
    }
}

/// A component value in [0, 1] and whether it came from a fallback
#[derive(Debug, Clone, Copy, PartialEq)]
struct Band {
    value: f64,
    fallback: bool,
}

impl Band {
    fn real(value: f64) -> Self {
        Self { value, fallback: false }
    }

    fn fallback(value: f64) -> Self {
        Self { value, fallback: true }
    }
}

/// Score an asset for an objective. Pure and deterministic.
pub fn score(asset: &AssetRecord, objective: Objective) -> ScoreResult {
    score_with_weights(asset, &ScoreWeights::for_objective(objective))
}

pub fn score_with_weights(asset: &AssetRecord, weights: &ScoreWeights) -> ScoreResult {
    let bands = [
        (Component::Performance, performance_band(asset)),
        (Component::Consistency, consistency_band(asset)),
        (Component::VolatilityControl, volatility_band(asset)),
        (Component::Liquidity, liquidity_band(asset)),
        (Component::CostEfficiency, cost_band(asset)),
        (Component::DividendQuality, dividend_band(asset)),
    ];

    let weighted: f64 = bands
        .iter()
        .map(|(component, band)| weights.get(*component) * band.value)
        .sum();
    let composite = to_percent(weighted);

    let components = ComponentScores {
        performance: to_percent(bands[0].1.value),
        consistency: to_percent(bands[1].1.value),
        volatility_control: to_percent(bands[2].1.value),
        liquidity: to_percent(bands[3].1.value),
        cost_efficiency: to_percent(bands[4].1.value),
        dividend_quality: to_percent(bands[5].1.value),
    };

    let fallback_components: Vec<Component> = bands
        .iter()
        .filter(|(_, band)| band.fallback)
        .map(|(component, _)| *component)
        .collect();

    let rationale = build_rationale(composite, &components, &fallback_components, weights);

    tracing::debug!(
        "Scored {}: composite={} fallbacks={}",
        asset.symbol,
        composite,
        fallback_components.len()
    );

    ScoreResult {
        symbol: asset.symbol.clone(),
        composite,
        components,
        fallback_components,
        rationale,
        asset: asset.clone(),
    }
}

fn to_percent(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}

// ──────────────────────────────────────────────────────────────────────────────
// Component bands
// ──────────────────────────────────────────────────────────────────────────────

fn performance_band(asset: &AssetRecord) -> Band {
    match asset.sharpe.m12.filter(|v| v.is_finite()) {
        Some(sharpe) => Band::real((sharpe / 3.0).clamp(0.0, 1.0)),
        None => match asset.headline_sharpe() {
            Some(sharpe) => Band::fallback((sharpe / 3.0).clamp(0.0, 1.0)),
            None => Band::fallback(NEUTRAL_PERFORMANCE),
        },
    }
}

pub(crate) fn consistency_value(ret: f64) -> f64 {
    if (5.0..=25.0).contains(&ret) {
        1.0
    } else if (0.0..=40.0).contains(&ret) {
        0.8
    } else if (-10.0..=50.0).contains(&ret) {
        0.6
    } else {
        0.3
    }
}

fn consistency_band(asset: &AssetRecord) -> Band {
    match asset.returns.m12.filter(|v| v.is_finite()) {
        Some(ret) => Band::real(consistency_value(ret)),
        None => match asset.average_return() {
            Some(ret) => Band::fallback(consistency_value(ret)),
            None => Band::fallback(NEUTRAL_CONSISTENCY),
        },
    }
}

pub(crate) fn volatility_value(vol: f64) -> f64 {
    if vol <= 15.0 {
        1.0
    } else if vol <= 25.0 {
        0.8
    } else if vol <= 35.0 {
        0.6
    } else {
        0.3
    }
}

fn volatility_band(asset: &AssetRecord) -> Band {
    match asset.volatility.m12.filter(|v| v.is_finite()) {
        Some(vol) => Band::real(volatility_value(vol.abs())),
        None => match asset.headline_volatility() {
            Some(vol) => Band::fallback(volatility_value(vol)),
            None => Band::fallback(NEUTRAL_VOLATILITY),
        },
    }
}

pub(crate) fn liquidity_value(aum: f64) -> f64 {
    if aum >= 10_000_000_000.0 {
        1.0
    } else if aum >= 1_000_000_000.0 {
        0.8
    } else if aum >= 100_000_000.0 {
        0.6
    } else {
        0.3
    }
}

fn liquidity_band(asset: &AssetRecord) -> Band {
    match asset.aum.filter(|v| v.is_finite()) {
        Some(aum) => Band::real(liquidity_value(aum)),
        None => Band::fallback(NEUTRAL_LIQUIDITY),
    }
}

pub(crate) fn cost_value(expense_ratio: f64) -> f64 {
    if expense_ratio <= 0.05 {
        1.0
    } else if expense_ratio <= 0.15 {
        0.8
    } else if expense_ratio <= 0.30 {
        0.6
    } else {
        0.3
    }
}

fn cost_band(asset: &AssetRecord) -> Band {
    match asset.expense_ratio.filter(|v| v.is_finite() && *v >= 0.0) {
        Some(er) => Band::real(cost_value(er)),
        None => Band::fallback(cost_value(asset.class().typical_expense_ratio())),
    }
}

pub(crate) fn dividend_value(yield_pct: f64) -> f64 {
    if yield_pct <= 0.0 || yield_pct > 10.0 {
        0.4
    } else if (2.0..=6.0).contains(&yield_pct) {
        1.0
    } else if (1.0..=8.0).contains(&yield_pct) {
        0.8
    } else {
        0.6
    }
}

fn dividend_band(asset: &AssetRecord) -> Band {
    match asset.dividend_yield.filter(|v| v.is_finite()) {
        Some(y) => Band::real(dividend_value(y)),
        None => Band::fallback(NEUTRAL_DIVIDEND),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Rationale
// ──────────────────────────────────────────────────────────────────────────────

fn qualifier(score: u8) -> &'static str {
    match score {
        100 => "excellent",
        80..=99 => "strong",
        60..=79 => "solid",
        _ => "modest",
    }
}

/// Components ordered strongest first; ties go to the heavier-weighted one
fn ranked(components: &ComponentScores, weights: &ScoreWeights, exclude: &[Component]) -> Vec<Component> {
    let mut ranked: Vec<Component> = Component::ALL
        .iter()
        .copied()
        .filter(|c| !exclude.contains(c))
        .collect();
    ranked.sort_by(|a, b| {
        components
            .get(*b)
            .cmp(&components.get(*a))
            .then_with(|| weights.get(*b).total_cmp(&weights.get(*a)))
    });
    ranked
}

fn build_rationale(
    composite: u8,
    components: &ComponentScores,
    fallbacks: &[Component],
    weights: &ScoreWeights,
) -> String {
    let strongest = ranked(components, weights, fallbacks);
    if strongest.is_empty() {
        return format!("Limited data available; score {} relies on neutral estimates.", composite);
    }

    let strengths: Vec<String> = strongest
        .iter()
        .take(2)
        .map(|c| format!("{} {}", qualifier(components.get(*c)), c.describe()))
        .collect();
    let mut rationale = format!("Strengths: {}.", strengths.join(" and "));

    if composite < WEAKNESS_THRESHOLD {
        // Weakest over every component; fallback ones are named without praise
        if let Some(weakest) = ranked(components, weights, &[]).last() {
            rationale.push_str(&format!(" Weakest area: {}", weakest.describe()));
            if fallbacks.contains(weakest) {
                rationale.push_str(" (estimated)");
            }
            rationale.push('.');
        }
    }

    if !fallbacks.is_empty() {
        rationale.push_str(&format!(" {} component(s) use fallback estimates.", fallbacks.len()));
    }

    rationale
}
