//! Tests for the scoring engine

use super::*;
use crate::testing::{bond_fund, large_blend_fund, AssetBuilder};

#[test]
fn test_consistency_bands() {
    assert_eq!(consistency_value(10.0), 1.0);
    assert_eq!(consistency_value(5.0), 1.0);
    assert_eq!(consistency_value(25.0), 1.0);
    assert_eq!(consistency_value(30.0), 0.8);
    assert_eq!(consistency_value(0.0), 0.8);
    assert_eq!(consistency_value(-5.0), 0.6);
    assert_eq!(consistency_value(50.0), 0.6);
    assert_eq!(consistency_value(60.0), 0.3);
    assert_eq!(consistency_value(-20.0), 0.3);
}

#[test]
fn test_volatility_bands() {
    assert_eq!(volatility_value(15.0), 1.0);
    assert_eq!(volatility_value(15.1), 0.8);
    assert_eq!(volatility_value(25.0), 0.8);
    assert_eq!(volatility_value(35.0), 0.6);
    assert_eq!(volatility_value(36.0), 0.3);
}

#[test]
fn test_liquidity_bands() {
    assert_eq!(liquidity_value(10_000_000_000.0), 1.0);
    assert_eq!(liquidity_value(5_000_000_000.0), 0.8);
    assert_eq!(liquidity_value(100_000_000.0), 0.6);
    assert_eq!(liquidity_value(50_000_000.0), 0.3);
}

#[test]
fn test_cost_bands() {
    assert_eq!(cost_value(0.03), 1.0);
    assert_eq!(cost_value(0.10), 0.8);
    assert_eq!(cost_value(0.30), 0.6);
    assert_eq!(cost_value(0.75), 0.3);
}

#[test]
fn test_dividend_bands() {
    assert_eq!(dividend_value(0.0), 0.4);
    assert_eq!(dividend_value(12.0), 0.4);
    assert_eq!(dividend_value(3.0), 1.0);
    assert_eq!(dividend_value(1.5), 0.8);
    assert_eq!(dividend_value(9.0), 0.6);
    assert_eq!(dividend_value(0.5), 0.6);
}

#[test]
fn test_balanced_composite() {
    let result = score(&large_blend_fund("VTI"), Objective::Growth);

    // 0.35*(1/3) + 0.25*1.0 + 0.20*0.8 + 0.10*1.0 + 0.05*1.0 + 0.05*0.8 = 0.7167
    assert_eq!(result.composite, 72);
    assert_eq!(result.components.performance, 33);
    assert_eq!(result.components.consistency, 100);
    assert_eq!(result.components.volatility_control, 80);
    assert_eq!(result.components.dividend_quality, 80);
    assert!(result.fallback_components.is_empty());
    assert_eq!(result.symbol, "VTI");
}

#[test]
fn test_income_weights_favour_dividends() {
    let bond = bond_fund("BND");
    let balanced = score(&bond, Objective::Retirement);
    let income = score(&bond, Objective::Income);

    assert_eq!(balanced.composite, 65);
    assert_eq!(income.composite, 93);
    assert!(income.composite > balanced.composite);
}

#[test]
fn test_non_income_objectives_share_weights() {
    let asset = large_blend_fund("VTI");
    let composites: Vec<u8> = [
        Objective::Retirement,
        Objective::House,
        Objective::Emergency,
        Objective::Growth,
    ]
    .iter()
    .map(|o| score(&asset, *o).composite)
    .collect();

    assert!(composites.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_scoring_is_pure() {
    let asset = large_blend_fund("VTI");
    let first = score(&asset, Objective::Income);
    let second = score(&asset, Objective::Income);
    assert_eq!(first, second);
}

#[test]
fn test_rationale_names_strengths_and_weakness() {
    let result = score(&bond_fund("BND"), Objective::Retirement);

    assert!(result.rationale.contains("excellent volatility control"), "{}", result.rationale);
    assert!(result.rationale.contains("excellent liquidity"), "{}", result.rationale);
    assert!(
        result.rationale.contains("Weakest area: risk-adjusted performance"),
        "{}",
        result.rationale
    );
}

#[test]
fn test_high_score_omits_weakness() {
    let asset = AssetBuilder::complete("SPY", "Large Blend", 12.0, 14.0)
        .sharpe(2.7)
        .dividend_yield(2.5)
        .build();
    let result = score(&asset, Objective::Growth);

    assert!(result.composite >= 70);
    assert!(!result.rationale.contains("Weakest"));
}

#[test]
fn test_missing_return_and_volatility_use_fallbacks() {
    let mut asset = large_blend_fund("AAA");
    asset.returns.m12 = None;
    asset.volatility = Default::default();

    let result = score(&asset, Objective::Growth);

    assert!(result.fallback_components.contains(&Component::VolatilityControl));
    assert!(result.fallback_components.contains(&Component::Consistency));
    assert_eq!(result.components.volatility_control, 60);
    assert!(!result.rationale.contains("excellent volatility control"));
    assert!(!result.rationale.contains("excellent return consistency"));
}

#[test]
fn test_empty_record_never_claims_excellence() {
    let asset = AssetBuilder::new("AAA", "Large Blend").build();
    let result = score(&asset, Objective::Growth);

    assert_eq!(result.fallback_components.len(), 6);
    assert!(result.composite > 0 && result.composite < 70);
    assert!(result.rationale.contains("Limited data"));
    assert!(!result.rationale.contains("excellent"));
}

#[test]
fn test_missing_expense_ratio_uses_class_estimate() {
    let bond = AssetBuilder::complete("XBND", "Bond", 3.0, 5.0)
        .no_expense_ratio()
        .build();
    let emerging = AssetBuilder::complete("XEM", "Emerging Markets", 3.0, 5.0)
        .no_expense_ratio()
        .build();

    let bond_score = score(&bond, Objective::Growth);
    let emerging_score = score(&emerging, Objective::Growth);

    // Bonds estimate 0.10% -> 0.8; emerging 0.30% -> 0.6
    assert_eq!(bond_score.components.cost_efficiency, 80);
    assert_eq!(emerging_score.components.cost_efficiency, 60);
    assert!(bond_score.fallback_components.contains(&Component::CostEfficiency));
}

#[test]
fn test_missing_m12_sharpe_falls_back_to_longer_horizon() {
    let mut asset = large_blend_fund("VTI");
    asset.sharpe.m12 = None;
    asset.sharpe.m36 = Some(1.5);

    let result = score(&asset, Objective::Growth);
    assert_eq!(result.components.performance, 50);
    assert!(result.fallback_components.contains(&Component::Performance));
}
