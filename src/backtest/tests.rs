//! Tests for the backtest reconstructor

use super::*;
use crate::scoring::score;
use crate::testing::{bond_fund, large_blend_fund, AssetBuilder};
use crate::types::{HorizonValues, Objective};
use rust_decimal::Decimal;

fn holding(asset: AssetRecord, weight: f64) -> Holding {
    Holding {
        score: score(&asset, Objective::Growth),
        weight,
        amount: Decimal::ZERO,
    }
}

#[test]
fn test_flat_history_repeats_the_rate() {
    let asset = large_blend_fund("VTI");
    let yearly = yearly_returns(&asset, YEARS).unwrap();

    assert_eq!(yearly.len(), YEARS);
    assert!(yearly.iter().all(|r| (r - 12.0).abs() < 1e-9));
}

#[test]
fn test_horizon_decomposition() {
    let asset = AssetBuilder::new("AAA", "Large Blend")
        .returns(20.0, 15.0, 10.0, 8.0, 9.0)
        .build();
    let yearly = yearly_returns(&asset, YEARS).unwrap();

    // Oldest first: five years of the 5y->10y window, two of 3y->5y, then 24-36, 12-24, last 12
    let window_10y = (120.0 * 9.0 - 60.0 * 8.0) / 60.0;
    let window_5y = (60.0 * 8.0 - 36.0 * 10.0) / 24.0;
    let expected = [
        window_10y, window_10y, window_10y, window_10y, window_10y,
        window_5y, window_5y,
        (36.0 * 10.0 - 24.0 * 15.0) / 12.0,
        (24.0 * 15.0 - 12.0 * 20.0) / 12.0,
        20.0,
    ];
    for (got, want) in yearly.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "got {} want {}", got, want);
    }

    // Arithmetic decomposition preserves the 10-year average
    let mean = yearly.iter().sum::<f64>() / YEARS as f64;
    assert!((mean - 9.0).abs() < 1e-9);
}

#[test]
fn test_short_history_repeats_longest_horizon() {
    let asset = AssetBuilder::new("NEW", "Large Growth")
        .return_horizons(HorizonValues {
            m12: Some(30.0),
            m24: Some(20.0),
            ..Default::default()
        })
        .build();
    let yearly = yearly_returns(&asset, YEARS).unwrap();

    assert_eq!(yearly[YEARS - 1], 30.0);
    assert_eq!(yearly[YEARS - 2], 10.0);
    assert!(yearly[..YEARS - 2].iter().all(|r| *r == 20.0));
}

#[test]
fn test_no_history_is_none() {
    let asset = AssetBuilder::new("NONE", "Other").build();
    assert!(yearly_returns(&asset, YEARS).is_none());
}

#[test]
fn test_fx_combination() {
    assert!((with_fx(10.0, 5.0) - 15.5).abs() < 1e-12);
    assert!((with_fx(-10.0, 10.0) - (-1.0)).abs() < 1e-12);
    assert_eq!(with_fx(7.0, 0.0), 7.0);
}

#[test]
fn test_total_return_matches_value_path() {
    let holdings = vec![holding(large_blend_fund("VTI"), 0.6), holding(bond_fund("BND"), 0.4)];
    let series = reconstruct(&holdings, Currency::Usd, 10_000.0, 5.0);

    assert_eq!(series.points.len(), YEARS);
    assert_eq!(series.points[0].year, 2015);
    assert_eq!(series.points[YEARS - 1].year, 2024);

    let recomputed = series
        .points
        .iter()
        .fold(10_000.0, |value, p| value * (1.0 + p.portfolio_return / 100.0));
    let last = series.points[YEARS - 1].portfolio_value;
    assert!((recomputed - last).abs() < 1e-6);

    let total = (last / 10_000.0 - 1.0) * 100.0;
    assert!((series.summary.total_return - total).abs() < 1e-9);

    // 0.6 * 12 + 0.4 * 4 every year
    assert!(series.points.iter().all(|p| (p.portfolio_return - 8.8).abs() < 1e-9));
    assert!(series.summary.volatility < 1e-9);
    assert_eq!(series.summary.sharpe_ratio, 0.0);
    assert_eq!(series.summary.max_drawdown, 0.0);
    assert!(!series.reduced_confidence);
}

#[test]
fn test_benchmarks_start_at_base_value() {
    let holdings = vec![holding(large_blend_fund("VTI"), 1.0)];
    let series = reconstruct(&holdings, Currency::Usd, 1_000.0, 5.0);

    let first = &series.points[0];
    assert!((first.benchmark_a_value - 1_014.0).abs() < 1e-9);
    assert!((first.benchmark_b_value - 991.0).abs() < 1e-9);
    assert!((first.benchmark_c_value - 1_005.5).abs() < 1e-9);
    assert!(!first.fx_applied);

    let sp500_total = value_path(1_000.0, &SP500.returns)[YEARS - 1] / 1_000.0 * 100.0 - 100.0;
    assert!((series.summary.total_return - series.summary.outperformance_a - sp500_total).abs() < 1e-9);
}

#[test]
fn test_eur_investor_gets_currency_effect() {
    let holdings = vec![holding(large_blend_fund("VTI"), 1.0)];
    let usd = reconstruct(&holdings, Currency::Usd, 1_000.0, 5.0);
    let eur = reconstruct(&holdings, Currency::Eur, 1_000.0, 5.0);

    assert!(eur.points.iter().all(|p| p.fx_applied));
    // 2015: 12 + 11.4 + 12 * 11.4 / 100
    assert!((eur.points[0].portfolio_return - 24.768).abs() < 1e-9);
    assert!((eur.points[0].benchmark_a_value - 1_000.0 * (1.0 + with_fx(1.4, 11.4) / 100.0)).abs() < 1e-9);
    assert_ne!(usd.summary.total_return, eur.summary.total_return);
}

#[test]
fn test_placeholder_marks_reduced_confidence() {
    let holdings = vec![
        holding(large_blend_fund("VTI"), 0.5),
        holding(AssetBuilder::new("NONE", "Other").build(), 0.5),
    ];
    let series = reconstruct(&holdings, Currency::Usd, 1_000.0, 5.0);

    assert!(series.reduced_confidence);
    assert_eq!(series.placeholder_symbols, vec!["NONE".to_string()]);
    assert!((series.points[0].portfolio_return - 8.5).abs() < 1e-9);
}

#[test]
fn test_max_drawdown_of_path() {
    let path = value_path(100.0, &[10.0, -20.0, 5.0, 30.0]);
    // Peak 110, trough 88
    assert!((max_drawdown(100.0, &path) + 20.0).abs() < 1e-9);
    assert_eq!(max_drawdown(100.0, &value_path(100.0, &[1.0, 2.0])), 0.0);
}

#[test]
fn test_non_monotone_horizons_never_lose_more_than_everything() {
    let asset = AssetBuilder::complete("SWNG", "Large Blend", 10.0, 30.0)
        .returns(80.0, -20.0, 10.0, 10.0, 10.0)
        .build();

    // 24m window decomposes to (24 * -20 - 12 * 80) / 12 = -120
    let yearly = yearly_returns(&asset, YEARS).unwrap();
    assert_eq!(yearly[YEARS - 1], 80.0);
    assert_eq!(yearly[YEARS - 2], -100.0);
    assert!(yearly.iter().all(|r| *r >= -100.0));

    let series = reconstruct(&[holding(asset, 1.0)], Currency::Usd, 10_000.0, 5.0);

    assert!(series.points.iter().all(|p| p.portfolio_value >= 0.0));
    assert_eq!(series.points[YEARS - 1].portfolio_value, 0.0);
    assert_eq!(series.summary.total_return, -100.0);
    assert_eq!(series.summary.max_drawdown, -100.0);
    assert_eq!(series.summary.annualized_return, -100.0);
}

#[test]
fn test_value_path_floors_at_zero() {
    assert_eq!(value_path(100.0, &[-150.0, 20.0]), vec![0.0, 0.0]);
}
