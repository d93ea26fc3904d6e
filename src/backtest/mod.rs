//! Ten-year historical backtest reconstruction
//!
//! Per-asset yearly returns are rebuilt from trailing horizon returns; the
//! portfolio path is compared against three embedded benchmark series.
//! Non-USD investors get the USD/EUR currency effect compounded in.

mod data;

#[cfg(test)]
mod tests;

pub use data::{BenchmarkSeries, BACKTEST_YEARS, MSCI_WORLD, SP500, US_AGGREGATE, USD_EUR_FX};

use crate::types::{
    AssetRecord, BacktestPoint, BacktestSeries, BacktestSummary, Currency, Holding,
};

/// Number of reconstructed years
pub const YEARS: usize = BACKTEST_YEARS.len();

const MIN_VOLATILITY: f64 = 1e-9;
/// A year cannot lose more than the whole position
const MIN_YEARLY_RETURN: f64 = -100.0;

/// Yearly returns (%) for the last `years` years, oldest first.
///
/// Trailing horizons are decomposed arithmetically: the window between the
/// previous available horizon H0 and horizon H earns
/// `(H * r_H - H0 * r_H0) / (H - H0)` per year, floored at -100%. Years
/// beyond the longest available horizon repeat its annualized return.
/// `None` when the asset has no return history at all.
pub fn yearly_returns(asset: &AssetRecord, years: usize) -> Option<Vec<f64>> {
    let horizons = asset.returns.available();
    let (longest_months, longest_return) = *horizons.last()?;

    let mut newest_first = Vec::with_capacity(years);
    let (mut prev_months, mut prev_return) = (0u32, 0.0);
    for (months, ret) in horizons {
        let window = f64::from(months - prev_months);
        let per_year = ((f64::from(months) * ret - f64::from(prev_months) * prev_return) / window)
            .max(MIN_YEARLY_RETURN);
        let window_years = ((months - prev_months) / 12).max(1) as usize;
        for _ in 0..window_years {
            if newest_first.len() < years {
                newest_first.push(per_year);
            }
        }
        prev_months = months;
        prev_return = ret;
    }

    let derived = newest_first.len();
    while newest_first.len() < years {
        newest_first.push(longest_return.max(MIN_YEARLY_RETURN));
    }
    tracing::debug!(
        "{}: {} of {} year(s) from horizons up to {} months",
        asset.symbol,
        derived,
        years,
        longest_months
    );

    newest_first.reverse();
    Some(newest_first)
}

/// Combine an asset return with a currency return, both in percent
pub fn with_fx(asset_return: f64, fx_return: f64) -> f64 {
    asset_return + fx_return + asset_return * fx_return / 100.0
}

/// Reconstruct the portfolio and benchmark value paths.
///
/// Every series starts at `base_value`. Holdings without any return history
/// use `placeholder_return` per year and flag the series reduced-confidence.
pub fn reconstruct(
    holdings: &[Holding],
    currency: Currency,
    base_value: f64,
    placeholder_return: f64,
) -> BacktestSeries {
    let fx_applied = currency != Currency::Usd;

    let mut placeholder_symbols = Vec::new();
    let mut portfolio_returns = vec![0.0; YEARS];
    for holding in holdings {
        let asset = &holding.score.asset;
        let yearly = yearly_returns(asset, YEARS).unwrap_or_else(|| {
            tracing::warn!("{} has no return history, using placeholder series", asset.symbol);
            placeholder_symbols.push(asset.symbol.clone());
            vec![placeholder_return; YEARS]
        });
        for (total, r) in portfolio_returns.iter_mut().zip(yearly) {
            *total += holding.weight * r;
        }
    }

    let portfolio_returns = in_currency(&portfolio_returns, fx_applied);
    let bench_a = in_currency(&SP500.returns, fx_applied);
    let bench_b = in_currency(&MSCI_WORLD.returns, fx_applied);
    let bench_c = in_currency(&US_AGGREGATE.returns, fx_applied);

    let portfolio_path = value_path(base_value, &portfolio_returns);
    let path_a = value_path(base_value, &bench_a);
    let path_b = value_path(base_value, &bench_b);
    let path_c = value_path(base_value, &bench_c);

    let points: Vec<BacktestPoint> = BACKTEST_YEARS
        .iter()
        .enumerate()
        .map(|(i, &year)| BacktestPoint {
            year,
            portfolio_value: portfolio_path[i],
            benchmark_a_value: path_a[i],
            benchmark_b_value: path_b[i],
            benchmark_c_value: path_c[i],
            portfolio_return: portfolio_returns[i],
            fx_applied,
        })
        .collect();

    let summary = summarize(
        base_value,
        &portfolio_returns,
        &portfolio_path,
        [path_a.as_slice(), path_b.as_slice(), path_c.as_slice()],
    );

    tracing::info!(
        "Backtest {}-{}: total {:.1}% vs {} {:.1}%",
        BACKTEST_YEARS[0],
        BACKTEST_YEARS[YEARS - 1],
        summary.total_return,
        SP500.name,
        summary.total_return - summary.outperformance_a
    );

    BacktestSeries {
        base_value,
        benchmark_names: [
            SP500.name.to_string(),
            MSCI_WORLD.name.to_string(),
            US_AGGREGATE.name.to_string(),
        ],
        points,
        summary,
        reduced_confidence: !placeholder_symbols.is_empty(),
        placeholder_symbols,
    }
}

fn in_currency(returns: &[f64], fx_applied: bool) -> Vec<f64> {
    returns
        .iter()
        .zip(USD_EUR_FX.returns.iter())
        .map(|(r, fx)| if fx_applied { with_fx(*r, *fx) } else { *r })
        .collect()
}

/// Year-end values after compounding each return from `base`, never below zero
pub fn value_path(base: f64, returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(base, |value, r| {
            *value = (*value * (1.0 + r / 100.0)).max(0.0);
            Some(*value)
        })
        .collect()
}

/// Total return (%) from `base` to the last value of `path`
fn total_return(base: f64, path: &[f64]) -> f64 {
    match path.last() {
        Some(last) if base > 0.0 => (last / base - 1.0) * 100.0,
        _ => 0.0,
    }
}

fn annualized(total_return_pct: f64, years: usize) -> f64 {
    let growth = 1.0 + total_return_pct / 100.0;
    if years == 0 {
        return 0.0;
    }
    if growth <= 0.0 {
        return -100.0;
    }
    (growth.powf(1.0 / years as f64) - 1.0) * 100.0
}

/// Population standard deviation
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Largest peak-to-trough decline (%, non-positive), base included as the first peak
pub fn max_drawdown(base: f64, path: &[f64]) -> f64 {
    let mut peak = base;
    let mut worst: f64 = 0.0;
    for &value in path {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            worst = worst.min((value / peak - 1.0) * 100.0);
        }
    }
    worst
}

fn summarize(
    base: f64,
    returns: &[f64],
    path: &[f64],
    benchmarks: [&[f64]; 3],
) -> BacktestSummary {
    let total = total_return(base, path);
    let annual = annualized(total, returns.len());
    let volatility = std_dev(returns);

    let [a, b, c] = benchmarks.map(|bench| total_return(base, bench));
    let risk_free = annualized(c, returns.len());
    let sharpe_ratio = if volatility > MIN_VOLATILITY {
        (annual - risk_free) / volatility
    } else {
        0.0
    };

    BacktestSummary {
        total_return: total,
        annualized_return: annual,
        volatility,
        sharpe_ratio,
        max_drawdown: max_drawdown(base, path),
        outperformance_a: total - a,
        outperformance_b: total - b,
        outperformance_c: total - c,
    }
}
