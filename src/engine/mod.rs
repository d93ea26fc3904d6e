//! Portfolio engine facade
//!
//! Runs the full pipeline for one request:
//!
//! ```text
//! Catalog → Scoring → Selection → Correlation → Allocation → Metrics
//!                                                              ↓
//!                                           Backtest + Monte Carlo → Report
//! ```
//!
//! Each run is synchronous and self-contained; the engine holds no mutable
//! state between requests.


use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::backtest;
use crate::catalog::AssetCatalog;
use crate::config::{Config, SimulationConfig};
use crate::error::{DataWarning, Error, Result};
use crate::portfolio;
use crate::projection::MonteCarloProjector;
use crate::scoring::{score, score_with_weights, ScoreWeights};
use crate::selection::{select_with_floor, DEFAULT_QUALITY_FLOOR};
use crate::types::{
    money_to_f64, PortfolioReport, ScoreResult, Shortfall, StrategyConfig, DEFAULT_MAX_AMOUNT,
    DEFAULT_MIN_AMOUNT,
};

/// Minimum distinct holdings for any portfolio
pub const MIN_HOLDINGS: usize = 2;

/// Engine tunables, taken from [`Config`]
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub risk_free_rate: f64,
    pub quality_floor: u8,
    pub placeholder_return: f64,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub simulation: SimulationConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: 2.0,
            quality_floor: DEFAULT_QUALITY_FLOOR,
            placeholder_return: 5.0,
            min_amount: DEFAULT_MIN_AMOUNT,
            max_amount: DEFAULT_MAX_AMOUNT,
            simulation: SimulationConfig::default(),
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            risk_free_rate: config.engine.risk_free_rate,
            quality_floor: config.engine.quality_floor,
            placeholder_return: config.engine.placeholder_return,
            min_amount: config.engine.min_amount,
            max_amount: config.engine.max_amount,
            simulation: config.simulation.clone(),
        }
    }
}

pub struct PortfolioEngine<C: AssetCatalog> {
    catalog: C,
    settings: EngineSettings,
    projector: MonteCarloProjector,
}

impl<C: AssetCatalog> PortfolioEngine<C> {
    pub fn new(catalog: C, settings: EngineSettings) -> Self {
        let projector = MonteCarloProjector::from_config(&settings.simulation);
        Self {
            catalog,
            settings,
            projector,
        }
    }

    pub fn from_config(catalog: C, config: &Config) -> Self {
        Self::new(catalog, EngineSettings::from(config))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Recommend a portfolio from the catalog's candidates
    pub fn build_portfolio(&self, strategy: &StrategyConfig) -> Result<PortfolioReport> {
        strategy.validate(self.settings.min_amount, self.settings.max_amount)?;
        let bounds = strategy.bounds();

        let candidates = self
            .catalog
            .fetch_candidates(strategy.objective, strategy.risk_profile)?;
        if candidates.len() < bounds.min_etfs {
            return Err(Error::InsufficientCandidates {
                required: bounds.min_etfs,
                available: candidates.len(),
            });
        }

        let scored: Vec<ScoreResult> = candidates
            .iter()
            .map(|asset| score(asset, strategy.objective))
            .collect();
        tracing::info!("Scored {} candidate(s)", scored.len());

        let outcome = select_with_floor(&scored, strategy, self.settings.quality_floor);
        if outcome.selected.len() < MIN_HOLDINGS {
            return Err(Error::InsufficientCandidates {
                required: bounds.min_etfs,
                available: outcome.selected.len(),
            });
        }

        self.evaluate(outcome.selected, strategy, outcome.warnings, outcome.shortfall)
    }

    /// Evaluate a caller-chosen set of symbols under `strategy`
    pub fn recalculate(&self, symbols: &[String], strategy: &StrategyConfig) -> Result<PortfolioReport> {
        strategy.validate(self.settings.min_amount, self.settings.max_amount)?;

        let mut seen = HashSet::new();
        let distinct: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        if distinct.len() < MIN_HOLDINGS {
            return Err(Error::invalid(format!(
                "at least {} distinct symbols are required, got {}",
                MIN_HOLDINGS,
                distinct.len()
            )));
        }
        let limit = max_holdings(strategy);
        if distinct.len() > limit {
            return Err(Error::invalid(format!(
                "at most {} distinct symbols fit the {} profile's minimum weight, got {}",
                limit,
                strategy.risk_profile,
                distinct.len()
            )));
        }

        let mut scored = Vec::with_capacity(distinct.len());
        for symbol in &distinct {
            let asset = self
                .catalog
                .find(symbol)?
                .ok_or_else(|| Error::invalid(format!("unknown symbol '{}'", symbol)))?;
            scored.push(score(&asset, strategy.objective));
        }

        let mut warnings = Vec::new();
        for s in &scored {
            if s.composite < self.settings.quality_floor {
                tracing::warn!(
                    "{} scores {} below the quality floor {}",
                    s.symbol,
                    s.composite,
                    self.settings.quality_floor
                );
            }
            if s.asset.sector_weights.is_empty() {
                warnings.push(DataWarning::MissingSectorData {
                    symbol: s.symbol.clone(),
                });
            }
        }

        self.evaluate(scored, strategy, warnings, None)
    }

    /// Score one asset with the balanced weights
    pub fn score_one(&self, symbol: &str) -> Result<ScoreResult> {
        let asset = self
            .catalog
            .find(symbol)?
            .ok_or_else(|| Error::invalid(format!("unknown symbol '{}'", symbol.trim())))?;
        Ok(score_with_weights(&asset, &ScoreWeights::BALANCED))
    }

    fn evaluate(
        &self,
        selected: Vec<ScoreResult>,
        strategy: &StrategyConfig,
        mut warnings: Vec<DataWarning>,
        shortfall: Option<Shortfall>,
    ) -> Result<PortfolioReport> {
        let portfolio = portfolio::construct(&selected, strategy, self.settings.risk_free_rate)?;

        for holding in &portfolio.holdings {
            for warning in holding.score.asset.data_warnings() {
                push_unique(&mut warnings, warning);
            }
        }

        let backtest = backtest::reconstruct(
            &portfolio.holdings,
            strategy.currency,
            money_to_f64(strategy.amount),
            self.settings.placeholder_return,
        );
        for symbol in &backtest.placeholder_symbols {
            push_unique(&mut warnings, DataWarning::MissingHistory { symbol: symbol.clone() });
        }

        let projections = self.projector.project_horizons(
            &portfolio.metrics,
            strategy.amount,
            strategy.monthly_contribution,
            &self.settings.simulation.horizons,
        );

        let report = PortfolioReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            strategy: strategy.clone(),
            portfolio,
            backtest,
            projections,
            warnings,
            shortfall,
        };

        tracing::info!(
            run_id = %report.run_id,
            holdings = report.portfolio.holdings.len(),
            warnings = report.warnings.len(),
            "Portfolio report ready"
        );

        Ok(report)
    }
}

/// Largest holding count whose minimum weights still fit in 100%
fn max_holdings(strategy: &StrategyConfig) -> usize {
    let min_weight = strategy.bounds().min_weight;
    if min_weight > 0.0 {
        (1.0 / min_weight + 1e-9).floor() as usize
    } else {
        usize::MAX
    }
}

fn push_unique(warnings: &mut Vec<DataWarning>, warning: DataWarning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}
