//! Configuration management
//!
//! Loaded from an optional TOML file, then `ETF_ENGINE__SECTION__KEY`
//! environment overrides. Every field has a default, so an empty file is valid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Risk-free rate in percentage points
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Composite score below which assets are never selected
    #[serde(default = "default_quality_floor")]
    pub quality_floor: u8,
    /// Annual return (%) used for assets without any return history
    #[serde(default = "default_placeholder_return")]
    pub placeholder_return: f64,
    #[serde(default = "default_min_amount")]
    pub min_amount: Decimal,
    #[serde(default = "default_max_amount")]
    pub max_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default = "default_paths")]
    pub paths: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Projection horizons in months
    #[serde(default = "default_horizons")]
    pub horizons: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// JSON file with the ETF universe; `~` and env vars are expanded
    #[serde(default = "default_catalog_path")]
    pub path: String,
    /// Baseline liquidity filter (USD)
    #[serde(default = "default_min_aum")]
    pub min_aum: f64,
    /// Baseline cost filter (%)
    #[serde(default = "default_max_expense_ratio")]
    pub max_expense_ratio: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_risk_free_rate() -> f64 {
    2.0
}
fn default_quality_floor() -> u8 {
    40
}
fn default_placeholder_return() -> f64 {
    5.0
}
fn default_min_amount() -> Decimal {
    crate::types::DEFAULT_MIN_AMOUNT
}
fn default_max_amount() -> Decimal {
    crate::types::DEFAULT_MAX_AMOUNT
}
fn default_paths() -> usize {
    1000
}
fn default_seed() -> u64 {
    42
}
fn default_horizons() -> Vec<u32> {
    vec![12, 24, 60, 120]
}
fn default_catalog_path() -> String {
    "data/etf_catalog.json".to_string()
}
fn default_min_aum() -> f64 {
    50_000_000.0
}
fn default_max_expense_ratio() -> f64 {
    1.0
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "etf_portfolio_engine=info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            quality_floor: default_quality_floor(),
            placeholder_return: default_placeholder_return(),
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            seed: default_seed(),
            horizons: default_horizons(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            min_aum: default_min_aum(),
            max_expense_ratio: default_max_expense_ratio(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl CatalogConfig {
    /// Catalog path with `~` and environment variables expanded
    pub fn resolved_path(&self) -> PathBuf {
        match shellexpand::full(&self.path) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                tracing::warn!("Failed to expand catalog path {}: {}", self.path, e);
                PathBuf::from(&self.path)
            }
        }
    }
}

impl Config {
    /// Load configuration from file (optional) and environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ETF_ENGINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        use crate::error::Error;

        if self.simulation.paths == 0 {
            return Err(Error::invalid("simulation.paths must be positive"));
        }
        if self.simulation.horizons.iter().any(|&h| h == 0) {
            return Err(Error::invalid("simulation.horizons must be positive"));
        }
        if self.engine.quality_floor > 100 {
            return Err(Error::invalid("engine.quality_floor must be within 0-100"));
        }
        if self.engine.min_amount <= Decimal::ZERO || self.engine.min_amount > self.engine.max_amount {
            return Err(Error::invalid(
                "engine.min_amount must be positive and not exceed engine.max_amount",
            ));
        }
        Ok(())
    }
}
