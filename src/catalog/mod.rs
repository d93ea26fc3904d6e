//! ETF catalog adapter
//!
//! The engine only sees the [`AssetCatalog`] trait. [`InMemoryCatalog`]
//! holds a fixed universe, optionally loaded from a JSON file, and applies
//! the baseline liquidity, cost and completeness filter.


use std::path::Path;

use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::types::{AssetRecord, Objective, RiskProfile};

/// Source of candidate assets
#[cfg_attr(test, mockall::automock)]
pub trait AssetCatalog: Send + Sync {
    /// Assets passing the baseline filter, for the given request
    fn fetch_candidates(&self, objective: Objective, risk_profile: RiskProfile) -> Result<Vec<AssetRecord>>;

    /// Look up one asset by symbol (case-insensitive)
    fn find(&self, symbol: &str) -> Result<Option<AssetRecord>>;
}

/// Baseline candidate filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineFilter {
    /// Minimum AUM in USD; unknown AUM passes
    pub min_aum: f64,
    /// Maximum expense ratio (%); unknown expense ratio passes
    pub max_expense_ratio: f64,
}

impl Default for BaselineFilter {
    fn default() -> Self {
        let config = CatalogConfig::default();
        Self {
            min_aum: config.min_aum,
            max_expense_ratio: config.max_expense_ratio,
        }
    }
}

impl BaselineFilter {
    pub fn accepts(&self, asset: &AssetRecord) -> bool {
        if asset.symbol.trim().is_empty() {
            return false;
        }
        if asset.aum.is_some_and(|aum| aum < self.min_aum) {
            return false;
        }
        if asset
            .expense_ratio
            .is_some_and(|er| er > self.max_expense_ratio)
        {
            return false;
        }
        // Completeness: at least one return figure
        asset.returns.headline().is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { assets: Vec<AssetRecord> },
    Bare(Vec<AssetRecord>),
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    assets: Vec<AssetRecord>,
    filter: BaselineFilter,
}

impl InMemoryCatalog {
    pub fn new(assets: Vec<AssetRecord>) -> Self {
        Self {
            assets,
            filter: BaselineFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: BaselineFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Parse a JSON array of records, or an object with an `assets` array
    pub fn from_json_str(json: &str) -> Result<Self> {
        let assets = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Wrapped { assets } | CatalogFile::Bare(assets) => assets,
        };
        Ok(Self::new(assets))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!("Loaded {} asset(s) from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load the file named in the config and apply its filter thresholds
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(Self::from_json_file(config.resolved_path())?.with_filter(BaselineFilter {
            min_aum: config.min_aum,
            max_expense_ratio: config.max_expense_ratio,
        }))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetCatalog for InMemoryCatalog {
    fn fetch_candidates(&self, objective: Objective, risk_profile: RiskProfile) -> Result<Vec<AssetRecord>> {
        let candidates: Vec<AssetRecord> = self
            .assets
            .iter()
            .filter(|a| self.filter.accepts(a))
            .cloned()
            .collect();
        tracing::info!(
            "Catalog returned {} of {} asset(s) for {} / {}",
            candidates.len(),
            self.assets.len(),
            risk_profile,
            objective
        );
        Ok(candidates)
    }

    fn find(&self, symbol: &str) -> Result<Option<AssetRecord>> {
        let wanted = symbol.trim();
        Ok(self
            .assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(wanted))
            .cloned())
    }
}
