//! ETF Portfolio Engine
//!
//! Recommends and evaluates multi-asset ETF portfolios for a risk profile
//! and investment objective.
//!
//! ## Architecture
//!
//! ```text
//! Catalog → Scoring → Selection → Correlation → Allocator → Metrics
//!                                                              ↓
//!                                          Backtest + Monte Carlo → Report
//! ```
//!
//! Every stage is a pure function of its inputs except the catalog, which
//! sits behind the [`catalog::AssetCatalog`] trait. [`engine::PortfolioEngine`]
//! wires the stages together.

pub mod backtest;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod portfolio;
pub mod projection;
pub mod scoring;
pub mod selection;
pub mod testing;
pub mod types;

#[cfg(test)]
mod integration_tests;

pub use catalog::{AssetCatalog, InMemoryCatalog};
pub use config::Config;
pub use engine::{EngineSettings, PortfolioEngine};
pub use error::{DataWarning, Error, Result};
