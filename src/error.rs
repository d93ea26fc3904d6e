//! Error and warning types for the portfolio engine

use thiserror::Error;

/// Engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed request, rejected before any computation
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Catalog could not supply enough assets for the strategy
    #[error("Insufficient candidates: need at least {required}, got {available}")]
    InsufficientCandidates { required: usize, available: usize },

    /// A guarded numeric operation failed (division by zero, NaN, infeasible bounds)
    #[error("Numeric guard tripped in {context}")]
    NumericGuard { context: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InputValidation(message.into())
    }

    pub fn numeric(context: impl Into<String>) -> Self {
        Self::NumericGuard {
            context: context.into(),
        }
    }

    /// True for errors caused by the caller's request rather than the engine
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InputValidation(_) | Error::InsufficientCandidates { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal data quality issue. The engine proceeds with a documented
/// fallback and reports the warning alongside the result.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    #[error("{symbol}: no historical returns, backtest uses a placeholder series")]
    MissingHistory { symbol: String },

    #[error("{symbol}: expense ratio missing, using asset-class estimate")]
    MissingExpenseRatio { symbol: String },

    #[error("{symbol}: sector weights missing, sector cap not applied")]
    MissingSectorData { symbol: String },

    #[error("{symbol}: {field} missing, using fallback value")]
    FallbackMetric { symbol: String, field: String },

    #[error("sector cap relaxed for {sector} to reach the minimum holding count")]
    SectorCapRelaxed { sector: String },
}

impl DataWarning {
    /// Warnings that make the backtest or metrics less trustworthy
    pub fn reduces_confidence(&self) -> bool {
        matches!(
            self,
            DataWarning::MissingHistory { .. } | DataWarning::FallbackMetric { .. }
        )
    }
}
