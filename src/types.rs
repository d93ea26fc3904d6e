//! Core types shared by every engine stage
//!
//! Percent-valued fields (returns, volatility, expense ratio, dividend yield,
//! drawdown) are in percentage points: `12.5` means 12.5%. Max drawdown is
//! non-positive. Money crossing the engine boundary is a [`Decimal`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{DataWarning, Error};

// ──────────────────────────────────────────────────────────────────────────────
// Asset records
// ──────────────────────────────────────────────────────────────────────────────

/// One value per trailing horizon (annualized where applicable)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonValues {
    pub m12: Option<f64>,
    pub m24: Option<f64>,
    pub m36: Option<f64>,
    pub y5: Option<f64>,
    pub y10: Option<f64>,
}

impl HorizonValues {
    /// Most representative single value: 12m, then 36m, 24m, 5y, 10y
    pub fn headline(&self) -> Option<f64> {
        self.m12
            .or(self.m36)
            .or(self.m24)
            .or(self.y5)
            .or(self.y10)
            .filter(|v| v.is_finite())
    }

    /// Available (months, value) pairs ordered by horizon length
    pub fn available(&self) -> Vec<(u32, f64)> {
        [
            (12, self.m12),
            (24, self.m24),
            (36, self.m36),
            (60, self.y5),
            (120, self.y10),
        ]
        .into_iter()
        .filter_map(|(months, v)| v.filter(|x| x.is_finite()).map(|x| (months, x)))
        .collect()
    }

    /// Mean over every available horizon
    pub fn mean(&self) -> Option<f64> {
        let values = self.available();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().map(|(_, v)| v).sum::<f64>() / values.len() as f64)
    }
}

/// Raw ETF record as supplied by the catalog. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRecord {
    pub symbol: String,
    pub name: String,
    /// Free-text asset class label, normalized by the selection taxonomy
    pub asset_class: String,
    pub returns: HorizonValues,
    pub volatility: HorizonValues,
    pub sharpe: HorizonValues,
    pub dividend_yield: Option<f64>,
    pub expense_ratio: Option<f64>,
    /// Assets under management in USD
    pub aum: Option<f64>,
    pub max_drawdown: Option<f64>,
    /// Sector name -> percentage of holdings
    pub sector_weights: HashMap<String, f64>,
    pub avg_volume: Option<f64>,
    pub holdings_count: Option<u32>,
}

impl AssetRecord {
    pub fn class(&self) -> AssetClass {
        crate::selection::normalize_asset_class(&self.asset_class)
    }

    pub fn headline_return(&self) -> Option<f64> {
        self.returns.headline()
    }

    pub fn headline_volatility(&self) -> Option<f64> {
        self.volatility.headline().map(f64::abs)
    }

    pub fn headline_sharpe(&self) -> Option<f64> {
        self.sharpe.headline()
    }

    pub fn average_return(&self) -> Option<f64> {
        self.returns.mean()
    }

    /// Expense ratio, falling back to the asset-class estimate
    pub fn expense_ratio_or_estimate(&self) -> f64 {
        self.expense_ratio
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or_else(|| self.class().typical_expense_ratio())
    }

    pub fn return_or_estimate(&self) -> f64 {
        self.headline_return()
            .unwrap_or_else(|| self.class().typical_return())
    }

    pub fn volatility_or_estimate(&self) -> f64 {
        self.headline_volatility()
            .unwrap_or_else(|| self.class().typical_volatility())
    }

    /// Max drawdown magnitude (positive), falling back to the class estimate
    pub fn drawdown_magnitude(&self) -> f64 {
        self.max_drawdown
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| self.class().typical_drawdown())
            .abs()
    }

    /// Data-quality warnings for this record
    pub fn data_warnings(&self) -> Vec<DataWarning> {
        let mut warnings = Vec::new();
        if self.expense_ratio.is_none() {
            warnings.push(DataWarning::MissingExpenseRatio {
                symbol: self.symbol.clone(),
            });
        }
        if self.sector_weights.is_empty() {
            warnings.push(DataWarning::MissingSectorData {
                symbol: self.symbol.clone(),
            });
        }
        for (field, missing) in [
            ("return", self.headline_return().is_none()),
            ("volatility", self.headline_volatility().is_none()),
            ("max_drawdown", self.max_drawdown.is_none()),
        ] {
            if missing {
                warnings.push(DataWarning::FallbackMetric {
                    symbol: self.symbol.clone(),
                    field: field.to_string(),
                });
            }
        }
        warnings
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Asset class taxonomy
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    LargeCapBlend,
    LargeCapGrowth,
    LargeCapValue,
    MidCap,
    SmallCap,
    InternationalDeveloped,
    EmergingMarkets,
    Bonds,
    RealEstate,
    Commodities,
    Other,
}

/// Coarse grouping used for allocation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassGroup {
    Equity,
    Bonds,
    RealAssets,
    Other,
}

impl AssetClass {
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::LargeCapBlend => "Large Cap Blend",
            AssetClass::LargeCapGrowth => "Large Cap Growth",
            AssetClass::LargeCapValue => "Large Cap Value",
            AssetClass::MidCap => "Mid Cap",
            AssetClass::SmallCap => "Small Cap",
            AssetClass::InternationalDeveloped => "International Developed",
            AssetClass::EmergingMarkets => "Emerging Markets",
            AssetClass::Bonds => "Bonds",
            AssetClass::RealEstate => "Real Estate",
            AssetClass::Commodities => "Commodities",
            AssetClass::Other => "Other",
        }
    }

    pub fn is_large_cap(&self) -> bool {
        matches!(
            self,
            AssetClass::LargeCapBlend | AssetClass::LargeCapGrowth | AssetClass::LargeCapValue
        )
    }

    pub fn is_bond(&self) -> bool {
        matches!(self, AssetClass::Bonds)
    }

    /// Classes whose return profile is tilted toward growth
    pub fn is_growth_tilted(&self) -> bool {
        matches!(
            self,
            AssetClass::LargeCapGrowth | AssetClass::SmallCap | AssetClass::EmergingMarkets
        )
    }

    pub fn group(&self) -> ClassGroup {
        match self {
            AssetClass::Bonds => ClassGroup::Bonds,
            AssetClass::RealEstate | AssetClass::Commodities => ClassGroup::RealAssets,
            AssetClass::Other => ClassGroup::Other,
            _ => ClassGroup::Equity,
        }
    }

    /// Estimated expense ratio (%) when a record has none
    pub fn typical_expense_ratio(&self) -> f64 {
        match self {
            AssetClass::LargeCapBlend => 0.05,
            AssetClass::LargeCapGrowth | AssetClass::LargeCapValue => 0.10,
            AssetClass::MidCap => 0.15,
            AssetClass::SmallCap => 0.20,
            AssetClass::InternationalDeveloped => 0.20,
            AssetClass::EmergingMarkets => 0.30,
            AssetClass::Bonds => 0.10,
            AssetClass::RealEstate => 0.25,
            AssetClass::Commodities => 0.40,
            AssetClass::Other => 0.50,
        }
    }

    /// Estimated annual return (%) when a record has no return history
    pub fn typical_return(&self) -> f64 {
        match self {
            AssetClass::LargeCapBlend => 10.0,
            AssetClass::LargeCapGrowth => 13.0,
            AssetClass::LargeCapValue => 9.0,
            AssetClass::MidCap => 9.0,
            AssetClass::SmallCap => 8.0,
            AssetClass::InternationalDeveloped => 6.0,
            AssetClass::EmergingMarkets => 4.0,
            AssetClass::Bonds => 2.5,
            AssetClass::RealEstate => 6.0,
            AssetClass::Commodities => 4.0,
            AssetClass::Other => 5.0,
        }
    }

    /// Estimated annual volatility (%)
    pub fn typical_volatility(&self) -> f64 {
        match self {
            AssetClass::LargeCapBlend | AssetClass::LargeCapValue => 16.0,
            AssetClass::LargeCapGrowth => 20.0,
            AssetClass::MidCap => 19.0,
            AssetClass::SmallCap => 22.0,
            AssetClass::InternationalDeveloped => 17.0,
            AssetClass::EmergingMarkets => 20.0,
            AssetClass::Bonds => 6.0,
            AssetClass::RealEstate => 20.0,
            AssetClass::Commodities => 18.0,
            AssetClass::Other => 18.0,
        }
    }

    /// Estimated max drawdown (%, non-positive)
    pub fn typical_drawdown(&self) -> f64 {
        match self {
            AssetClass::LargeCapBlend => -24.0,
            AssetClass::LargeCapGrowth => -32.0,
            AssetClass::LargeCapValue => -22.0,
            AssetClass::MidCap => -28.0,
            AssetClass::SmallCap => -32.0,
            AssetClass::InternationalDeveloped => -27.0,
            AssetClass::EmergingMarkets => -35.0,
            AssetClass::Bonds => -15.0,
            AssetClass::RealEstate | AssetClass::Commodities | AssetClass::Other => -30.0,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Strategy
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Retirement,
    House,
    Emergency,
    Growth,
    Income,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Native currency of every catalog ETF
    #[default]
    Usd,
    Eur,
}

impl FromStr for RiskProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "moderate" => Ok(RiskProfile::Moderate),
            "aggressive" => Ok(RiskProfile::Aggressive),
            other => Err(Error::invalid(format!("unknown risk profile '{}'", other))),
        }
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retirement" => Ok(Objective::Retirement),
            "house" => Ok(Objective::House),
            "emergency" => Ok(Objective::Emergency),
            "growth" => Ok(Objective::Growth),
            "income" => Ok(Objective::Income),
            other => Err(Error::invalid(format!("unknown objective '{}'", other))),
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(Error::invalid(format!("unsupported currency '{}'", other))),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Objective::Retirement => "retirement",
            Objective::House => "house",
            Objective::Emergency => "emergency",
            Objective::Growth => "growth",
            Objective::Income => "income",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => f.write_str("USD"),
            Currency::Eur => f.write_str("EUR"),
        }
    }
}

/// Investor request. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub risk_profile: RiskProfile,
    pub objective: Objective,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub monthly_contribution: Decimal,
}

impl StrategyConfig {
    pub fn new(risk_profile: RiskProfile, objective: Objective, amount: Decimal) -> Self {
        Self {
            risk_profile,
            objective,
            amount,
            currency: Currency::Usd,
            monthly_contribution: Decimal::ZERO,
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_monthly_contribution(mut self, contribution: Decimal) -> Self {
        self.monthly_contribution = contribution;
        self
    }

    /// Reject malformed requests before any computation
    pub fn validate(&self, min_amount: Decimal, max_amount: Decimal) -> Result<(), Error> {
        if self.amount < min_amount || self.amount > max_amount {
            return Err(Error::invalid(format!(
                "amount {} outside allowed range [{}, {}]",
                self.amount, min_amount, max_amount
            )));
        }
        if self.monthly_contribution < Decimal::ZERO {
            return Err(Error::invalid(format!(
                "monthly contribution {} must not be negative",
                self.monthly_contribution
            )));
        }
        Ok(())
    }

    /// Whether the allocator runs its top-performer redistribution pass
    pub fn favours_concentration(&self) -> bool {
        self.risk_profile == RiskProfile::Aggressive || self.objective == Objective::Growth
    }

    pub fn bounds(&self) -> StrategyBounds {
        StrategyBounds::for_profile(self.risk_profile)
    }
}

/// Allocation target range for a class group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassTarget {
    pub group: ClassGroup,
    pub min: f64,
    pub max: f64,
}

/// Numeric bounds derived from the risk profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyBounds {
    pub min_weight: f64,
    pub max_weight: f64,
    pub min_etfs: usize,
    pub max_etfs: usize,
    /// Maximum selected assets sharing one dominant sector
    pub max_per_sector: usize,
    /// Maximum blended weight of any single sector (reported, not enforced)
    pub max_sector_concentration: f64,
    pub class_targets: Vec<ClassTarget>,
    /// Asset classes to fill first, in order
    pub priority: Vec<AssetClass>,
}

impl StrategyBounds {
    pub fn for_profile(profile: RiskProfile) -> Self {
        use AssetClass::*;
        let target = |group, min, max| ClassTarget { group, min, max };
        match profile {
            RiskProfile::Conservative => Self {
                min_weight: 0.01,
                max_weight: 0.50,
                min_etfs: 4,
                max_etfs: 6,
                max_per_sector: 3,
                max_sector_concentration: 0.35,
                class_targets: vec![
                    target(ClassGroup::Bonds, 0.40, 0.70),
                    target(ClassGroup::Equity, 0.25, 0.55),
                    target(ClassGroup::RealAssets, 0.0, 0.10),
                ],
                priority: vec![
                    Bonds,
                    LargeCapBlend,
                    Bonds,
                    InternationalDeveloped,
                    LargeCapValue,
                    RealEstate,
                ],
            },
            RiskProfile::Moderate => Self {
                min_weight: 0.01,
                max_weight: 0.65,
                min_etfs: 5,
                max_etfs: 8,
                max_per_sector: 3,
                max_sector_concentration: 0.40,
                class_targets: vec![
                    target(ClassGroup::Bonds, 0.20, 0.45),
                    target(ClassGroup::Equity, 0.45, 0.75),
                    target(ClassGroup::RealAssets, 0.0, 0.15),
                ],
                priority: vec![
                    LargeCapBlend,
                    Bonds,
                    InternationalDeveloped,
                    LargeCapGrowth,
                    MidCap,
                    EmergingMarkets,
                    RealEstate,
                    SmallCap,
                ],
            },
            RiskProfile::Aggressive => Self {
                min_weight: 0.01,
                max_weight: 0.80,
                min_etfs: 4,
                max_etfs: 7,
                max_per_sector: 3,
                max_sector_concentration: 0.50,
                class_targets: vec![
                    target(ClassGroup::Bonds, 0.0, 0.20),
                    target(ClassGroup::Equity, 0.70, 1.0),
                    target(ClassGroup::RealAssets, 0.0, 0.20),
                ],
                priority: vec![
                    LargeCapGrowth,
                    LargeCapBlend,
                    EmergingMarkets,
                    SmallCap,
                    InternationalDeveloped,
                    MidCap,
                    Commodities,
                ],
            },
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Scoring output
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Performance,
    Consistency,
    VolatilityControl,
    Liquidity,
    CostEfficiency,
    DividendQuality,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Performance,
        Component::Consistency,
        Component::VolatilityControl,
        Component::Liquidity,
        Component::CostEfficiency,
        Component::DividendQuality,
    ];

    pub fn describe(&self) -> &'static str {
        match self {
            Component::Performance => "risk-adjusted performance",
            Component::Consistency => "return consistency",
            Component::VolatilityControl => "volatility control",
            Component::Liquidity => "liquidity",
            Component::CostEfficiency => "cost efficiency",
            Component::DividendQuality => "dividend quality",
        }
    }
}

/// Component scores on a 0-100 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub performance: u8,
    pub consistency: u8,
    pub volatility_control: u8,
    pub liquidity: u8,
    pub cost_efficiency: u8,
    pub dividend_quality: u8,
}

impl ComponentScores {
    pub fn get(&self, component: Component) -> u8 {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub symbol: String,
    /// Composite quality score, 0-100
    pub composite: u8,
    pub components: ComponentScores,
    /// Components scored from a fallback rather than real data
    pub fallback_components: Vec<Component>,
    pub rationale: String,
    pub asset: AssetRecord,
}

impl ScoreResult {
    pub fn class(&self) -> AssetClass {
        self.asset.class()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Portfolio output
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub expected_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub expense_ratio: f64,
    pub dividend_yield: f64,
    /// Parametric 95% VaR approximation (-1.645 x volatility)
    pub var_95: f64,
    /// Parametric 95% CVaR-like approximation (-2.0 x volatility)
    pub cvar_95: f64,
    /// Yearly fund costs in the investment currency
    pub annual_fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub score: ScoreResult,
    pub weight: f64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAllocation {
    pub group: ClassGroup,
    pub weight: f64,
    pub target_min: f64,
    pub target_max: f64,
    pub within_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPortfolio {
    pub holdings: Vec<Holding>,
    pub metrics: PortfolioMetrics,
    /// 0-100
    pub diversification_score: u8,
    pub class_breakdown: Vec<ClassAllocation>,
    /// Weight-blended sector exposure (%)
    pub sector_exposure: Vec<(String, f64)>,
    /// 1 / sum(w^2)
    pub effective_holdings: f64,
}

impl SelectedPortfolio {
    pub fn weights(&self) -> Vec<f64> {
        self.holdings.iter().map(|h| h.weight).collect()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.holdings.iter().map(|h| h.score.symbol.as_str()).collect()
    }

    pub fn weight_in(&self, group: ClassGroup) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.score.class().group() == group)
            .map(|h| h.weight)
            .sum()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Backtest and projection output
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacktestPoint {
    pub year: i32,
    pub portfolio_value: f64,
    pub benchmark_a_value: f64,
    pub benchmark_b_value: f64,
    pub benchmark_c_value: f64,
    /// Portfolio return for the year (%), after currency conversion
    pub portfolio_return: f64,
    pub fx_applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestSummary {
    pub total_return: f64,
    pub annualized_return: f64,
    /// Population standard deviation of annual returns
    pub volatility: f64,
    /// Versus the fixed-income benchmark as risk-free proxy
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub outperformance_a: f64,
    pub outperformance_b: f64,
    pub outperformance_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestSeries {
    pub base_value: f64,
    pub benchmark_names: [String; 3],
    pub points: Vec<BacktestPoint>,
    pub summary: BacktestSummary,
    pub reduced_confidence: bool,
    /// Holdings backed by the neutral placeholder series
    pub placeholder_symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionBand {
    pub horizon_months: u32,
    /// 15th percentile
    pub pessimistic: Decimal,
    /// Median
    pub expected: Decimal,
    /// 85th percentile
    pub optimistic: Decimal,
    /// Initial amount plus contributions, no growth
    pub baseline: Decimal,
    pub pessimistic_change_pct: f64,
    pub expected_change_pct: f64,
    pub optimistic_change_pct: f64,
    pub probability_of_loss: f64,
}

/// Selection came up short of the profile minimum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub required: usize,
    pub selected: usize,
    pub rejected_below_floor: Vec<String>,
}

/// Full result of one engine run
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub strategy: StrategyConfig,
    pub portfolio: SelectedPortfolio,
    pub backtest: BacktestSeries,
    pub projections: Vec<ProjectionBand>,
    pub warnings: Vec<DataWarning>,
    pub shortfall: Option<Shortfall>,
}

impl PortfolioReport {
    pub fn reduced_confidence(&self) -> bool {
        self.backtest.reduced_confidence || self.warnings.iter().any(|w| w.reduces_confidence())
    }
}

/// Convert an f64 amount into a currency value rounded to cents.
///
/// Non-finite or out-of-range input yields zero and logs a warning.
pub fn to_money(value: f64) -> Decimal {
    use rust_decimal::prelude::FromPrimitive;
    match Decimal::from_f64(value) {
        Some(d) => d.round_dp(2),
        None => {
            tracing::warn!("Cannot represent {} as a currency amount, using 0", value);
            Decimal::ZERO
        }
    }
}

/// Convert a currency value into f64 for statistics
pub fn money_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}

/// Default minimum investment accepted by the engine
pub const DEFAULT_MIN_AMOUNT: Decimal = dec!(100);
/// Default maximum investment accepted by the engine
pub const DEFAULT_MAX_AMOUNT: Decimal = dec!(100000000);
