//! Fixtures for building asset records in tests and demos

use std::collections::HashMap;

use crate::types::{AssetRecord, HorizonValues};

/// Fluent builder over [`AssetRecord`]
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    record: AssetRecord,
}

impl AssetBuilder {
    /// Empty record: every numeric field unknown
    pub fn new(symbol: &str, asset_class: &str) -> Self {
        Self {
            record: AssetRecord {
                symbol: symbol.to_string(),
                name: format!("{} ETF", symbol),
                asset_class: asset_class.to_string(),
                ..Default::default()
            },
        }
    }

    /// Record with every field populated from a few headline numbers
    pub fn complete(symbol: &str, asset_class: &str, ret: f64, vol: f64) -> Self {
        let sharpe = if vol > 0.0 { (ret - 2.0) / vol } else { 0.0 };
        Self::new(symbol, asset_class)
            .returns(ret, ret, ret, ret, ret)
            .volatility(vol)
            .sharpe(sharpe)
            .dividend_yield(1.5)
            .expense_ratio(0.05)
            .aum(20_000_000_000.0)
            .max_drawdown(-1.5 * vol)
            .sector("Technology", 25.0)
            .sector("Financials", 15.0)
    }

    pub fn returns(mut self, m12: f64, m24: f64, m36: f64, y5: f64, y10: f64) -> Self {
        self.record.returns = HorizonValues {
            m12: Some(m12),
            m24: Some(m24),
            m36: Some(m36),
            y5: Some(y5),
            y10: Some(y10),
        };
        self
    }

    pub fn return_horizons(mut self, returns: HorizonValues) -> Self {
        self.record.returns = returns;
        self
    }

    pub fn volatility(mut self, vol: f64) -> Self {
        self.record.volatility = HorizonValues {
            m12: Some(vol),
            m24: Some(vol),
            m36: Some(vol),
            y5: Some(vol),
            y10: Some(vol),
        };
        self
    }

    pub fn sharpe(mut self, sharpe: f64) -> Self {
        self.record.sharpe = HorizonValues {
            m12: Some(sharpe),
            m24: Some(sharpe),
            m36: Some(sharpe),
            y5: Some(sharpe),
            y10: Some(sharpe),
        };
        self
    }

    pub fn dividend_yield(mut self, value: f64) -> Self {
        self.record.dividend_yield = Some(value);
        self
    }

    pub fn expense_ratio(mut self, value: f64) -> Self {
        self.record.expense_ratio = Some(value);
        self
    }

    pub fn no_expense_ratio(mut self) -> Self {
        self.record.expense_ratio = None;
        self
    }

    pub fn aum(mut self, value: f64) -> Self {
        self.record.aum = Some(value);
        self
    }

    pub fn max_drawdown(mut self, value: f64) -> Self {
        self.record.max_drawdown = Some(value);
        self
    }

    pub fn sector(mut self, name: &str, weight: f64) -> Self {
        self.record.sector_weights.insert(name.to_string(), weight);
        self
    }

    pub fn sectors(mut self, sectors: &[(&str, f64)]) -> Self {
        self.record.sector_weights = sectors
            .iter()
            .map(|(name, weight)| (name.to_string(), *weight))
            .collect::<HashMap<_, _>>();
        self
    }

    pub fn build(self) -> AssetRecord {
        self.record
    }
}

/// Bond fund with realistic aggregate-bond numbers
pub fn bond_fund(symbol: &str) -> AssetRecord {
    AssetBuilder::complete(symbol, "Intermediate Core Bond", 4.0, 5.0)
        .sharpe(0.4)
        .dividend_yield(3.5)
        .expense_ratio(0.04)
        .max_drawdown(-15.0)
        .sectors(&[("Government", 45.0), ("Corporate", 30.0), ("Securitized", 25.0)])
        .build()
}

/// US large-cap blend fund
pub fn large_blend_fund(symbol: &str) -> AssetRecord {
    AssetBuilder::complete(symbol, "Large Blend", 12.0, 16.0)
        .sharpe(1.0)
        .dividend_yield(1.4)
        .expense_ratio(0.03)
        .max_drawdown(-24.0)
        .sectors(&[("Technology", 28.0), ("Healthcare", 13.0), ("Financials", 12.0)])
        .build()
}

/// Developed-markets international fund
pub fn international_fund(symbol: &str) -> AssetRecord {
    AssetBuilder::complete(symbol, "Foreign Large Blend", 7.0, 17.0)
        .sharpe(0.5)
        .dividend_yield(2.8)
        .expense_ratio(0.07)
        .max_drawdown(-27.0)
        .sectors(&[("Financials", 20.0), ("Industrials", 16.0), ("Healthcare", 11.0)])
        .build()
}

/// Six-asset universe: two bond, two large blend, two international funds
pub fn six_asset_universe() -> Vec<AssetRecord> {
    vec![
        bond_fund("BND"),
        bond_fund("AGG"),
        large_blend_fund("VTI"),
        large_blend_fund("ITOT"),
        international_fund("VEA"),
        international_fund("IEFA"),
    ]
}

/// Broader universe spanning every major class
pub fn diversified_universe() -> Vec<AssetRecord> {
    let mut assets = six_asset_universe();
    assets.extend([
        AssetBuilder::complete("QQQ", "Large Growth", 18.0, 22.0)
            .sharpe(1.2)
            .dividend_yield(0.6)
            .expense_ratio(0.20)
            .max_drawdown(-35.0)
            .sectors(&[("Technology", 50.0), ("Communication", 16.0)])
            .build(),
        AssetBuilder::complete("VTV", "Large Value", 9.0, 15.0)
            .sharpe(0.8)
            .dividend_yield(2.4)
            .expense_ratio(0.04)
            .sectors(&[("Financials", 22.0), ("Healthcare", 17.0)])
            .build(),
        AssetBuilder::complete("VO", "Mid-Cap Blend", 9.5, 19.0)
            .sharpe(0.6)
            .expense_ratio(0.04)
            .sectors(&[("Industrials", 18.0), ("Financials", 15.0)])
            .build(),
        AssetBuilder::complete("VB", "Small Blend", 8.0, 22.0)
            .sharpe(0.4)
            .expense_ratio(0.05)
            .sectors(&[("Industrials", 19.0), ("Financials", 16.0)])
            .build(),
        AssetBuilder::complete("VWO", "Diversified Emerging Mkts", 5.0, 19.0)
            .sharpe(0.3)
            .dividend_yield(3.0)
            .expense_ratio(0.08)
            .sectors(&[("Technology", 23.0), ("Financials", 21.0)])
            .build(),
        AssetBuilder::complete("VNQ", "Real Estate", 6.0, 21.0)
            .sharpe(0.3)
            .dividend_yield(3.9)
            .expense_ratio(0.12)
            .sectors(&[("Real Estate", 99.0)])
            .build(),
        AssetBuilder::complete("GLD", "Commodities Focused", 10.0, 14.0)
            .sharpe(0.6)
            .dividend_yield(0.0)
            .expense_ratio(0.40)
            .sectors(&[])
            .build(),
    ]);
    assets
}
