//! End-to-end tests against the shipped ETF catalog

#[cfg(test)]
mod tests {
    use super::super::catalog::InMemoryCatalog;
    use super::super::config::{Config, SimulationConfig};
    use super::super::engine::{EngineSettings, PortfolioEngine};
    use super::super::types::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const PROFILES: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];
    const OBJECTIVES: [Objective; 5] = [
        Objective::Retirement,
        Objective::House,
        Objective::Emergency,
        Objective::Growth,
        Objective::Income,
    ];

    fn engine() -> PortfolioEngine<InMemoryCatalog> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/etf_catalog.json");
        let catalog = InMemoryCatalog::from_json_file(path).unwrap();
        let settings = EngineSettings {
            simulation: SimulationConfig {
                paths: 300,
                ..Default::default()
            },
            ..Default::default()
        };
        PortfolioEngine::new(catalog, settings)
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_strategy_produces_a_valid_report() {
        let engine = engine();
        for profile in PROFILES {
            for objective in OBJECTIVES {
                let strategy = StrategyConfig::new(profile, objective, dec!(50000));
                let report = engine.build_portfolio(&strategy).unwrap();
                let bounds = strategy.bounds();
                let portfolio = &report.portfolio;

                assert!(portfolio.holdings.len() >= 2, "{} / {}", profile, objective);
                assert!(portfolio.holdings.len() <= bounds.max_etfs);

                let sum: f64 = portfolio.weights().iter().sum();
                assert!((sum - 1.0).abs() < 1e-6, "{} / {}: sum {}", profile, objective, sum);
                for w in portfolio.weights() {
                    assert!(w >= bounds.min_weight - 1e-9 && w <= bounds.max_weight + 1e-9);
                }

                let total: Decimal = portfolio.holdings.iter().map(|h| h.amount).sum();
                assert_eq!(total, dec!(50000));

                let mut seen = portfolio.symbols();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), portfolio.holdings.len());

                assert!((0..=100).contains(&portfolio.diversification_score));
                assert_eq!(report.backtest.points.len(), 10);
                assert_eq!(report.projections.len(), 4);
                for band in &report.projections {
                    assert!(band.pessimistic <= band.expected && band.expected <= band.optimistic);
                    assert!((0.0..=1.0).contains(&band.probability_of_loss));
                }
            }
        }
    }

    #[test]
    fn test_conservative_portfolio_leans_on_bonds() {
        let engine = engine();
        let strategy = StrategyConfig::new(RiskProfile::Conservative, Objective::Retirement, dec!(100000));
        let report = engine.build_portfolio(&strategy).unwrap();

        assert!(report.portfolio.weight_in(ClassGroup::Bonds) > 0.0);
        let aggressive = engine
            .build_portfolio(&StrategyConfig::new(
                RiskProfile::Aggressive,
                Objective::Retirement,
                dec!(100000),
            ))
            .unwrap();
        assert!(
            report.portfolio.metrics.expected_volatility
                <= aggressive.portfolio.metrics.expected_volatility
        );
    }

    #[test]
    fn test_runs_are_reproducible() {
        let engine = engine();
        let strategy = StrategyConfig::new(RiskProfile::Moderate, Objective::Growth, dec!(20000))
            .with_monthly_contribution(dec!(250));

        let first = engine.build_portfolio(&strategy).unwrap();
        let second = engine.build_portfolio(&strategy).unwrap();

        assert_eq!(first.portfolio, second.portfolio);
        assert_eq!(first.backtest, second.backtest);
        assert_eq!(first.projections, second.projections);
        assert_ne!(first.run_id, second.run_id);
    }

    #[test]
    fn test_recalculate_user_selection_in_euros() {
        let engine = engine();
        let strategy = StrategyConfig::new(RiskProfile::Moderate, Objective::House, dec!(12000))
            .with_currency(Currency::Eur);

        let report = engine
            .recalculate(&symbols(&["vti", "BND", "GLD"]), &strategy)
            .unwrap();

        assert_eq!(report.portfolio.symbols(), vec!["VTI", "BND", "GLD"]);
        assert!(report.backtest.points.iter().all(|p| p.fx_applied));
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, super::super::error::DataWarning::MissingSectorData { symbol } if symbol == "GLD")));
    }

    #[test]
    fn test_score_one_from_catalog() {
        let engine = engine();
        let vti = engine.score_one("VTI").unwrap();
        assert!(vti.composite <= 100);
        assert!(vti.fallback_components.is_empty());
        assert!(!vti.rationale.is_empty());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let engine = engine();
        let strategy = StrategyConfig::new(RiskProfile::Aggressive, Objective::Growth, dec!(5000));
        let report = engine.build_portfolio(&strategy).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["run_id"].is_string());
        assert_eq!(json["strategy"]["risk_profile"], "aggressive");
        assert_eq!(json["projections"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_engine_from_default_config() {
        let mut config = Config::default();
        config.catalog.path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/etf_catalog.json").to_string();
        let catalog = InMemoryCatalog::from_config(&config.catalog).unwrap();
        let engine = PortfolioEngine::from_config(catalog, &config);

        let strategy = StrategyConfig::new(RiskProfile::Moderate, Objective::Income, dec!(1000));
        assert!(engine.build_portfolio(&strategy).is_ok());
    }
}
