//! ETF Portfolio Engine CLI
//!
//! Builds, recalculates and scores ETF portfolios against a JSON catalog.

use std::time::Duration;

use clap::{Parser, Subcommand};
use etf_portfolio_engine::{
    config::Config,
    engine::PortfolioEngine,
    error::Error,
    types::{Currency, Objective, PortfolioReport, RiskProfile, ScoreResult, StrategyConfig},
    InMemoryCatalog,
};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "etf-portfolio")]
#[command(about = "Recommend and evaluate multi-asset ETF portfolios")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Clone)]
struct StrategyArgs {
    /// conservative, moderate or aggressive
    #[arg(short, long, default_value = "moderate")]
    profile: RiskProfile,

    /// retirement, house, emergency, growth or income
    #[arg(short, long, default_value = "growth")]
    objective: Objective,

    /// Initial investment
    #[arg(short, long)]
    amount: Decimal,

    /// USD or EUR
    #[arg(long, default_value = "USD")]
    currency: Currency,

    /// Monthly contribution used by the projections
    #[arg(long, default_value = "0")]
    monthly: Decimal,
}

impl StrategyArgs {
    fn to_strategy(&self) -> StrategyConfig {
        StrategyConfig::new(self.profile, self.objective, self.amount)
            .with_currency(self.currency)
            .with_monthly_contribution(self.monthly)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a portfolio from the catalog
    Build {
        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Evaluate a chosen set of symbols
    Recalculate {
        /// Comma-separated symbols, e.g. VTI,BND,VEA
        #[arg(short, long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Score a single ETF
    Score {
        /// ETF symbol
        symbol: String,
    },
}

enum Output {
    Report(Box<PortfolioReport>),
    Score(ScoreResult),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.runtime.log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let catalog = InMemoryCatalog::from_config(&config.catalog)?;
    let engine = PortfolioEngine::from_config(catalog, &config);
    let timeout_secs = config.runtime.request_timeout_secs;

    let task = tokio::task::spawn_blocking(move || -> Result<Output, Error> {
        match cli.command {
            Commands::Build { strategy } => engine
                .build_portfolio(&strategy.to_strategy())
                .map(|r| Output::Report(Box::new(r))),
            Commands::Recalculate { symbols, strategy } => engine
                .recalculate(&symbols, &strategy.to_strategy())
                .map(|r| Output::Report(Box::new(r))),
            Commands::Score { symbol } => engine.score_one(&symbol).map(Output::Score),
        }
    });

    let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(joined) => joined??,
        Err(_) => return Err(Error::Timeout(timeout_secs).into()),
    };

    match output {
        Output::Report(report) if cli.json => {
            println!("{}", serde_json::to_string_pretty(&report)?)
        }
        Output::Report(report) => print_report(&report),
        Output::Score(result) if cli.json => {
            println!("{}", serde_json::to_string_pretty(&result)?)
        }
        Output::Score(result) => print_score(&result),
    }

    Ok(())
}

fn print_report(report: &PortfolioReport) {
    let strategy = &report.strategy;
    let portfolio = &report.portfolio;
    let metrics = &portfolio.metrics;

    println!(
        "\n📊 Portfolio ({} / {}, {} {})\n",
        strategy.risk_profile, strategy.objective, strategy.amount, strategy.currency
    );
    println!("{:<8} {:<28} {:>6} {:>8} {:>14}", "Symbol", "Class", "Score", "Weight", "Amount");
    println!("{}", "-".repeat(68));
    for holding in &portfolio.holdings {
        println!(
            "{:<8} {:<28} {:>6} {:>7.1}% {:>14}",
            holding.score.symbol,
            holding.score.class().label(),
            holding.score.composite,
            holding.weight * 100.0,
            holding.amount
        );
    }

    println!("\n📈 Metrics\n");
    println!("Expected return:     {:.2}%", metrics.expected_return);
    println!("Expected volatility: {:.2}%", metrics.expected_volatility);
    println!("Sharpe ratio:        {:.2}", metrics.sharpe_ratio);
    println!("Max drawdown:        {:.2}%", metrics.max_drawdown);
    println!("Expense ratio:       {:.3}% ({} / year)", metrics.expense_ratio, metrics.annual_fee);
    println!("Dividend yield:      {:.2}%", metrics.dividend_yield);
    println!("VaR 95 / CVaR 95:    {:.2}% / {:.2}%", metrics.var_95, metrics.cvar_95);
    println!(
        "Diversification:     {} / 100 ({:.1} effective holdings)",
        portfolio.diversification_score, portfolio.effective_holdings
    );

    let backtest = &report.backtest;
    println!("\n🕰  Backtest\n");
    println!(
        "{:<6} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Portfolio", backtest.benchmark_names[0], backtest.benchmark_names[1], backtest.benchmark_names[2]
    );
    for point in &backtest.points {
        println!(
            "{:<6} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            point.year,
            point.portfolio_value,
            point.benchmark_a_value,
            point.benchmark_b_value,
            point.benchmark_c_value
        );
    }
    println!(
        "Total {:.2}%, annualized {:.2}%, max drawdown {:.2}%",
        backtest.summary.total_return, backtest.summary.annualized_return, backtest.summary.max_drawdown
    );

    println!("\n🎲 Projections\n");
    println!(
        "{:<8} {:>14} {:>14} {:>14} {:>10}",
        "Months", "Pessimistic", "Expected", "Optimistic", "P(loss)"
    );
    for band in &report.projections {
        println!(
            "{:<8} {:>14} {:>14} {:>14} {:>9.1}%",
            band.horizon_months,
            band.pessimistic,
            band.expected,
            band.optimistic,
            band.probability_of_loss * 100.0
        );
    }

    if let Some(shortfall) = &report.shortfall {
        println!(
            "\n⚠️  Only {} of {} required holdings passed the quality floor",
            shortfall.selected, shortfall.required
        );
    }
    if !report.warnings.is_empty() {
        println!("\n⚠️  Data warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
    if report.reduced_confidence() {
        println!("\nResults rest partly on estimated data; treat them with reduced confidence.");
    }
}

fn print_score(result: &ScoreResult) {
    println!("\n🔎 {} ({})\n", result.symbol, result.class().label());
    println!("Composite: {} / 100", result.composite);
    let c = &result.components;
    println!("Performance:        {}", c.performance);
    println!("Consistency:        {}", c.consistency);
    println!("Volatility control: {}", c.volatility_control);
    println!("Liquidity:          {}", c.liquidity);
    println!("Cost efficiency:    {}", c.cost_efficiency);
    println!("Dividend quality:   {}", c.dividend_quality);
    println!("\n{}", result.rationale);
}
