//! Embedded calendar-year benchmark and currency returns (%)

/// Calendar years covered by the backtest
pub const BACKTEST_YEARS: [i32; 10] = [2015, 2016, 2017, 2018, 2019, 2020, 2021, 2022, 2023, 2024];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkSeries {
    pub name: &'static str,
    /// One total return per entry of [`BACKTEST_YEARS`]
    pub returns: [f64; 10],
}

pub const SP500: BenchmarkSeries = BenchmarkSeries {
    name: "S&P 500",
    returns: [1.4, 12.0, 21.8, -4.4, 31.5, 18.4, 28.7, -18.1, 26.3, 25.0],
};

pub const MSCI_WORLD: BenchmarkSeries = BenchmarkSeries {
    name: "MSCI World",
    returns: [-0.9, 7.5, 22.4, -8.7, 27.7, 15.9, 21.8, -18.1, 23.8, 18.7],
};

pub const US_AGGREGATE: BenchmarkSeries = BenchmarkSeries {
    name: "US Aggregate Bond",
    returns: [0.55, 2.65, 3.54, 0.01, 8.72, 7.51, -1.54, -13.01, 5.53, 1.25],
};

/// Return of holding USD, measured in EUR
pub const USD_EUR_FX: BenchmarkSeries = BenchmarkSeries {
    name: "USD/EUR",
    returns: [11.4, 3.2, -12.3, 4.8, 2.1, -8.3, 7.5, 6.3, -3.1, 6.7],
};
