//! Heuristic pairwise correlation estimator
//!
//! No price history is consumed: correlation is approximated from shared
//! asset class, overlapping sector exposure and similar risk/return figures.

use serde::Serialize;

use crate::types::{AssetRecord, ScoreResult};

pub const MIN_CORRELATION: f64 = 0.1;
pub const MAX_CORRELATION: f64 = 0.95;

/// Sector weight (%) both assets must hold for the sector to count as shared
const SHARED_SECTOR_THRESHOLD: f64 = 10.0;

/// Symmetric correlation matrix with a unit diagonal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Index pairs (i < j) whose correlation exceeds `threshold`
    pub fn pairs_above(&self, threshold: f64) -> Vec<(usize, usize, f64)> {
        let n = self.len();
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let c = self.values[i][j];
                if c > threshold {
                    pairs.push((i, j, c));
                }
            }
        }
        pairs
    }

    /// Mean off-diagonal correlation, 0 for fewer than two assets
    pub fn average_pairwise(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let total: f64 = self.pairs_above(f64::NEG_INFINITY).iter().map(|(_, _, c)| c).sum();
        total / (n * (n - 1) / 2) as f64
    }
}

pub fn correlate(selected: &[ScoreResult]) -> CorrelationMatrix {
    let n = selected.len();
    let mut values = vec![vec![1.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let c = pair_correlation(&selected[i].asset, &selected[j].asset);
            tracing::debug!(
                "Correlation {} / {} = {:.2}",
                selected[i].symbol,
                selected[j].symbol,
                c
            );
            values[i][j] = c;
            values[j][i] = c;
        }
    }

    CorrelationMatrix {
        symbols: selected.iter().map(|s| s.symbol.clone()).collect(),
        values,
    }
}

/// Estimated correlation of two assets, in [0.1, 0.95]
pub fn pair_correlation(a: &AssetRecord, b: &AssetRecord) -> f64 {
    let mut c = MIN_CORRELATION;

    let (class_a, class_b) = (a.class(), b.class());
    if class_a == class_b {
        c += 0.4;
    } else if (class_a.is_large_cap() && class_b.is_large_cap())
        || (class_a.is_bond() && class_b.is_bond())
    {
        c += 0.2;
    }

    let shared = a
        .sector_weights
        .iter()
        .filter(|(sector, weight)| {
            **weight >= SHARED_SECTOR_THRESHOLD
                && b
                    .sector_weights
                    .get(*sector)
                    .is_some_and(|w| *w >= SHARED_SECTOR_THRESHOLD)
        })
        .count();
    c += (0.1 * shared as f64).min(0.3);

    if let (Some(vol_a), Some(vol_b)) = (a.headline_volatility(), b.headline_volatility()) {
        let gap = (vol_a - vol_b).abs();
        if gap < 5.0 {
            c += 0.2;
        } else if gap < 10.0 {
            c += 0.1;
        }
    }

    if let (Some(ret_a), Some(ret_b)) = (a.average_return(), b.average_return()) {
        let gap = (ret_a - ret_b).abs();
        if gap < 3.0 {
            c += 0.1;
        } else if gap < 6.0 {
            c += 0.05;
        }
    }

    c.clamp(MIN_CORRELATION, MAX_CORRELATION)
}
