//! Diversification-aware ETF selection
//!
//! Picks one asset per entry of the risk profile's class priority list, then
//! fills remaining slots by composite score. A per-sector cap limits how many
//! selected assets may share a dominant sector; it is lifted only when the
//! candidate pool itself lacks sector diversity.

mod taxonomy;

#[cfg(test)]
mod tests;

pub use taxonomy::{dominant_sector, normalize_asset_class};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::DataWarning;
use crate::types::{ScoreResult, Shortfall, StrategyBounds, StrategyConfig};

/// Composite score below which an asset is never selected
pub const DEFAULT_QUALITY_FLOOR: u8 = 40;

/// Distinct sectors the pool needs before the sector cap applies
const MIN_POOL_SECTORS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SelectionOutcome {
    pub selected: Vec<ScoreResult>,
    pub rejected_below_floor: Vec<String>,
    pub shortfall: Option<Shortfall>,
    pub warnings: Vec<DataWarning>,
}

/// Ranking order: composite desc, AUM desc (unknown last), symbol asc
pub fn compare_candidates(a: &ScoreResult, b: &ScoreResult) -> Ordering {
    b.composite
        .cmp(&a.composite)
        .then_with(|| {
            let aum_a = a.asset.aum.filter(|v| v.is_finite()).unwrap_or(f64::NEG_INFINITY);
            let aum_b = b.asset.aum.filter(|v| v.is_finite()).unwrap_or(f64::NEG_INFINITY);
            aum_b.total_cmp(&aum_a)
        })
        .then_with(|| a.symbol.cmp(&b.symbol))
}

pub fn select(scored: &[ScoreResult], strategy: &StrategyConfig) -> SelectionOutcome {
    select_with_floor(scored, strategy, DEFAULT_QUALITY_FLOOR)
}

pub fn select_with_floor(
    scored: &[ScoreResult],
    strategy: &StrategyConfig,
    quality_floor: u8,
) -> SelectionOutcome {
    let outcome = select_with_bounds(scored, &strategy.bounds(), quality_floor);
    tracing::info!(
        "Selected {} asset(s) for {} / {}",
        outcome.selected.len(),
        strategy.risk_profile,
        strategy.objective
    );
    outcome
}

/// Select against explicit bounds rather than a profile's table
pub fn select_with_bounds(
    scored: &[ScoreResult],
    bounds: &StrategyBounds,
    quality_floor: u8,
) -> SelectionOutcome {
    let mut ranked: Vec<&ScoreResult> = scored.iter().collect();
    ranked.sort_by(|a, b| compare_candidates(a, b));

    let mut seen = HashSet::new();
    ranked.retain(|s| seen.insert(s.symbol.clone()));

    let (eligible, rejected): (Vec<&ScoreResult>, Vec<&ScoreResult>) =
        ranked.into_iter().partition(|s| s.composite >= quality_floor);

    let mut rejected_below_floor: Vec<String> = rejected.iter().map(|s| s.symbol.clone()).collect();
    rejected_below_floor.sort();
    if !rejected_below_floor.is_empty() {
        tracing::info!(
            "Quality floor {} excluded {} asset(s): {:?}",
            quality_floor,
            rejected_below_floor.len(),
            rejected_below_floor
        );
    }

    let pool_sectors: HashSet<&str> = eligible
        .iter()
        .filter_map(|s| dominant_sector(&s.asset.sector_weights))
        .collect();
    let cap_active = pool_sectors.len() >= MIN_POOL_SECTORS;
    if !cap_active {
        tracing::debug!(
            "Only {} distinct sector(s) in pool, sector cap lifted",
            pool_sectors.len()
        );
    }

    let mut picker = Picker {
        max_per_sector: bounds.max_per_sector,
        cap_active,
        picked: Vec::new(),
        symbols: HashSet::new(),
        sector_counts: HashMap::new(),
    };

    // Class priority pass
    for class in &bounds.priority {
        if picker.picked.len() >= bounds.max_etfs {
            break;
        }
        let candidate = eligible
            .iter()
            .find(|s| s.class() == *class && picker.available(s) && picker.sector_allows(s));
        if let Some(&candidate) = candidate {
            tracing::debug!("Priority pick for {}: {}", class, candidate.symbol);
            picker.pick(candidate);
        }
    }

    // Fill by score, still honoring the sector cap
    for &candidate in &eligible {
        if picker.picked.len() >= bounds.max_etfs {
            break;
        }
        if picker.available(candidate) && picker.sector_allows(candidate) {
            picker.pick(candidate);
        }
    }

    let mut warnings = Vec::new();

    // Relaxed fill: sector cap yields to the minimum holding count
    for &candidate in &eligible {
        if picker.picked.len() >= bounds.min_etfs {
            break;
        }
        if picker.available(candidate) {
            if let Some(sector) = dominant_sector(&candidate.asset.sector_weights) {
                tracing::warn!("Relaxing sector cap for {} to add {}", sector, candidate.symbol);
                warnings.push(DataWarning::SectorCapRelaxed {
                    sector: sector.to_string(),
                });
            }
            picker.pick(candidate);
        }
    }

    let selected: Vec<ScoreResult> = picker.picked.into_iter().cloned().collect();

    for asset in &selected {
        if asset.asset.sector_weights.is_empty() {
            warnings.push(DataWarning::MissingSectorData {
                symbol: asset.symbol.clone(),
            });
        }
    }

    let shortfall = if selected.len() < bounds.min_etfs {
        tracing::warn!(
            "Selection shortfall: {} of {} required assets meet the quality floor",
            selected.len(),
            bounds.min_etfs
        );
        Some(Shortfall {
            required: bounds.min_etfs,
            selected: selected.len(),
            rejected_below_floor: rejected_below_floor.clone(),
        })
    } else {
        None
    };

    SelectionOutcome {
        selected,
        rejected_below_floor,
        shortfall,
        warnings,
    }
}

struct Picker<'a> {
    max_per_sector: usize,
    cap_active: bool,
    picked: Vec<&'a ScoreResult>,
    symbols: HashSet<&'a str>,
    sector_counts: HashMap<&'a str, usize>,
}

impl<'a> Picker<'a> {
    fn available(&self, candidate: &ScoreResult) -> bool {
        !self.symbols.contains(candidate.symbol.as_str())
    }

    fn sector_allows(&self, candidate: &ScoreResult) -> bool {
        if !self.cap_active {
            return true;
        }
        match dominant_sector(&candidate.asset.sector_weights) {
            Some(sector) => self.sector_counts.get(sector).copied().unwrap_or(0) < self.max_per_sector,
            None => true,
        }
    }

    fn pick(&mut self, candidate: &'a ScoreResult) {
        if let Some(sector) = dominant_sector(&candidate.asset.sector_weights) {
            *self.sector_counts.entry(sector).or_insert(0) += 1;
        }
        self.symbols.insert(candidate.symbol.as_str());
        self.picked.push(candidate);
    }
}
