//! Asset-class and sector normalization

use std::collections::HashMap;

use crate::types::AssetClass;

/// Map a free-text asset-class label onto the fixed taxonomy.
///
/// Pure: the result depends only on the label. Rules are checked from the
/// most specific (bonds, real estate, commodities, regions) to the most
/// generic (size and style), so "Foreign Large Blend" is international and
/// "Intermediate Core Bond" is a bond fund.
pub fn normalize_asset_class(label: &str) -> AssetClass {
    let lower = label.trim().to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '&')
        .filter(|w| !w.is_empty())
        .collect();
    let has = |candidates: &[&str]| candidates.iter().any(|c| words.contains(c));

    if lower.contains("bond")
        || lower.contains("fixed income")
        || has(&["treasury", "treasuries", "aggregate", "municipal", "muni", "tips"])
    {
        AssetClass::Bonds
    } else if lower.contains("real estate") || has(&["reit", "reits"]) {
        AssetClass::RealEstate
    } else if lower.contains("commodit") || has(&["gold", "silver", "precious", "oil"]) {
        AssetClass::Commodities
    } else if lower.contains("emerging") {
        AssetClass::EmergingMarkets
    } else if lower.contains("ex-us")
        || lower.contains("ex us")
        || has(&[
            "international",
            "foreign",
            "developed",
            "europe",
            "pacific",
            "japan",
            "world",
            "global",
        ])
    {
        AssetClass::InternationalDeveloped
    } else if has(&["small", "smallcap"]) {
        AssetClass::SmallCap
    } else if has(&["mid", "midcap"]) {
        AssetClass::MidCap
    } else if has(&["growth"]) {
        AssetClass::LargeCapGrowth
    } else if has(&["value"]) {
        AssetClass::LargeCapValue
    } else if has(&["large", "blend", "s&p", "500", "total"]) {
        AssetClass::LargeCapBlend
    } else {
        AssetClass::Other
    }
}

/// Sector with the largest weight; ties go to the lexically smaller name
pub fn dominant_sector(weights: &HashMap<String, f64>) -> Option<&str> {
    weights
        .iter()
        .filter(|(_, w)| w.is_finite() && **w > 0.0)
        .max_by(|(name_a, a), (name_b, b)| a.total_cmp(b).then_with(|| name_b.cmp(name_a)))
        .map(|(name, _)| name.as_str())
}
