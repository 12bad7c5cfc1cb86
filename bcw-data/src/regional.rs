use bcw_core::cotton::{sanitize, RegionYearArea};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean planted area of one region across all its years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalPotential {
    pub region: String,
    pub mean_planted_area: f64,
}

/// Regions ranked by mean planted area, largest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegionalRanking {
    pub regions: Vec<RegionalPotential>,
    /// Cotton records removed by sanitizing.
    pub dropped: usize,
}

/// Rank regions by mean planted area, descending. Ties keep alphabetical
/// order.
pub fn analyze_regional_potential(cotton: &[RegionYearArea]) -> RegionalRanking {
    let sanitized = sanitize(cotton);
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in &sanitized.records {
        let entry = totals.entry(record.region.as_str()).or_insert((0.0, 0));
        entry.0 += record.planted_area;
        entry.1 += 1;
    }
    let mut regions: Vec<RegionalPotential> = totals
        .into_iter()
        .map(|(region, (sum, count))| RegionalPotential {
            region: region.to_string(),
            mean_planted_area: sum / count as f64,
        })
        .collect();
    regions.sort_by(|a, b| b.mean_planted_area.total_cmp(&a.mean_planted_area));
    info!(
        "analysis: ranked {} regions, dropped {} records",
        regions.len(),
        sanitized.dropped
    );
    RegionalRanking {
        regions,
        dropped: sanitized.dropped,
    }
}
