use crate::regional::RegionalPotential;
use bcw_core::lookup::RegionCoordinates;
use log::warn;
use serde::Serialize;

/// A ranked region placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub region: String,
    pub mean_planted_area: f64,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegionalMap {
    /// Same order as the ranking.
    pub points: Vec<MapPoint>,
    /// Ranked regions without coordinates.
    pub missing: Vec<String>,
}

/// Attach coordinates to each ranked region.
pub fn regional_map(ranking: &[RegionalPotential], coordinates: &RegionCoordinates) -> RegionalMap {
    let mut map = RegionalMap::default();
    for potential in ranking {
        match coordinates.get(&potential.region) {
            Some(c) => map.points.push(MapPoint {
                region: potential.region.clone(),
                mean_planted_area: potential.mean_planted_area,
                longitude: c.longitude,
                latitude: c.latitude,
            }),
            None => map.missing.push(potential.region.clone()),
        }
    }
    if !map.missing.is_empty() {
        warn!("analysis: no coordinates for regions {:?}", map.missing);
    }
    map
}
