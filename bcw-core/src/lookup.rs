//! Station-to-region and region-to-coordinate lookup tables.
//!
//! Both are plain values handed to whichever analysis needs them. The
//! bundled defaults come from `fixtures/`; a user-supplied CSV with the same
//! headers replaces them.

use crate::error::{LoadError, Result};
use csv::ReaderBuilder;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Embedded default station-to-region mapping (`STATION,REGION`).
pub static STATION_REGIONS_CSV: &str = include_str!("../../fixtures/station_regions.csv");

/// Embedded default region centroids (`REGION,LONGITUDE,LATITUDE`).
pub static REGION_COORDINATES_CSV: &str = include_str!("../../fixtures/region_coordinates.csv");

#[derive(Debug, Deserialize)]
struct StationRegionRow {
    #[serde(rename = "STATION")]
    station: String,
    #[serde(rename = "REGION")]
    region: String,
}

#[derive(Debug, Deserialize)]
struct RegionCoordinateRow {
    #[serde(rename = "REGION")]
    region: String,
    #[serde(rename = "LONGITUDE")]
    longitude: f64,
    #[serde(rename = "LATITUDE")]
    latitude: f64,
}

/// Maps weather station identifiers to cotton regions.
///
/// Coverage is partial; stations without an entry stay unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationRegions(BTreeMap<String, String>);

impl StationRegions {
    /// The mapping shipped with the crate.
    pub fn bundled() -> Result<StationRegions> {
        StationRegions::parse_csv(STATION_REGIONS_CSV)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<StationRegions> {
        let path = path.as_ref();
        info!("loader: reading station regions from {}", path.display());
        StationRegions::parse_csv(&fs::read_to_string(path)?)
    }

    /// Parse `STATION,REGION` rows. Blank identifiers are rejected.
    pub fn parse_csv(csv_data: &str) -> Result<StationRegions> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        let mut map = BTreeMap::new();
        for (index, row) in rdr.deserialize::<StationRegionRow>().enumerate() {
            let row = row?;
            if row.station.is_empty() || row.region.is_empty() {
                return Err(LoadError::InvalidLookup {
                    line: index + 2,
                    reason: "station and region must both be set".to_string(),
                });
            }
            map.insert(row.station, row.region);
        }
        Ok(StationRegions(map))
    }

    pub fn region_for(&self, station: &str) -> Option<&str> {
        self.0.get(station).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for StationRegions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        StationRegions(iter.into_iter().collect())
    }
}

/// Longitude/latitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// Map centroid of each cotton region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionCoordinates(BTreeMap<String, Coordinates>);

impl RegionCoordinates {
    /// The centroids shipped with the crate.
    pub fn bundled() -> Result<RegionCoordinates> {
        RegionCoordinates::parse_csv(REGION_COORDINATES_CSV)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<RegionCoordinates> {
        let path = path.as_ref();
        info!("loader: reading region coordinates from {}", path.display());
        RegionCoordinates::parse_csv(&fs::read_to_string(path)?)
    }

    /// Parse `REGION,LONGITUDE,LATITUDE` rows.
    pub fn parse_csv(csv_data: &str) -> Result<RegionCoordinates> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        let mut map = BTreeMap::new();
        for (index, row) in rdr.deserialize::<RegionCoordinateRow>().enumerate() {
            let row = row?;
            if row.region.is_empty() {
                return Err(LoadError::InvalidLookup {
                    line: index + 2,
                    reason: "region must be set".to_string(),
                });
            }
            map.insert(
                row.region,
                Coordinates {
                    longitude: row.longitude,
                    latitude: row.latitude,
                },
            );
        }
        Ok(RegionCoordinates(map))
    }

    pub fn get(&self, region: &str) -> Option<Coordinates> {
        self.0.get(region).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Coordinates)> for RegionCoordinates {
    fn from_iter<I: IntoIterator<Item = (String, Coordinates)>>(iter: I) -> Self {
        RegionCoordinates(iter.into_iter().collect())
    }
}
