//! Analyses over the tidy cotton and weather tables.
//!
//! Every analysis is a pure function of its inputs and returns a fresh
//! value. Cotton records are passed through [`bcw_core::cotton::sanitize`]
//! first, and each result reports how many records that step dropped.
//!
//! ```rust
//! use bcw_core::cotton::RegionYearArea;
//! use bcw_data::regional::analyze_regional_potential;
//!
//! let area = |region: &str, year, planted_area| RegionYearArea {
//!     region: region.to_string(),
//!     year,
//!     planted_area,
//! };
//! let ranking = analyze_regional_potential(&[area("A", 2020, 10.0), area("A", 2021, 30.0), area("B", 2020, 5.0)]);
//! assert_eq!(ranking.regions[0].region, "A");
//! assert_eq!(ranking.regions[0].mean_planted_area, 20.0);
//! assert_eq!(ranking.regions[1].mean_planted_area, 5.0);
//! ```

pub mod climate;
pub mod error;
pub mod historical;
pub mod map;
pub mod regional;
pub mod scatter;
pub mod seasonal;
pub mod stats;

use bcw_core::weather::WeatherTable;
use error::{AnalysisError, AnalysisFault, AnalysisStage};

/// Every observation must carry one value per measurement name.
pub(crate) fn check_shape(weather: &WeatherTable, stage: AnalysisStage) -> error::Result<()> {
    let expected = weather.measurements.len();
    match weather
        .observations
        .iter()
        .position(|o| o.values.len() != expected)
    {
        Some(index) => Err(AnalysisError::new(
            stage,
            AnalysisFault::RaggedRow {
                index,
                expected,
                found: weather.observations[index].values.len(),
            },
        )),
        None => Ok(()),
    }
}
