use crate::check_shape;
use crate::error::{AnalysisError, AnalysisFault, AnalysisStage, Result};
use bcw_core::cotton::{sanitize, RegionYearArea};
use bcw_core::weather::WeatherTable;
use log::info;
use serde::Serialize;
use std::collections::HashMap;

/// Above this many pairs the scatter is thinned.
pub const SCATTER_SAMPLE_THRESHOLD: usize = 10_000;

/// Keep one pair in this many once thinning kicks in.
pub const SCATTER_SAMPLE_STRIDE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub region: String,
    pub year: i32,
    pub x: f64,
    pub planted_area: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scatter {
    pub variable: String,
    pub points: Vec<ScatterPoint>,
    /// Pairs available before thinning.
    pub total_pairs: usize,
    pub sampled: bool,
}

/// Pair one weather variable with planted area for every cotton record and
/// observation sharing a year. Observations missing the variable are skipped.
pub fn scatter_points(
    cotton: &[RegionYearArea],
    weather: &WeatherTable,
    variable: &str,
) -> Result<Scatter> {
    let stage = AnalysisStage::Scatter;
    check_shape(weather, stage)?;
    let index = weather.measurement_index(variable).ok_or_else(|| {
        AnalysisError::new(stage, AnalysisFault::UnknownVariable(variable.to_string()))
    })?;
    let sanitized = sanitize(cotton);

    let mut by_year: HashMap<i32, Vec<f64>> = HashMap::new();
    for observation in &weather.observations {
        if let Some(x) = observation.values[index] {
            by_year.entry(observation.year).or_default().push(x);
        }
    }
    let total_pairs: usize = sanitized
        .records
        .iter()
        .map(|r| by_year.get(&r.year).map_or(0, Vec::len))
        .sum();
    let sampled = total_pairs > SCATTER_SAMPLE_THRESHOLD;
    let stride = if sampled { SCATTER_SAMPLE_STRIDE } else { 1 };

    let mut points = Vec::with_capacity(total_pairs / stride + 1);
    let mut position = 0usize;
    for record in &sanitized.records {
        for x in by_year.get(&record.year).into_iter().flatten() {
            if position % stride == 0 {
                points.push(ScatterPoint {
                    region: record.region.clone(),
                    year: record.year,
                    x: *x,
                    planted_area: record.planted_area,
                });
            }
            position += 1;
        }
    }
    info!(
        "analysis: scatter of {} kept {} of {} pairs",
        variable,
        points.len(),
        total_pairs
    );
    Ok(Scatter {
        variable: variable.to_string(),
        points,
        total_pairs,
        sampled,
    })
}
