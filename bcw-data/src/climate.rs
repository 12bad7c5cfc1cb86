use crate::check_shape;
use crate::error::{AnalysisError, AnalysisFault, AnalysisStage, Result};
use crate::stats::CorrelationMatrix;
use bcw_core::cotton::{sanitize, RegionYearArea};
use bcw_core::lookup::StationRegions;
use bcw_core::weather::{DailyWeatherObservation, WeatherTable};
use log::{info, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Column name of planted area in the joined sample.
pub const PLANTED_AREA: &str = "planted_area";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";

/// Cotton records joined with daily weather on (year, region), laid out as
/// numeric columns: planted area, year, month, then every measurement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinedSample {
    pub columns: Vec<(String, Vec<Option<f64>>)>,
    pub rows: usize,
    /// Stations with neither a region column value nor a lookup entry.
    pub unmapped_stations: BTreeSet<String>,
    /// Cotton records removed by sanitizing.
    pub dropped: usize,
}

/// Coefficient of one variable against planted area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableCorrelation {
    pub variable: String,
    pub coefficient: f64,
}

/// Variables ranked by correlation with planted area, highest first, NaN
/// last. Planted area itself is included with 1.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClimaticCorrelation {
    pub ranking: Vec<VariableCorrelation>,
    pub joined_rows: usize,
    pub unmapped_stations: BTreeSet<String>,
    pub dropped: usize,
}

/// Full correlation matrix of the joined sample, for heatmaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationHeatmap {
    pub matrix: CorrelationMatrix,
    pub joined_rows: usize,
    pub unmapped_stations: BTreeSet<String>,
}

fn observation_region<'a>(
    observation: &'a DailyWeatherObservation,
    stations: &'a StationRegions,
) -> Option<&'a str> {
    observation
        .region
        .as_deref()
        .or_else(|| stations.region_for(&observation.station))
}

/// Inner-join cotton and weather on (year, region).
///
/// Observations without a region take one from `stations`. Those still
/// unassigned cannot join and their stations are reported.
pub fn join_by_year_and_region(
    cotton: &[RegionYearArea],
    weather: &WeatherTable,
    stations: &StationRegions,
    stage: AnalysisStage,
) -> Result<JoinedSample> {
    check_shape(weather, stage)?;
    let sanitized = sanitize(cotton);

    let mut unmapped_stations = BTreeSet::new();
    let mut by_key: HashMap<(i32, &str), Vec<&DailyWeatherObservation>> = HashMap::new();
    for observation in &weather.observations {
        match observation_region(observation, stations) {
            Some(region) => by_key
                .entry((observation.year, region))
                .or_default()
                .push(observation),
            None => {
                unmapped_stations.insert(observation.station.clone());
            }
        }
    }
    if !unmapped_stations.is_empty() {
        warn!(
            "analysis: {} weather stations have no region and were left out of the join: {:?}",
            unmapped_stations.len(),
            unmapped_stations
        );
    }

    let mut columns: Vec<(String, Vec<Option<f64>>)> = [PLANTED_AREA, YEAR, MONTH]
        .iter()
        .map(|name| name.to_string())
        .chain(weather.measurements.iter().cloned())
        .map(|name| (name, Vec::new()))
        .collect();
    let mut rows = 0;
    for record in &sanitized.records {
        let Some(matches) = by_key.get(&(record.year, record.region.as_str())) else {
            continue;
        };
        for observation in matches {
            let fixed = [
                Some(record.planted_area),
                Some(f64::from(record.year)),
                Some(f64::from(observation.month)),
            ];
            let values = fixed.into_iter().chain(observation.values.iter().copied());
            for ((_, column), value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
            rows += 1;
        }
    }
    info!(
        "analysis: joined {} rows on year and region from {} cotton records",
        rows,
        sanitized.records.len()
    );
    Ok(JoinedSample {
        columns,
        rows,
        unmapped_stations,
        dropped: sanitized.dropped,
    })
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Correlate every numeric column of the (year, region) join with planted
/// area.
///
/// If planted area has no variance in the joined sample every coefficient
/// is NaN.
pub fn analyze_climatic_influences(
    cotton: &[RegionYearArea],
    weather: &WeatherTable,
    stations: &StationRegions,
) -> Result<ClimaticCorrelation> {
    let stage = AnalysisStage::Climatic;
    let sample = join_by_year_and_region(cotton, weather, stations, stage)?;
    if sample.rows == 0 {
        return Err(AnalysisError::new(stage, AnalysisFault::NoOverlap));
    }
    let matrix = CorrelationMatrix::from_columns(&sample.columns);
    let mut ranking: Vec<VariableCorrelation> = matrix
        .column(PLANTED_AREA)
        .unwrap_or_default()
        .into_iter()
        .map(|(variable, coefficient)| VariableCorrelation {
            variable,
            coefficient,
        })
        .collect();
    ranking.sort_by(|a, b| descending_nan_last(a.coefficient, b.coefficient));
    Ok(ClimaticCorrelation {
        ranking,
        joined_rows: sample.rows,
        unmapped_stations: sample.unmapped_stations,
        dropped: sample.dropped,
    })
}

/// Pairwise correlation of every numeric column of the (year, region) join.
pub fn correlation_heatmap(
    cotton: &[RegionYearArea],
    weather: &WeatherTable,
    stations: &StationRegions,
) -> Result<CorrelationHeatmap> {
    let stage = AnalysisStage::Heatmap;
    let sample = join_by_year_and_region(cotton, weather, stations, stage)?;
    if sample.rows == 0 {
        return Err(AnalysisError::new(stage, AnalysisFault::NoOverlap));
    }
    Ok(CorrelationHeatmap {
        matrix: CorrelationMatrix::from_columns(&sample.columns),
        joined_rows: sample.rows,
        unmapped_stations: sample.unmapped_stations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{area, weather};

    const WEATHER: &str = "\
ESTACAO,DATA (YYYY-MM-DD),temp,rain
A001,2020-01-10,30,1
A001,2021-01-10,20,2
A001,2022-01-10,10,3
A002,2020-01-10,25,9
Z999,2020-01-10,99,99
";

    fn stations() -> StationRegions {
        StationRegions::bundled().unwrap()
    }

    fn cotton() -> Vec<RegionYearArea> {
        vec![
            area("NORTE", 2020, 300.0),
            area("NORTE", 2021, 200.0),
            area("NORTE", 2022, 100.0),
            area("SUL", 2020, 50.0),
        ]
    }

    #[test]
    fn test_join_uses_station_lookup() {
        let sample =
            join_by_year_and_region(&cotton(), &weather(WEATHER), &stations(), AnalysisStage::Climatic)
                .unwrap();
        // NORTE years join A001; SUL has no station; A002 maps to NORDESTE
        assert_eq!(sample.rows, 3);
        assert_eq!(sample.unmapped_stations.into_iter().collect::<Vec<_>>(), vec!["Z999"]);
        let names: Vec<&str> = sample.columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["planted_area", "year", "month", "temp", "rain"]);
    }

    #[test]
    fn test_ranking_is_descending_with_self_identity() {
        let result = analyze_climatic_influences(&cotton(), &weather(WEATHER), &stations()).unwrap();
        assert_eq!(result.joined_rows, 3);
        let first = &result.ranking[0];
        assert_eq!(first.variable, PLANTED_AREA);
        assert_eq!(first.coefficient, 1.0);
        let temp = result.ranking.iter().find(|c| c.variable == "temp").unwrap();
        assert!((temp.coefficient - 1.0).abs() < 1e-12);
        let rain = result.ranking.iter().find(|c| c.variable == "rain").unwrap();
        assert!((rain.coefficient + 1.0).abs() < 1e-12);
        // month is constant in the sample
        assert!(result.ranking.last().unwrap().coefficient.is_nan());
        assert_eq!(result.ranking.last().unwrap().variable, MONTH);
    }

    #[test]
    fn test_region_column_takes_precedence_over_lookup() {
        let data = "\
ESTACAO,Região/UF,DATA (YYYY-MM-DD),temp
A001,SUL,2020-01-10,30
A001,SUL,2020-02-10,10
";
        let cotton = vec![area("SUL", 2020, 10.0)];
        let sample =
            join_by_year_and_region(&cotton, &weather(data), &stations(), AnalysisStage::Climatic).unwrap();
        assert_eq!(sample.rows, 2);
        assert!(sample.unmapped_stations.is_empty());
    }

    #[test]
    fn test_zero_variance_planted_area_yields_nan() {
        let cotton = vec![
            area("NORTE", 2020, 5.0),
            area("NORTE", 2021, 5.0),
            area("NORTE", 2022, 5.0),
        ];
        let result = analyze_climatic_influences(&cotton, &weather(WEATHER), &stations()).unwrap();
        assert!(result.ranking.iter().all(|c| c.coefficient.is_nan()));
    }

    #[test]
    fn test_no_overlap_is_an_error() {
        let cotton = vec![area("SUL", 2020, 5.0)];
        let err = analyze_climatic_influences(&cotton, &weather(WEATHER), &stations()).unwrap_err();
        assert_eq!(err.stage, AnalysisStage::Climatic);
        assert_eq!(err.fault, AnalysisFault::NoOverlap);
    }

    #[test]
    fn test_heatmap_matrix_covers_all_numeric_columns() {
        let heatmap = correlation_heatmap(&cotton(), &weather(WEATHER), &stations()).unwrap();
        assert_eq!(heatmap.matrix.variables.len(), 5);
        assert_eq!(heatmap.matrix.get("temp", "temp"), Some(1.0));
        assert_eq!(heatmap.matrix.get("temp", "rain"), heatmap.matrix.get("rain", "temp"));
        assert_eq!(heatmap.joined_rows, 3);
    }
}
