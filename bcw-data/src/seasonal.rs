use crate::check_shape;
use crate::error::{AnalysisStage, Result};
use bcw_core::cotton::{sanitize, RegionYearArea};
use bcw_core::season::Season;
use bcw_core::weather::WeatherTable;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Nationwide average of each measurement for one (year, season).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalWeatherRow {
    pub year: i32,
    pub season: Season,
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeasonalWeatherSummary {
    pub measurements: Vec<String>,
    /// Sorted by year, then season.
    pub rows: Vec<SeasonalWeatherRow>,
}

/// A region's planted area next to one season's weather of the same year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalTrendRow {
    pub region: String,
    pub year: i32,
    pub planted_area: f64,
    pub season: Season,
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeasonalTrend {
    pub measurements: Vec<String>,
    pub rows: Vec<SeasonalTrendRow>,
    /// Cotton records removed by sanitizing.
    pub dropped: usize,
}

/// Average every measurement over all stations and days of each
/// (year, season). Missing readings are skipped; a group with no readings
/// for a measurement gets `None`.
pub fn seasonal_weather_summary(weather: &WeatherTable) -> Result<SeasonalWeatherSummary> {
    check_shape(weather, AnalysisStage::Seasonal)?;
    let width = weather.measurements.len();
    let mut groups: BTreeMap<(i32, Season), Vec<(f64, usize)>> = BTreeMap::new();
    for observation in &weather.observations {
        let sums = groups
            .entry((observation.year, observation.season))
            .or_insert_with(|| vec![(0.0, 0); width]);
        for (slot, value) in sums.iter_mut().zip(&observation.values) {
            if let Some(v) = value {
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }
    let rows = groups
        .into_iter()
        .map(|((year, season), sums)| SeasonalWeatherRow {
            year,
            season,
            means: sums
                .into_iter()
                .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                .collect(),
        })
        .collect();
    Ok(SeasonalWeatherSummary {
        measurements: weather.measurements.clone(),
        rows,
    })
}

/// Pair each cotton record with every seasonal weather summary of its year.
///
/// The join key is the year alone: weather stations do not line up with
/// cotton regions, so every region of a year sees the same nationwide
/// seasonal averages. Years missing from either side produce no rows.
pub fn analyze_seasonal_trends(
    cotton: &[RegionYearArea],
    weather: &WeatherTable,
) -> Result<SeasonalTrend> {
    let sanitized = sanitize(cotton);
    let summary = seasonal_weather_summary(weather)?;

    let mut by_year: BTreeMap<i32, Vec<&SeasonalWeatherRow>> = BTreeMap::new();
    for row in &summary.rows {
        by_year.entry(row.year).or_default().push(row);
    }

    let mut rows = Vec::new();
    for record in &sanitized.records {
        if let Some(seasons) = by_year.get(&record.year) {
            for seasonal in seasons {
                rows.push(SeasonalTrendRow {
                    region: record.region.clone(),
                    year: record.year,
                    planted_area: record.planted_area,
                    season: seasonal.season,
                    means: seasonal.means.clone(),
                });
            }
        }
    }
    info!(
        "analysis: seasonal trends joined {} rows from {} cotton records and {} seasonal summaries",
        rows.len(),
        sanitized.records.len(),
        summary.rows.len()
    );
    Ok(SeasonalTrend {
        measurements: summary.measurements,
        rows,
        dropped: sanitized.dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisFault;
    use crate::fixtures::{area, weather};

    const WEATHER: &str = "\
ESTACAO,DATA (YYYY-MM-DD),temp,rain
A001,2020-01-10,30,10
A002,2020-02-10,28,
A001,2020-07-10,18,2
A001,2021-12-10,31,40
A001,2022-04-01,25,5
";

    #[test]
    fn test_summary_averages_by_year_and_season() {
        let summary = seasonal_weather_summary(&weather(WEATHER)).unwrap();
        assert_eq!(summary.measurements, vec!["temp", "rain"]);
        let keys: Vec<(i32, Season)> = summary.rows.iter().map(|r| (r.year, r.season)).collect();
        assert_eq!(
            keys,
            vec![
                (2020, Season::Summer),
                (2020, Season::Winter),
                (2021, Season::Summer),
                (2022, Season::Autumn)
            ]
        );
        assert_eq!(summary.rows[0].means, vec![Some(29.0), Some(10.0)]);
    }

    #[test]
    fn test_cross_join_regions_with_seasons_of_the_same_year() {
        let cotton = vec![area("MT", 2020, 100.0), area("BA", 2020, 50.0)];
        let trend = analyze_seasonal_trends(&cotton, &weather(WEATHER)).unwrap();
        // 2 regions x 2 seasons present in 2020
        assert_eq!(trend.rows.len(), 4);
        assert_eq!(trend.rows[0].region, "MT");
        assert_eq!(trend.rows[0].season, Season::Summer);
        assert_eq!(trend.rows[1].season, Season::Winter);
        assert_eq!(trend.rows[2].region, "BA");
    }

    #[test]
    fn test_years_on_one_side_only_are_pruned() {
        let cotton = vec![
            area("MT", 2019, 1.0),
            area("MT", 2020, 2.0),
            area("MT", 2021, 3.0),
        ];
        let trend = analyze_seasonal_trends(&cotton, &weather(WEATHER)).unwrap();
        let weather_years = weather(WEATHER).years();
        assert!(trend.rows.iter().all(|r| r.year != 2019 && r.year != 2022));
        assert!(trend.rows.iter().all(|r| weather_years.contains(&r.year)));
        assert_eq!(trend.rows.iter().filter(|r| r.year == 2021).count(), 1);
    }

    #[test]
    fn test_invalid_cotton_records_are_counted() {
        let cotton = vec![area("MT", 2020, f64::NAN), area("BA", 2020, 3.0)];
        let trend = analyze_seasonal_trends(&cotton, &weather(WEATHER)).unwrap();
        assert_eq!(trend.dropped, 1);
        assert!(trend.rows.iter().all(|r| r.region == "BA"));
    }

    #[test]
    fn test_ragged_weather_row_is_an_analysis_error() {
        let mut table = weather(WEATHER);
        table.observations[2].values.pop();
        let err = analyze_seasonal_trends(&[area("MT", 2020, 1.0)], &table).unwrap_err();
        assert_eq!(err.stage, AnalysisStage::Seasonal);
        assert_eq!(
            err.fault,
            AnalysisFault::RaggedRow {
                index: 2,
                expected: 2,
                found: 1
            }
        );
    }
}
