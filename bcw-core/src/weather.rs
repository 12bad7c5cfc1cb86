use crate::error::{LoadError, Result};
use crate::season::Season;
use crate::table::{read_delimited, RawRow};
use bcw_utils::dates::parse_date_lenient;
use bcw_utils::numeric::{coerce_f64, is_missing};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

/// Header of the observation date column in the weather exports.
pub const DATE_COLUMN: &str = "DATA (YYYY-MM-DD)";

/// Header of the station identifier column.
pub const STATION_COLUMN: &str = "ESTACAO";

/// Header of an optional, already-resolved region column.
pub const REGION_COLUMN: &str = "Região/UF";

/// Calendar columns some exports carry; they are derived from the date
/// instead.
const CALENDAR_COLUMNS: [&str; 2] = ["year", "month"];

/// Column names and delimiter of a weather export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSchema {
    pub date_column: String,
    pub station_column: String,
    pub region_column: String,
    pub delimiter: u8,
}

impl Default for WeatherSchema {
    fn default() -> Self {
        WeatherSchema {
            date_column: DATE_COLUMN.to_string(),
            station_column: STATION_COLUMN.to_string(),
            region_column: REGION_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

/// One daily record from a weather station.
///
/// `values` lines up with [`WeatherTable::measurements`]; `None` marks a
/// blank or unparseable reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyWeatherObservation {
    pub station: String,
    pub region: Option<String>,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub season: Season,
    pub values: Vec<Option<f64>>,
}

/// Daily observations plus the names of their numeric measurement columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeatherTable {
    pub measurements: Vec<String>,
    pub observations: Vec<DailyWeatherObservation>,
}

impl WeatherTable {
    /// Parse delimited weather text.
    pub fn parse_csv(csv_data: &str, schema: &WeatherSchema) -> Result<WeatherTable> {
        let rows = read_delimited(csv_data.as_bytes(), schema.delimiter)?;
        WeatherTable::from_rows(&rows, schema)
    }

    /// Interpret raw rows: the first row is the header, every other row an
    /// observation.
    ///
    /// Measurement columns are those other than date/station/region whose
    /// non-blank cells all coerce to numbers. Any row with a missing or
    /// unparseable date fails the whole load.
    pub(crate) fn from_rows(rows: &[RawRow], schema: &WeatherSchema) -> Result<WeatherTable> {
        let (header, body) = match rows.split_first() {
            Some(split) => split,
            None => return Err(LoadError::MissingColumn(schema.date_column.clone())),
        };
        let headers: Vec<&str> = header
            .cells
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}'))
            .collect();
        let find = |name: &str| headers.iter().position(|h| *h == name);
        let date_index =
            find(schema.date_column.as_str()).ok_or_else(|| LoadError::MissingColumn(schema.date_column.clone()))?;
        let station_index = find(schema.station_column.as_str());
        let region_index = find(schema.region_column.as_str());

        let measurement_indices: Vec<usize> = (0..headers.len())
            .filter(|&i| i != date_index && Some(i) != station_index && Some(i) != region_index)
            .filter(|&i| !CALENDAR_COLUMNS.contains(&headers[i].to_lowercase().as_str()))
            .filter(|&i| {
                let numeric = body.iter().all(|row| {
                    let cell = row.cell(i);
                    is_missing(cell) || coerce_f64(cell).is_some()
                });
                if !numeric {
                    debug!("loader: weather column {:?} is not numeric, ignoring", headers[i]);
                }
                numeric
            })
            .collect();

        let mut observations = Vec::with_capacity(body.len());
        for row in body {
            let raw_date = row.cell(date_index);
            let date = parse_date_lenient(raw_date).ok_or_else(|| LoadError::InvalidDate {
                line: row.line,
                value: raw_date.to_string(),
            })?;
            let month = date.month();
            let season = Season::from_month(month).ok_or(LoadError::UnmappedSeason {
                line: row.line,
                month,
            })?;
            let region = region_index
                .map(|i| row.cell(i).trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string);
            observations.push(DailyWeatherObservation {
                station: station_index
                    .map(|i| row.cell(i).trim().to_string())
                    .unwrap_or_default(),
                region,
                date,
                year: date.year(),
                month,
                season,
                values: measurement_indices.iter().map(|&i| coerce_f64(row.cell(i))).collect(),
            });
        }

        let table = WeatherTable {
            measurements: measurement_indices.iter().map(|&i| headers[i].to_string()).collect(),
            observations,
        };
        info!(
            "loader: weather table has {} observations with {} measurements",
            table.observations.len(),
            table.measurements.len()
        );
        Ok(table)
    }

    /// Position of a measurement column by name.
    pub fn measurement_index(&self, name: &str) -> Option<usize> {
        self.measurements.iter().position(|m| m == name)
    }

    /// Distinct years covered by the observations.
    pub fn years(&self) -> BTreeSet<i32> {
        self.observations.iter().map(|o| o.year).collect()
    }
}

/// Load a daily weather CSV.
pub fn load_weather_data(path: impl AsRef<Path>, schema: &WeatherSchema) -> Result<WeatherTable> {
    let path = path.as_ref();
    info!("loader: reading weather observations from {}", path.display());
    let rows = read_delimited(File::open(path)?, schema.delimiter)?;
    WeatherTable::from_rows(&rows, schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: &str = "\
ESTACAO,DATA (YYYY-MM-DD),temp_avg,rain_max,NOME
A001,2020-01-15,27.5,12.0,BRASILIA
A001,2020-06-15,18.0,,BRASILIA
A002,2020-12-01,30.1,4.5,SALVADOR
A002,2021-03-10,26.0,---,SALVADOR
";

    #[test]
    fn test_derives_year_month_and_season() {
        let table = WeatherTable::parse_csv(WEATHER, &WeatherSchema::default()).unwrap();
        assert_eq!(table.observations.len(), 4);
        let first = &table.observations[0];
        assert_eq!(first.station, "A001");
        assert_eq!((first.year, first.month), (2020, 1));
        assert_eq!(first.season, Season::Summer);
        assert_eq!(table.observations[1].season, Season::Winter);
        assert_eq!(table.observations[2].season, Season::Summer);
        assert_eq!(table.observations[3].season, Season::Autumn);
    }

    #[test]
    fn test_calendar_columns_are_not_measurements() {
        let data = "\
ESTACAO,DATA (YYYY-MM-DD),Year,month,temp
A001,2020-01-15,2020,1,27.5
";
        let table = WeatherTable::parse_csv(data, &WeatherSchema::default()).unwrap();
        assert_eq!(table.measurements, vec!["temp"]);
    }

    #[test]
    fn test_only_numeric_columns_are_measurements() {
        let table = WeatherTable::parse_csv(WEATHER, &WeatherSchema::default()).unwrap();
        assert_eq!(table.measurements, vec!["temp_avg", "rain_max"]);
        assert_eq!(table.observations[1].values, vec![Some(18.0), None]);
        assert_eq!(table.observations[3].values, vec![Some(26.0), None]);
        assert_eq!(table.measurement_index("rain_max"), Some(1));
    }

    #[test]
    fn test_region_column_is_optional() {
        let table = WeatherTable::parse_csv(WEATHER, &WeatherSchema::default()).unwrap();
        assert!(table.observations.iter().all(|o| o.region.is_none()));

        let with_region = "DATA (YYYY-MM-DD),Região/UF,temp\n2020-01-01,MT,30\n2020-01-02,,31\n";
        let table = WeatherTable::parse_csv(with_region, &WeatherSchema::default()).unwrap();
        assert_eq!(table.observations[0].region.as_deref(), Some("MT"));
        assert_eq!(table.observations[1].region, None);
        assert_eq!(table.observations[0].station, "");
        assert_eq!(table.measurements, vec!["temp"]);
    }

    #[test]
    fn test_null_date_is_a_load_error() {
        let data = "DATA (YYYY-MM-DD),temp\n2020-01-01,30\n,31\n";
        let err = WeatherTable::parse_csv(data, &WeatherSchema::default()).unwrap_err();
        match err {
            LoadError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_impossible_month_is_an_invalid_date() {
        // chrono rejects month 13 while parsing, before season binning
        // could report it as unmapped
        let data = "DATA (YYYY-MM-DD),temp\n2020-13-01,30\n";
        let err = WeatherTable::parse_csv(data, &WeatherSchema::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn test_missing_date_column_is_a_load_error() {
        let err = WeatherTable::parse_csv("ESTACAO,temp\nA001,1\n", &WeatherSchema::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == DATE_COLUMN));
    }

    #[test]
    fn test_semicolon_delimited_export() {
        let schema = WeatherSchema {
            delimiter: b';',
            ..WeatherSchema::default()
        };
        let data = "DATA (YYYY-MM-DD);temp\n2020-09-01;21,5\n";
        let table = WeatherTable::parse_csv(data, &schema).unwrap();
        assert_eq!(table.observations[0].values, vec![Some(21.5)]);
        assert_eq!(table.observations[0].season, Season::Spring);
    }

    #[test]
    fn test_years() {
        let table = WeatherTable::parse_csv(WEATHER, &WeatherSchema::default()).unwrap();
        assert_eq!(table.years().into_iter().collect::<Vec<_>>(), vec![2020, 2021]);
    }
}
