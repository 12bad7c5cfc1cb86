//! Input arguments shared by the subcommands and the loading they drive.

use anyhow::Context;
use bcw_core::cotton::{load_cotton_data, CottonLayout, CottonSeries};
use bcw_core::lookup::{RegionCoordinates, StationRegions};
use bcw_core::weather::{load_weather_data, WeatherSchema, WeatherTable};
use clap::Args;
use log::{info, warn};
use std::path::PathBuf;

fn ascii_delimiter(delimiter: char) -> anyhow::Result<u8> {
    anyhow::ensure!(
        delimiter.is_ascii(),
        "delimiter must be a single ASCII character, got {:?}",
        delimiter
    );
    Ok(delimiter as u8)
}

#[derive(Args, Debug, Clone)]
pub struct CottonArgs {
    /// CONAB planted-area workbook (.xlsx, .xls, .ods) or its CSV export
    #[arg(short = 'c', long)]
    pub cotton: PathBuf,

    /// First harvest year of the series
    #[arg(long, default_value_t = bcw_core::cotton::FIRST_YEAR)]
    pub first_year: i32,

    /// Field delimiter when the cotton sheet is a CSV export
    #[arg(long, default_value_t = ',')]
    pub cotton_delimiter: char,
}

impl CottonArgs {
    pub fn load(&self) -> anyhow::Result<CottonSeries> {
        let layout = CottonLayout {
            first_year: self.first_year,
            delimiter: ascii_delimiter(self.cotton_delimiter)?,
            ..CottonLayout::default()
        };
        let series = load_cotton_data(&self.cotton, &layout)
            .with_context(|| format!("loading cotton data from {}", self.cotton.display()))?;
        if series.dropped_cells > 0 {
            warn!(
                "input: {} cotton cells were not numeric and were dropped",
                series.dropped_cells
            );
        }
        Ok(series)
    }
}

#[derive(Args, Debug, Clone)]
pub struct WeatherArgs {
    /// Daily weather CSV with a `DATA (YYYY-MM-DD)` column
    #[arg(short = 'w', long)]
    pub weather: PathBuf,

    /// Field delimiter of the weather CSV
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

impl WeatherArgs {
    pub fn load(&self) -> anyhow::Result<WeatherTable> {
        let schema = WeatherSchema {
            delimiter: ascii_delimiter(self.delimiter)?,
            ..WeatherSchema::default()
        };
        load_weather_data(&self.weather, &schema)
            .with_context(|| format!("loading weather data from {}", self.weather.display()))
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LookupArgs {
    /// `STATION,REGION` CSV replacing the bundled station mapping
    #[arg(long)]
    pub station_regions: Option<PathBuf>,

    /// `REGION,LONGITUDE,LATITUDE` CSV replacing the bundled coordinates
    #[arg(long)]
    pub region_coordinates: Option<PathBuf>,
}

impl LookupArgs {
    pub fn station_regions(&self) -> anyhow::Result<StationRegions> {
        let stations = match &self.station_regions {
            Some(path) => StationRegions::load(path)
                .with_context(|| format!("loading station regions from {}", path.display()))?,
            None => StationRegions::bundled().context("parsing bundled station regions")?,
        };
        info!("input: {} stations mapped to regions", stations.len());
        Ok(stations)
    }

    pub fn region_coordinates(&self) -> anyhow::Result<RegionCoordinates> {
        let coordinates = match &self.region_coordinates {
            Some(path) => RegionCoordinates::load(path)
                .with_context(|| format!("loading region coordinates from {}", path.display()))?,
            None => RegionCoordinates::bundled().context("parsing bundled region coordinates")?,
        };
        info!("input: {} regions with coordinates", coordinates.len());
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cotton_delimiter_reaches_the_loader() {
        let path = std::env::temp_dir().join(format!("bcw-inputs-{}.csv", std::process::id()));
        fs::write(&path, "a\nb\nc\nREGIÃO/UF;1976/77\nMT;120,5\n").unwrap();
        let mut args = CottonArgs {
            cotton: path.clone(),
            first_year: 1976,
            cotton_delimiter: ';',
        };
        let series = args.load().unwrap();
        assert_eq!(series.records.len(), 1);
        assert_eq!(series.records[0].planted_area, 120.5);

        args.cotton_delimiter = ',';
        assert!(args.load().is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        assert_eq!(ascii_delimiter(';').unwrap(), b';');
        assert!(ascii_delimiter('§').is_err());
    }
}
