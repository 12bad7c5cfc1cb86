//! Full report: every analysis written to one output directory.
//!
//! Both datasets are loaded up front and a load failure aborts the report.
//! After that each section runs on its own, so a failing analysis is logged
//! and skipped while the rest are still written.

use crate::inputs::{CottonArgs, LookupArgs, WeatherArgs};
use crate::output::{emit, Format, Table};
use bcw_data::climate::{analyze_climatic_influences, correlation_heatmap};
use bcw_data::historical::analyze_historical_trends;
use bcw_data::map::regional_map;
use bcw_data::regional::analyze_regional_potential;
use bcw_data::scatter::scatter_points;
use bcw_data::seasonal::analyze_seasonal_trends;
use log::{error, info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Sections that ran, and which of them failed.
#[derive(Debug, Default, PartialEq)]
pub struct ReportSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
}

struct Sections<'a> {
    output_dir: &'a Path,
    format: Format,
    summary: ReportSummary,
}

impl Sections<'_> {
    fn run<T, F>(&mut self, name: &str, analysis: F)
    where
        T: Serialize,
        for<'a> &'a T: Into<Table>,
        F: FnOnce() -> anyhow::Result<T>,
    {
        let path = self
            .output_dir
            .join(format!("{}.{}", name, self.format.extension()));
        match analysis().and_then(|value| emit(&value, self.format, Some(&path))) {
            Ok(()) => self.summary.written.push(path),
            Err(e) => {
                error!("report: section {} failed: {:#}", name, e);
                self.summary.failed.push(name.to_string());
            }
        }
    }
}

pub fn run_report(
    cotton_args: &CottonArgs,
    weather_args: &WeatherArgs,
    lookups: &LookupArgs,
    output_dir: &Path,
    format: Format,
    scatter_variable: Option<&str>,
) -> anyhow::Result<ReportSummary> {
    let series = cotton_args.load()?;
    let weather = weather_args.load()?;
    let stations = lookups.station_regions()?;
    let coordinates = lookups.region_coordinates()?;
    fs::create_dir_all(output_dir)?;

    let cotton = &series.records;
    let mut sections = Sections {
        output_dir,
        format,
        summary: ReportSummary::default(),
    };
    sections.run("cotton", || Ok(series.clone()));
    sections.run("seasonal_trends", || Ok(analyze_seasonal_trends(cotton, &weather)?));
    sections.run("regional_potential", || Ok(analyze_regional_potential(cotton)));
    sections.run("regional_map", || {
        let ranking = analyze_regional_potential(cotton);
        Ok(regional_map(&ranking.regions, &coordinates))
    });
    sections.run("climatic_influences", || {
        Ok(analyze_climatic_influences(cotton, &weather, &stations)?)
    });
    sections.run("correlation_heatmap", || Ok(correlation_heatmap(cotton, &weather, &stations)?));
    sections.run("historical_trends", || Ok(analyze_historical_trends(cotton)));
    if let Some(variable) = scatter_variable {
        sections.run("scatter", || Ok(scatter_points(cotton, &weather, variable)?));
    }

    let summary = sections.summary;
    if summary.failed.is_empty() {
        info!(
            "report: wrote {} sections to {}",
            summary.written.len(),
            output_dir.display()
        );
    } else {
        warn!(
            "report: {} sections failed ({}); {} written to {}",
            summary.failed.len(),
            summary.failed.join(", "),
            summary.written.len(),
            output_dir.display()
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const COTTON: &str = "\
CONAB
ALGODÃO
Área plantada
REGIÃO/UF,2019/20,2020/21
NORTE,10,20
NORDESTE,5,
BRASIL,15,20
";

    const WEATHER: &str = "\
ESTACAO,DATA (YYYY-MM-DD),temp_avg,rain_max
A001,2019-01-10,30,1
A001,2020-07-10,20,2
A002,2019-01-10,25,9
";

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bcw-report-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn inputs(dir: &Path) -> (CottonArgs, WeatherArgs) {
        let cotton = dir.join("cotton.csv");
        let weather = dir.join("weather.csv");
        fs::write(&cotton, COTTON).unwrap();
        fs::write(&weather, WEATHER).unwrap();
        (
            CottonArgs {
                cotton,
                first_year: 2019,
                cotton_delimiter: ',',
            },
            WeatherArgs {
                weather,
                delimiter: ',',
            },
        )
    }

    #[test]
    fn test_report_writes_every_section() {
        let dir = scratch("all");
        let (cotton, weather) = inputs(&dir);
        let out = dir.join("out");
        let summary = run_report(
            &cotton,
            &weather,
            &LookupArgs::default(),
            &out,
            Format::Csv,
            Some("temp_avg"),
        )
        .unwrap();
        assert!(summary.failed.is_empty(), "failed: {:?}", summary.failed);
        assert_eq!(summary.written.len(), 8);
        let historical = fs::read_to_string(out.join("historical_trends.csv")).unwrap();
        assert_eq!(historical, "year,planted_area\n2019,15\n2020,20\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failing_section_does_not_stop_the_others() {
        let dir = scratch("isolated");
        let (cotton, weather) = inputs(&dir);
        let out = dir.join("out");
        let summary = run_report(
            &cotton,
            &weather,
            &LookupArgs::default(),
            &out,
            Format::Json,
            Some("wind_speed"),
        )
        .unwrap();
        assert_eq!(summary.failed, vec!["scatter"]);
        assert_eq!(summary.written.len(), 7);
        assert!(out.join("regional_potential.json").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_failure_aborts_the_report() {
        let dir = scratch("abort");
        let (cotton, _) = inputs(&dir);
        let weather = WeatherArgs {
            weather: dir.join("missing.csv"),
            delimiter: ',',
        };
        let result = run_report(
            &cotton,
            &weather,
            &LookupArgs::default(),
            &dir.join("out"),
            Format::Csv,
            None,
        );
        assert!(result.is_err());
        assert!(!dir.join("out").exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
