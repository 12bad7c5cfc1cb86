//! Rendering analysis results as CSV or JSON.
//!
//! CSV output is one flat table per result; JSON output is the serialized
//! result including its diagnostics (dropped counts, unmapped stations,
//! missing coordinates).

use bcw_core::cotton::CottonSeries;
use bcw_data::climate::{ClimaticCorrelation, CorrelationHeatmap};
use bcw_data::historical::HistoricalSeries;
use bcw_data::map::RegionalMap;
use bcw_data::regional::RegionalRanking;
use bcw_data::scatter::Scatter;
use bcw_data::seasonal::SeasonalTrend;
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

/// A flat rendering of a result for CSV output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl From<&CottonSeries> for Table {
    fn from(series: &CottonSeries) -> Self {
        Table {
            headers: headers(&["region", "year", "planted_area"]),
            rows: series
                .records
                .iter()
                .map(|r| vec![r.region.clone(), r.year.to_string(), r.planted_area.to_string()])
                .collect(),
        }
    }
}

impl From<&SeasonalTrend> for Table {
    fn from(trend: &SeasonalTrend) -> Self {
        let mut header = headers(&["region", "year", "planted_area", "season"]);
        header.extend(trend.measurements.iter().cloned());
        Table {
            headers: header,
            rows: trend
                .rows
                .iter()
                .map(|r| {
                    let mut row = vec![
                        r.region.clone(),
                        r.year.to_string(),
                        r.planted_area.to_string(),
                        r.season.to_string(),
                    ];
                    row.extend(r.means.iter().copied().map(cell));
                    row
                })
                .collect(),
        }
    }
}

impl From<&RegionalRanking> for Table {
    fn from(ranking: &RegionalRanking) -> Self {
        Table {
            headers: headers(&["region", "mean_planted_area"]),
            rows: ranking
                .regions
                .iter()
                .map(|r| vec![r.region.clone(), r.mean_planted_area.to_string()])
                .collect(),
        }
    }
}

impl From<&ClimaticCorrelation> for Table {
    fn from(correlation: &ClimaticCorrelation) -> Self {
        Table {
            headers: headers(&["variable", "correlation"]),
            rows: correlation
                .ranking
                .iter()
                .map(|c| vec![c.variable.clone(), c.coefficient.to_string()])
                .collect(),
        }
    }
}

impl From<&CorrelationHeatmap> for Table {
    fn from(heatmap: &CorrelationHeatmap) -> Self {
        let matrix = &heatmap.matrix;
        let mut header = vec![String::new()];
        header.extend(matrix.variables.iter().cloned());
        Table {
            headers: header,
            rows: matrix
                .variables
                .iter()
                .zip(matrix.coefficients.iter())
                .map(|(name, coefficients)| {
                    let mut row = vec![name.clone()];
                    row.extend(coefficients.iter().map(|c| c.to_string()));
                    row
                })
                .collect(),
        }
    }
}

impl From<&HistoricalSeries> for Table {
    fn from(series: &HistoricalSeries) -> Self {
        Table {
            headers: headers(&["year", "planted_area"]),
            rows: series
                .years
                .iter()
                .map(|y| vec![y.year.to_string(), y.planted_area.to_string()])
                .collect(),
        }
    }
}

impl From<&Scatter> for Table {
    fn from(scatter: &Scatter) -> Self {
        Table {
            headers: vec![
                "region".to_string(),
                "year".to_string(),
                scatter.variable.clone(),
                "planted_area".to_string(),
            ],
            rows: scatter
                .points
                .iter()
                .map(|p| {
                    vec![
                        p.region.clone(),
                        p.year.to_string(),
                        p.x.to_string(),
                        p.planted_area.to_string(),
                    ]
                })
                .collect(),
        }
    }
}

impl From<&RegionalMap> for Table {
    fn from(map: &RegionalMap) -> Self {
        Table {
            headers: headers(&["region", "mean_planted_area", "longitude", "latitude"]),
            rows: map
                .points
                .iter()
                .map(|p| {
                    vec![
                        p.region.clone(),
                        p.mean_planted_area.to_string(),
                        p.longitude.to_string(),
                        p.latitude.to_string(),
                    ]
                })
                .collect(),
        }
    }
}

/// Render `value` to `writer` in the requested format.
pub fn write_result<T, W>(value: &T, format: Format, writer: W) -> anyhow::Result<()>
where
    T: Serialize,
    for<'a> &'a T: Into<Table>,
    W: Write,
{
    match format {
        Format::Csv => {
            let table: Table = value.into();
            let mut wtr = csv::Writer::from_writer(writer);
            wtr.write_record(&table.headers)?;
            for row in &table.rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Render `value` to a file, or to stdout when `path` is `None`.
pub fn emit<T>(value: &T, format: Format, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
    for<'a> &'a T: Into<Table>,
{
    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_result(value, format, BufWriter::new(file))?;
            log::info!("output: wrote {}", path.display());
            Ok(())
        }
        None => write_result(value, format, io::stdout().lock()),
    }
}
