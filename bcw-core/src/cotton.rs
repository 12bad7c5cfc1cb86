use crate::error::{LoadError, Result};
use crate::table::{read_delimited, read_workbook, RawRow};
use bcw_utils::numeric::coerce_f64;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// First harvest year of the CONAB historical series.
pub const FIRST_YEAR: i32 = 1976;

/// Title and metadata rows above the region table.
pub const HEADER_ROWS: usize = 4;

/// Region labels containing any of these are national or super-regional
/// subtotals, not planting regions.
pub const FOOTER_PATTERNS: [&str; 2] = ["BRASIL", "NORTE/NORDESTE"];

/// Separators of common spreadsheet text exports. One of them inside a
/// region label means the sheet was split on the wrong one.
const FIELD_SEPARATORS: [char; 3] = [',', ';', '\t'];

/// Planted area of one region in one harvest year, in hectares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionYearArea {
    pub region: String,
    pub year: i32,
    pub planted_area: f64,
}

/// Shape of the wide planted-area sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CottonLayout {
    /// Rows skipped before the first region row.
    pub header_rows: usize,
    /// Year assigned to the first data column; later columns count up by one.
    pub first_year: i32,
    /// Substrings marking subtotal rows to exclude.
    pub footer_patterns: Vec<String>,
    /// Field delimiter of CSV exports; pt-BR exports use `;`.
    pub delimiter: u8,
}

impl Default for CottonLayout {
    fn default() -> Self {
        CottonLayout {
            header_rows: HEADER_ROWS,
            first_year: FIRST_YEAR,
            footer_patterns: FOOTER_PATTERNS.iter().map(|p| p.to_string()).collect(),
            delimiter: b',',
        }
    }
}

impl CottonLayout {
    fn is_footer(&self, region: &str) -> bool {
        self.footer_patterns.iter().any(|p| region.contains(p.as_str()))
    }
}

/// Long-format planted-area table produced by the cotton loader, with the
/// bookkeeping needed to account for every source cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CottonSeries {
    pub records: Vec<RegionYearArea>,
    /// Number of year columns found in the sheet.
    pub year_columns: usize,
    /// Region rows kept before melting.
    pub region_rows: usize,
    /// Rows skipped as subtotals or for a blank region label.
    pub excluded_rows: usize,
    /// Cells of kept rows whose area failed numeric coercion.
    pub dropped_cells: usize,
}

/// Records that survived [`sanitize`], plus how many did not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sanitized {
    pub records: Vec<RegionYearArea>,
    pub dropped: usize,
}

/// Keep a record only if its area is a finite, non-negative number.
pub fn coerce_area(record: RegionYearArea) -> Option<RegionYearArea> {
    if record.planted_area.is_finite() && record.planted_area >= 0.0 {
        Some(record)
    } else {
        None
    }
}

/// Apply [`coerce_area`] to every record. Sanitizing clean records returns
/// them unchanged with `dropped == 0`.
pub fn sanitize(records: &[RegionYearArea]) -> Sanitized {
    let mut sanitized = Sanitized::default();
    for record in records {
        match coerce_area(record.clone()) {
            Some(r) => sanitized.records.push(r),
            None => sanitized.dropped += 1,
        }
    }
    sanitized
}

impl CottonSeries {
    /// Melt raw sheet rows into long format.
    ///
    /// Output order follows the year columns, then the sheet order of regions
    /// within each year.
    pub(crate) fn from_rows(rows: &[RawRow], layout: &CottonLayout) -> Result<CottonSeries> {
        let data_rows = rows.get(layout.header_rows..).unwrap_or(&[]);
        let column_count = data_rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        if column_count == 0 {
            return Err(LoadError::MissingColumn("region".to_string()));
        }

        let mut series = CottonSeries {
            year_columns: column_count - 1,
            ..CottonSeries::default()
        };
        let mut kept: Vec<(&str, &RawRow)> = Vec::new();
        for row in data_rows {
            let region = row.cell(0).trim();
            if region.is_empty() || layout.is_footer(region) {
                series.excluded_rows += 1;
                continue;
            }
            if region.contains(&FIELD_SEPARATORS[..]) {
                return Err(LoadError::SuspectDelimiter {
                    line: row.line,
                    label: region.to_string(),
                });
            }
            kept.push((region, row));
        }
        series.region_rows = kept.len();
        if series.year_columns == 0 && !kept.is_empty() {
            return Err(LoadError::MissingColumn("year".to_string()));
        }

        for column in 1..column_count {
            let year = layout.first_year + (column as i32 - 1);
            for (region, row) in &kept {
                let record = coerce_f64(row.cell(column))
                    .map(|planted_area| RegionYearArea {
                        region: region.to_string(),
                        year,
                        planted_area,
                    })
                    .and_then(coerce_area);
                match record {
                    Some(r) => series.records.push(r),
                    None => series.dropped_cells += 1,
                }
            }
        }

        info!(
            "loader: cotton series has {} records over {} years, excluded {} rows, dropped {} cells",
            series.records.len(),
            series.year_columns,
            series.excluded_rows,
            series.dropped_cells
        );
        Ok(series)
    }
}

/// Parse a delimited export of the planted-area sheet.
pub fn parse_cotton_csv(csv_data: &str, layout: &CottonLayout) -> Result<CottonSeries> {
    let rows = read_delimited(csv_data.as_bytes(), layout.delimiter)?;
    CottonSeries::from_rows(&rows, layout)
}

/// Load the planted-area series from a workbook (`.xlsx`, `.xls`, `.ods`) or
/// a `.csv` export of it.
pub fn load_cotton_data(path: impl AsRef<Path>, layout: &CottonLayout) -> Result<CottonSeries> {
    let path = path.as_ref();
    info!("loader: reading cotton series from {}", path.display());
    let is_delimited = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "csv" | "txt"))
        .unwrap_or(false);
    let rows = if is_delimited {
        read_delimited(File::open(path)?, layout.delimiter)?
    } else {
        read_workbook(path)?
    };
    CottonSeries::from_rows(&rows, layout)
}
