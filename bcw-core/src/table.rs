//! Raw row readers shared by the cotton and weather loaders.
//!
//! Both readers hand back plain string cells; numeric coercion and column
//! interpretation belong to the loaders.

use crate::error::{LoadError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// One source row with its 1-based line (or sheet row) number.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    /// Cell at `index`, or "" past the end of a short row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Read delimited text into raw rows. Invalid UTF-8 is replaced rather than
/// rejected, since Latin-1 exports are common.
pub(crate) fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (index, result) in rdr.byte_records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);
        let cells = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        rows.push(RawRow { line, cells });
    }
    Ok(rows)
}

/// Read the first worksheet of a workbook into raw rows.
///
/// Leading blank sheet rows and columns are restored so row numbers and
/// column positions match the sheet.
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook(path.display().to_string()))??;
    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let mut rows: Vec<RawRow> = (0..first_row)
        .map(|index| RawRow {
            line: index + 1,
            cells: Vec::new(),
        })
        .collect();
    for (offset, sheet_row) in range.rows().enumerate() {
        rows.push(RawRow {
            line: first_row + offset + 1,
            cells: std::iter::repeat(String::new())
                .take(first_col)
                .chain(sheet_row.iter().map(cell_to_string))
                .collect(),
        });
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
