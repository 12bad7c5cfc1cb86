/// Error types for loading cotton and weather data
use thiserror::Error;

/// Fatal load failure. No partial dataset is ever returned alongside one.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file could not be opened or read
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse delimited text
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to open or decode a spreadsheet workbook
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// Workbook opened but holds no worksheet
    #[error("Workbook has no worksheets: {0}")]
    EmptyWorkbook(String),

    /// An expected column is absent
    #[error("Missing expected column: {0}")]
    MissingColumn(String),

    /// A region label holding a field separator, so the rows were split on
    /// the wrong delimiter
    #[error("Region label {label:?} on line {line} contains a field separator; check the delimiter")]
    SuspectDelimiter { line: usize, label: String },

    /// A weather row whose date could not be parsed
    #[error("Unparseable date {value:?} on line {line}")]
    InvalidDate { line: usize, value: String },

    /// A month that falls outside every season bin
    #[error("Month {month} on line {line} does not map to a season")]
    UnmappedSeason { line: usize, month: u32 },

    /// A malformed row in a lookup table
    #[error("Invalid lookup entry on line {line}: {reason}")]
    InvalidLookup { line: usize, reason: String },
}

/// Type alias for Results using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
