//! Core types and loaders for Brazilian cotton planting and weather data.
//!
//! Two loaders turn raw exports into tidy tables:
//!
//! - [`cotton::load_cotton_data`] melts the wide CONAB planted-area series
//!   (one row per region, one column per year) into [`cotton::RegionYearArea`]
//!   records.
//! - [`weather::load_weather_data`] parses a daily weather CSV and derives
//!   year, month and Southern-Hemisphere [`season::Season`] for each row.
//!
//! Station-to-region and region-to-coordinate lookups live in [`lookup`]
//! and are passed explicitly to the analyses that need them.
//!
//! ```rust
//! use bcw_core::cotton::{parse_cotton_csv, CottonLayout};
//!
//! let csv = "CONAB\nALGODÃO\nÁrea plantada\nREGIÃO/UF,1976/77,1977/78\n\
//!            MT,10.5,12\nBRASIL,10.5,12\n";
//! let series = parse_cotton_csv(csv, &CottonLayout::default()).unwrap();
//! assert_eq!(series.records.len(), 2);
//! assert_eq!(series.excluded_rows, 1);
//! ```

pub mod cotton;
pub mod error;
pub mod lookup;
pub mod season;
mod table;
pub mod weather;
