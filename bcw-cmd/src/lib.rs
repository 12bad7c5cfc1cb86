//! Command implementations for the BCW CLI.
//!
//! Each analysis is a subcommand that loads its inputs, runs, and writes its
//! result as CSV or JSON to a file or stdout. `report` runs all of them.

use bcw_data::climate::{analyze_climatic_influences, correlation_heatmap};
use bcw_data::historical::analyze_historical_trends;
use bcw_data::map::regional_map;
use bcw_data::regional::analyze_regional_potential;
use bcw_data::scatter::scatter_points;
use bcw_data::seasonal::analyze_seasonal_trends;
use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod inputs;
pub mod output;
pub mod report;

use inputs::{CottonArgs, LookupArgs, WeatherArgs};
use output::{emit, Format};

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file; stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the cotton sheet and print it in long (region, year, area) form
    Cotton {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Join planted area with seasonal weather averages of the same year
    Seasonal {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        weather: WeatherArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Rank regions by mean planted area
    Regional {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Rank weather variables by correlation with planted area
    Climate {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        weather: WeatherArgs,
        #[command(flatten)]
        lookups: LookupArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Full correlation matrix of planted area and weather variables
    Heatmap {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        weather: WeatherArgs,
        #[command(flatten)]
        lookups: LookupArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Total planted area per year
    Historical {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Pairs of one weather variable and planted area
    Scatter {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        weather: WeatherArgs,
        /// Weather column to plot against planted area
        #[arg(long)]
        variable: String,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Regional ranking with map coordinates
    Map {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        lookups: LookupArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Run every analysis and write each result into a directory
    Report {
        #[command(flatten)]
        cotton: CottonArgs,
        #[command(flatten)]
        weather: WeatherArgs,
        #[command(flatten)]
        lookups: LookupArgs,
        /// Directory receiving one file per analysis
        #[arg(short = 'd', long)]
        output_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Weather column for the scatter section; skipped when omitted
        #[arg(long)]
        variable: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Cotton { cotton, out } => {
            let series = cotton.load()?;
            emit(&series, out.format, out.output.as_deref())
        }
        Command::Seasonal {
            cotton,
            weather,
            out,
        } => {
            let series = cotton.load()?;
            let table = weather.load()?;
            let trend = analyze_seasonal_trends(&series.records, &table)?;
            emit(&trend, out.format, out.output.as_deref())
        }
        Command::Regional { cotton, out } => {
            let series = cotton.load()?;
            let ranking = analyze_regional_potential(&series.records);
            emit(&ranking, out.format, out.output.as_deref())
        }
        Command::Climate {
            cotton,
            weather,
            lookups,
            out,
        } => {
            let series = cotton.load()?;
            let table = weather.load()?;
            let stations = lookups.station_regions()?;
            let correlation = analyze_climatic_influences(&series.records, &table, &stations)?;
            emit(&correlation, out.format, out.output.as_deref())
        }
        Command::Heatmap {
            cotton,
            weather,
            lookups,
            out,
        } => {
            let series = cotton.load()?;
            let table = weather.load()?;
            let stations = lookups.station_regions()?;
            let heatmap = correlation_heatmap(&series.records, &table, &stations)?;
            emit(&heatmap, out.format, out.output.as_deref())
        }
        Command::Historical { cotton, out } => {
            let series = cotton.load()?;
            let history = analyze_historical_trends(&series.records);
            emit(&history, out.format, out.output.as_deref())
        }
        Command::Scatter {
            cotton,
            weather,
            variable,
            out,
        } => {
            let series = cotton.load()?;
            let table = weather.load()?;
            let scatter = scatter_points(&series.records, &table, &variable)?;
            emit(&scatter, out.format, out.output.as_deref())
        }
        Command::Map {
            cotton,
            lookups,
            out,
        } => {
            let series = cotton.load()?;
            let coordinates = lookups.region_coordinates()?;
            let ranking = analyze_regional_potential(&series.records);
            let map = regional_map(&ranking.regions, &coordinates);
            emit(&map, out.format, out.output.as_deref())
        }
        Command::Report {
            cotton,
            weather,
            lookups,
            output_dir,
            format,
            variable,
        } => {
            report::run_report(
                &cotton,
                &weather,
                &lookups,
                &output_dir,
                format,
                variable.as_deref(),
            )?;
            Ok(())
        }
    }
}
