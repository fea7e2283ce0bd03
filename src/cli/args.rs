//! Command-line argument definitions for the climate trend CLI
//!
//! This module defines the complete CLI interface using the clap derive
//! API. The subcommands collect the user parameters the pipeline needs
//! (countries, year range, forecast variable and horizon) and hand them to
//! the command layer.

use crate::app::models::ClimateVariable;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the climate trend tool
///
/// Filters country-level environmental observations and produces
/// least-squares linear trend forecasts of climate variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "climate-trend",
    version,
    about = "Filter climate observation tables and forecast variables with a linear trend",
    long_about = "Loads a CSV of per-country environmental observations, reconciles variant \
                  column names onto a canonical schema, drops rows with unparseable dates, and \
                  supports filtered CSV export, per-column summaries, and least-squares trend \
                  forecasts of temperature, humidity, or precipitation."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print per-column summary statistics for the (optionally filtered) dataset
    Summary(SummaryArgs),
    /// Export the filtered subset as CSV
    Filter(FilterArgs),
    /// Fit a linear trend for one country and variable and extrapolate it
    Forecast(ForecastArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// Input CSV file
    ///
    /// Defaults to the dataset path from configuration.
    #[arg(short = 'i', long = "input", value_name = "PATH", help = "Input CSV file")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks in the platform
    /// config directory.
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output file
    ///
    /// If not specified, results are written to stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE", help = "Output file")]
    pub output: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl CommonArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Validate shared arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "input file does not exist: {}",
                    input.display()
                )));
            }
        }

        if let Some(output) = &self.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Arguments for the summary command
#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Restrict the summary to these countries (comma-separated)
    #[arg(
        short = 'c',
        long = "countries",
        value_name = "LIST",
        help = "Comma-separated list of countries to include"
    )]
    pub countries: Option<CountryList>,

    /// Restrict the summary to this inclusive year range
    #[arg(
        short = 'y',
        long = "years",
        value_name = "MIN:MAX",
        help = "Inclusive year range, e.g. 2015:2020"
    )]
    pub years: Option<YearRange>,
}

/// Arguments for the filter command
#[derive(Debug, Clone, Parser)]
pub struct FilterArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Countries whose observations are retained (comma-separated)
    #[arg(
        short = 'c',
        long = "countries",
        value_name = "LIST",
        help = "Comma-separated list of countries to retain"
    )]
    pub countries: CountryList,

    /// Inclusive year range to retain
    ///
    /// Defaults to the full range the loaded dataset spans.
    #[arg(
        short = 'y',
        long = "years",
        value_name = "MIN:MAX",
        help = "Inclusive year range, e.g. 2015:2020"
    )]
    pub years: Option<YearRange>,
}

/// Arguments for the forecast command
#[derive(Debug, Clone, Parser)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Country whose observations feed the trend fit
    #[arg(short = 'c', long = "country", value_name = "NAME", help = "Country to forecast")]
    pub country: String,

    /// Climate variable to forecast
    #[arg(
        short = 'V',
        long = "variable",
        value_enum,
        help = "Climate variable to forecast"
    )]
    pub variable: ClimateVariable,

    /// Final year of the forecast span
    #[arg(short = 't', long = "target-year", value_name = "YEAR", help = "Year to forecast to")]
    pub target_year: i32,

    /// Bound on years past the last observation
    ///
    /// Overrides the configured policy bound for this invocation.
    #[arg(
        long = "max-horizon",
        value_name = "YEARS",
        help = "Maximum years past the last observation"
    )]
    pub max_horizon: Option<i32>,
}

impl ForecastArgs {
    /// Validate the forecast arguments for consistency
    pub fn validate(&self) -> Result<()> {
        self.common.validate()?;

        if let Some(max_horizon) = self.max_horizon {
            if max_horizon < 0 {
                return Err(Error::configuration(
                    "max horizon must be non-negative".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The horizon bound to enforce, preferring the CLI override
    pub fn horizon_bound(&self, configured: i32) -> i32 {
        self.max_horizon.unwrap_or(configured)
    }
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// CSV format for data analysis
    Csv,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing comma-separated country lists
#[derive(Debug, Clone, PartialEq)]
pub struct CountryList {
    pub countries: Vec<String>,
}

impl FromStr for CountryList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let countries: Vec<String> = s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        if countries.is_empty() {
            return Err(Error::configuration(
                "country list cannot be empty".to_string(),
            ));
        }

        Ok(CountryList { countries })
    }
}

/// Wrapper for parsing an inclusive MIN:MAX year range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl FromStr for YearRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(Error::configuration(
                "year range must be in format MIN:MAX".to_string(),
            ));
        }

        let min: i32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| Error::configuration(format!("invalid minimum year: {}", parts[0])))?;
        let max: i32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| Error::configuration(format!("invalid maximum year: {}", parts[1])))?;

        Ok(YearRange { min, max })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            input: None,
            config_file: None,
            output: None,
            format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
        }
    }
}
