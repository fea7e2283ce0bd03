//! Command implementations for the climate trend CLI
//!
//! This module dispatches parsed arguments to the individual command
//! runners and hosts the shared plumbing they use for logging,
//! configuration, dataset loading, and output writing.

pub mod filter;
pub mod forecast;
pub mod shared;
pub mod summary;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Run the command selected on the command line
///
/// Returns `Ok(())` without doing anything when no subcommand was given;
/// the binary shows usage help for that case before calling in here.
pub fn run(args: Args) -> Result<()> {
    match args.get_command() {
        Some(Commands::Summary(args)) => summary::run_summary(args),
        Some(Commands::Filter(args)) => filter::run_filter(args),
        Some(Commands::Forecast(args)) => forecast::run_forecast(args),
        None => Ok(()),
    }
}
