use clap::Parser;
use climate_trend::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Climate Trend - Observation Filtering and Trend Forecasting");
    println!("===========================================================");
    println!();
    println!("Normalize country-level climate observation tables and extrapolate");
    println!("temperature, humidity, or precipitation with a least-squares trend.");
    println!();
    println!("USAGE:");
    println!("    climate-trend <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    summary     Print per-column statistics for the (filtered) dataset");
    println!("    filter      Export a country/year subset as CSV");
    println!("    forecast    Fit a linear trend for one country and extrapolate it");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Export Kenyan observations from 2015 through 2020:");
    println!("    climate-trend filter --countries Kenya --years 2015:2020 --format csv");
    println!();
    println!("    # Forecast Kenyan temperature out to 2030:");
    println!("    climate-trend forecast --country Kenya --variable temperature \\");
    println!("                           --target-year 2030");
    println!();
    println!("    # Summarize an uploaded table:");
    println!("    climate-trend summary --input observations.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    climate-trend <COMMAND> --help");
}
