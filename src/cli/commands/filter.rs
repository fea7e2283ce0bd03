//! Filter command: export a country/year subset as CSV

use super::shared;
use crate::Result;
use crate::app::models::FilterCriteria;
use crate::app::services::{csv_export, filter_engine};
use crate::cli::args::{FilterArgs, OutputFormat};
use colored::Colorize;
use std::collections::HashSet;
use tracing::info;

/// Run the filter command
pub fn run_filter(args: FilterArgs) -> Result<()> {
    shared::setup_logging(&args.common);
    args.common.validate()?;

    let config = shared::load_configuration(&args.common)?;
    let (dataset, stats) = shared::load_dataset(&args.common, &config)?;

    let countries: HashSet<String> = args.countries.countries.iter().cloned().collect();
    let year_range = match args.years {
        Some(range) => (range.min, range.max),
        None => dataset.year_range().unwrap_or((0, 0)),
    };

    let criteria = FilterCriteria::new(countries, year_range);
    if args.years.is_some() {
        criteria.validate_against(&dataset)?;
    }

    let filtered = filter_engine::filter(&dataset, &criteria);
    info!(
        "Filter kept {} of {} observation(s) ({} dropped at load)",
        filtered.len(),
        dataset.len(),
        stats.dropped_dates
    );

    let content = match args.common.format {
        OutputFormat::Human => {
            let mut report = String::new();
            report.push_str(&format!(
                "{} {} of {} observation(s), years {}..={}\n\n",
                "Retained".bright_green().bold(),
                filtered.len().to_string().bright_white().bold(),
                dataset.len(),
                criteria.year_range.0,
                criteria.year_range.1,
            ));
            report.push_str(&csv_export::dataset_to_csv(&filtered)?);
            report
        }
        OutputFormat::Csv => csv_export::dataset_to_csv(&filtered)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&filtered)
                .map_err(|e| crate::Error::configuration(format!("JSON encoding failed: {}", e)))?;
            json.push('\n');
            json
        }
    };

    shared::write_output(&args.common, &content)
}
