//! Forecast command: fit a trend for one country and extrapolate it

use super::shared;
use crate::app::models::{FilterCriteria, ForecastSeries};
use crate::app::services::{aggregator, csv_export, filter_engine, forecaster};
use crate::cli::args::{ForecastArgs, OutputFormat};
use crate::{Error, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::info;

/// Run the forecast command
pub fn run_forecast(args: ForecastArgs) -> Result<()> {
    shared::setup_logging(&args.common);
    args.validate()?;

    let config = shared::load_configuration(&args.common)?;
    let (dataset, _stats) = shared::load_dataset(&args.common, &config)?;

    if !dataset.has_country(&args.country) {
        return Err(Error::configuration(format!(
            "country '{}' not present in dataset",
            args.country
        )));
    }

    let Some((data_min, data_max)) = dataset.year_range() else {
        return Err(Error::configuration(
            "dataset contains no observations to forecast",
        ));
    };

    // Horizon bounding is the caller's policy, not the forecaster's
    let bound = args.horizon_bound(config.max_horizon_years);
    if args.target_year > data_max + bound {
        return Err(Error::configuration(format!(
            "target year {} exceeds the horizon bound of {} year(s) past {}",
            args.target_year, bound, data_max
        )));
    }

    // The fit uses the country's full history, not a user year range
    let criteria = FilterCriteria::new(
        HashSet::from([args.country.clone()]),
        (data_min, data_max),
    );
    let subset = filter_engine::filter(&dataset, &criteria);

    let aggregates = aggregator::aggregate(&subset, args.variable)?;
    let series = forecaster::forecast(&aggregates, args.target_year, args.variable)?;

    info!(
        "Forecast for {} {}: {} aggregate(s), {} predicted point(s)",
        args.country,
        args.variable,
        aggregates.len(),
        series.len()
    );

    let content = match args.common.format {
        OutputFormat::Human => render_human(&args, &series, aggregates.len()),
        OutputFormat::Csv => csv_export::forecast_to_csv(&series)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&series)
                .map_err(|e| Error::configuration(format!("JSON encoding failed: {}", e)))?;
            json.push('\n');
            json
        }
    };

    shared::write_output(&args.common, &content)
}

/// Render a human-readable forecast report
fn render_human(args: &ForecastArgs, series: &ForecastSeries, aggregate_count: usize) -> String {
    let mut out = String::new();
    let model = series.model();

    let _ = writeln!(out, "{}", "Trend Forecast".bright_green().bold());
    let _ = writeln!(
        out,
        "  {} {}",
        "Country:".bright_cyan(),
        args.country.bright_white().bold()
    );
    let _ = writeln!(
        out,
        "  {} {}",
        "Variable:".bright_cyan(),
        args.variable.to_string().bright_white().bold()
    );
    let _ = writeln!(
        out,
        "  {} {} yearly mean(s)",
        "Fitted on:".bright_cyan(),
        aggregate_count
    );
    let _ = writeln!(
        out,
        "  {} slope={:.4} per year, intercept={:.4}",
        "Model:".bright_cyan(),
        model.slope,
        model.intercept
    );

    if series.is_empty() {
        let _ = writeln!(
            out,
            "\n  Target year {} precedes the first observed year; nothing to plot",
            args.target_year
        );
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  {:>6}  {}", "year", series.value_column_name());
    for point in series.points() {
        let _ = writeln!(out, "  {:>6}  {:.4}", point.year, point.predicted_value);
    }

    out
}
