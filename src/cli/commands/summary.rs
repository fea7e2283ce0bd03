//! Summary command: per-column statistics for the (filtered) dataset

use super::shared;
use crate::app::models::FilterCriteria;
use crate::app::services::filter_engine;
use crate::app::services::summary::{describe, ColumnSummary, DatasetSummary};
use crate::cli::args::{OutputFormat, SummaryArgs};
use crate::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::info;

/// Run the summary command
pub fn run_summary(args: SummaryArgs) -> Result<()> {
    shared::setup_logging(&args.common);
    args.common.validate()?;

    let config = shared::load_configuration(&args.common)?;
    let (dataset, stats) = shared::load_dataset(&args.common, &config)?;

    let filtered;
    let subject = if args.countries.is_some() || args.years.is_some() {
        let countries: HashSet<String> = match &args.countries {
            Some(list) => list.countries.iter().cloned().collect(),
            None => dataset.countries().into_iter().collect(),
        };
        let year_range = match args.years {
            Some(range) => (range.min, range.max),
            None => dataset.year_range().unwrap_or((0, 0)),
        };

        let criteria = FilterCriteria::new(countries, year_range);
        if args.years.is_some() {
            criteria.validate_against(&dataset)?;
        }
        filtered = filter_engine::filter(&dataset, &criteria);
        &filtered
    } else {
        &*dataset
    };

    info!(
        "Summarizing {} observation(s) ({} dropped at load)",
        subject.len(),
        stats.dropped_dates
    );

    let summary = describe(subject);
    let content = match args.common.format {
        OutputFormat::Human => render_human(&summary, subject.len()),
        OutputFormat::Csv => render_csv(&summary)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&summary)
                .map_err(|e| crate::Error::configuration(format!("JSON encoding failed: {}", e)))?;
            json.push('\n');
            json
        }
    };

    shared::write_output(&args.common, &content)
}

/// Render a human-readable summary table
fn render_human(summary: &DatasetSummary, observations: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Dataset Summary".bright_green().bold());
    let _ = writeln!(
        out,
        "  {} {}",
        "Observations:".bright_cyan(),
        observations.to_string().bright_white().bold()
    );
    let _ = writeln!(out);

    for (name, column) in &summary.columns {
        match column {
            ColumnSummary::Numeric(numeric) => {
                let _ = writeln!(
                    out,
                    "  {:<14} count={} mean={} std={} min={} q25={} median={} q75={} max={}",
                    name.bright_cyan(),
                    numeric.count,
                    format_stat(numeric.mean),
                    format_stat(numeric.std),
                    format_stat(numeric.min),
                    format_stat(numeric.q25),
                    format_stat(numeric.median),
                    format_stat(numeric.q75),
                    format_stat(numeric.max),
                );
            }
            ColumnSummary::Categorical(categorical) => {
                let _ = writeln!(
                    out,
                    "  {:<14} count={} unique={} top={} freq={}",
                    name.bright_cyan(),
                    categorical.count,
                    categorical.unique,
                    if categorical.top.is_empty() {
                        "-"
                    } else {
                        categorical.top.as_str()
                    },
                    categorical.freq,
                );
            }
        }
    }

    out
}

/// Render the summary as long-format CSV: column,statistic,value
fn render_csv(summary: &DatasetSummary) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["column", "statistic", "value"])?;

    for (name, column) in &summary.columns {
        match column {
            ColumnSummary::Numeric(numeric) => {
                let stats: [(&str, f64); 8] = [
                    ("count", numeric.count as f64),
                    ("mean", numeric.mean),
                    ("std", numeric.std),
                    ("min", numeric.min),
                    ("q25", numeric.q25),
                    ("median", numeric.median),
                    ("q75", numeric.q75),
                    ("max", numeric.max),
                ];
                for (statistic, value) in stats {
                    writer.write_record([name.clone(), statistic.to_string(), format_stat(value)])?;
                }
            }
            ColumnSummary::Categorical(categorical) => {
                writer.write_record([name.clone(), "count".to_string(), categorical.count.to_string()])?;
                writer.write_record([name.clone(), "unique".to_string(), categorical.unique.to_string()])?;
                writer.write_record([name.clone(), "top".to_string(), categorical.top.clone()])?;
                writer.write_record([name.clone(), "freq".to_string(), categorical.freq.to_string()])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::Error::csv(format!("failed to flush CSV writer: {}", e), None))?;
    String::from_utf8(bytes)
        .map_err(|e| crate::Error::csv(format!("summary CSV was not valid UTF-8: {}", e), None))
}

/// Format a statistic, showing absent values as a dash
fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.4}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
