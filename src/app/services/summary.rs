//! Per-column dataset summaries
//!
//! Each canonical column gets a summary suited to its type: numeric
//! columns (year and the climate variables) get count/mean/std and
//! quartiles, categorical columns (country, date) get
//! count/unique/top/freq.

use crate::app::models::Dataset;
use crate::constants::{CANONICAL_COUNTRY_COLUMN, CANONICAL_DATE_COLUMN};
use serde::Serialize;
use std::collections::HashMap;

/// Summary statistics for one numeric column
///
/// `std` is the sample standard deviation (n-1 denominator); quartiles use
/// linear interpolation between the closest ranks. All statistics are NaN
/// when the column has no non-null values.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summary statistics for one categorical column
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value, empty when the column is empty
    pub top: String,
    /// Occurrences of the most frequent value
    pub freq: usize,
}

/// A per-column summary, numeric or categorical
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Summaries for every canonical column of a dataset, in column order
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub columns: Vec<(String, ColumnSummary)>,
}

/// Summarize every canonical column of a dataset
pub fn describe(dataset: &Dataset) -> DatasetSummary {
    let mut columns = Vec::new();

    let dates: Vec<String> = dataset
        .observations()
        .iter()
        .map(|obs| obs.date.format("%Y-%m-%d").to_string())
        .collect();
    columns.push((
        CANONICAL_DATE_COLUMN.to_string(),
        ColumnSummary::Categorical(summarize_categorical(&dates)),
    ));

    let countries: Vec<String> = dataset
        .observations()
        .iter()
        .map(|obs| obs.country.clone())
        .filter(|name| !name.is_empty())
        .collect();
    columns.push((
        CANONICAL_COUNTRY_COLUMN.to_string(),
        ColumnSummary::Categorical(summarize_categorical(&countries)),
    ));

    let years: Vec<f64> = dataset
        .observations()
        .iter()
        .map(|obs| f64::from(obs.year))
        .collect();
    columns.push((
        "year".to_string(),
        ColumnSummary::Numeric(summarize_numeric(&years)),
    ));

    for variable in dataset.variables() {
        let values: Vec<f64> = dataset
            .observations()
            .iter()
            .filter_map(|obs| obs.get_measurement(*variable))
            .collect();
        columns.push((
            variable.column_name().to_string(),
            ColumnSummary::Numeric(summarize_numeric(&values)),
        ));
    }

    DatasetSummary { columns }
}

/// Summarize a numeric column from its non-null values
fn summarize_numeric(values: &[f64]) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    NumericSummary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Summarize a categorical column from its non-null values
fn summarize_categorical(values: &[String]) -> CategoricalSummary {
    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *frequencies.entry(value.as_str()).or_insert(0) += 1;
    }

    // Ties break toward the lexicographically smaller value for stable output
    let top_entry = frequencies
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)));

    let (top, freq) = match top_entry {
        Some((value, count)) => (value.to_string(), *count),
        None => (String::new(), 0),
    };

    CategoricalSummary {
        count: values.len(),
        unique: frequencies.len(),
        top,
        freq,
    }
}

/// Linear-interpolation quantile over sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        sorted[low] + (position - low as f64) * (sorted[high] - sorted[low])
    }
}
