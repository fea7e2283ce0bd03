//! Per-year mean aggregation of a climate variable
//!
//! Collapses a dataset to one value per year for a chosen variable. Null
//! measurements are excluded before averaging; a year with no non-null
//! values is omitted from the output entirely rather than represented as
//! NaN.

use crate::app::models::{variable_list, ClimateVariable, Dataset, YearlyAggregate};
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregate one variable to per-year means, ascending by year
///
/// Fails with a variable-not-found error when the dataset's resolved
/// schema does not carry the requested variable; that failure is fatal for
/// the forecasting stage only, the dataset itself remains usable.
pub fn aggregate(dataset: &Dataset, variable: ClimateVariable) -> Result<Vec<YearlyAggregate>> {
    if !dataset.has_variable(variable) {
        return Err(Error::variable_not_found(
            variable.column_name(),
            variable_list(dataset.variables()),
        ));
    }

    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for obs in dataset.observations() {
        if let Some(value) = obs.get_measurement(variable) {
            let entry = sums.entry(obs.year).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let aggregates: Vec<YearlyAggregate> = sums
        .into_iter()
        .map(|(year, (sum, count))| YearlyAggregate {
            year,
            mean_value: sum / count as f64,
        })
        .collect();

    debug!(
        "Aggregated {} into {} yearly mean(s)",
        variable,
        aggregates.len()
    );

    Ok(aggregates)
}
