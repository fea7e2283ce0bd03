//! Least-squares trend fitting and extrapolation
//!
//! Fits `mean_value = slope * year + intercept` by ordinary least squares
//! over yearly aggregates and evaluates the fitted line over the full span
//! from the first observed year through the requested target year. The
//! closed-form sums formulation is used directly; there is no
//! regularization and no uncertainty modeling.

use crate::app::models::{
    ClimateVariable, ForecastPoint, ForecastSeries, TrendModel, YearlyAggregate,
};
use crate::constants::MIN_TREND_POINTS;
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::debug;

/// Fit a degree-1 trend line over (year, mean) pairs
///
/// Requires at least two aggregates covering at least two distinct years;
/// anything less is rejected rather than silently extrapolated. The model
/// is recomputed on every call, never cached.
pub fn fit(aggregates: &[YearlyAggregate]) -> Result<TrendModel> {
    let distinct_years: HashSet<i32> = aggregates.iter().map(|a| a.year).collect();
    if distinct_years.len() < MIN_TREND_POINTS {
        return Err(Error::insufficient_data(distinct_years.len()));
    }

    let n = aggregates.len() as f64;
    let x_sum: f64 = aggregates.iter().map(|a| f64::from(a.year)).sum();
    let y_sum: f64 = aggregates.iter().map(|a| a.mean_value).sum();
    let xy_sum: f64 = aggregates
        .iter()
        .map(|a| f64::from(a.year) * a.mean_value)
        .sum();
    let x_sq_sum: f64 = aggregates.iter().map(|a| f64::from(a.year).powi(2)).sum();

    let slope = (n * xy_sum - x_sum * y_sum) / (n * x_sq_sum - x_sum.powi(2));
    let intercept = (y_sum - slope * x_sum) / n;

    debug!("Fitted trend: slope={}, intercept={}", slope, intercept);

    Ok(TrendModel { slope, intercept })
}

/// Extrapolate a fitted trend to a target year
///
/// Emits one model-predicted point per integer year from the minimum
/// aggregate year through `target_year` inclusive; historical years carry
/// the fitted line's value, not the input aggregate. A target year before
/// the first observed year yields an empty series; a target inside the
/// historical span is in-sample backfill. No horizon limit is enforced
/// here; bounding how far a user may extrapolate is the caller's policy.
pub fn forecast(
    aggregates: &[YearlyAggregate],
    target_year: i32,
    variable: ClimateVariable,
) -> Result<ForecastSeries> {
    let model = fit(aggregates)?;

    let Some(start_year) = aggregates.iter().map(|a| a.year).min() else {
        return Err(Error::insufficient_data(0));
    };

    let points: Vec<ForecastPoint> = (start_year..=target_year)
        .map(|year| ForecastPoint {
            year,
            predicted_value: model.predict(year),
        })
        .collect();

    debug!(
        "Forecast span {}..={} for {}: {} point(s)",
        start_year,
        target_year,
        variable,
        points.len()
    );

    Ok(ForecastSeries::new(variable, model, points))
}
