//! Data models for the climate trend pipeline
//!
//! This module contains the core data structures for representing
//! environmental observations, filter criteria, yearly aggregates, and
//! fitted trend models.

use crate::constants::FORECAST_COLUMN_PREFIX;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Climate Variables
// =============================================================================

/// The numeric climate fields an observation may carry
///
/// The set is fixed; which members are actually present in a loaded dataset
/// is determined by schema resolution and recorded on the [`Dataset`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ClimateVariable {
    /// Air temperature
    Temperature,
    /// Relative humidity
    Humidity,
    /// Precipitation amount
    Precipitation,
}

impl ClimateVariable {
    /// Canonical column name of this variable in input and exported CSV
    pub const fn column_name(self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "temperature",
            ClimateVariable::Humidity => "humidity",
            ClimateVariable::Precipitation => "precipitation",
        }
    }

    /// All recognized climate variables, in canonical order
    pub const fn all() -> [ClimateVariable; 3] {
        [
            ClimateVariable::Temperature,
            ClimateVariable::Humidity,
            ClimateVariable::Precipitation,
        ]
    }

    /// Match a raw column header against the recognized variables
    ///
    /// Matching is case-insensitive and whitespace-trimmed, consistent with
    /// date and location alias matching.
    pub fn from_column_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::all()
            .into_iter()
            .find(|variable| trimmed.eq_ignore_ascii_case(variable.column_name()))
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for ClimateVariable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_column_name(s).ok_or_else(|| {
            Error::variable_not_found(s.trim(), variable_list(&ClimateVariable::all()))
        })
    }
}

/// Comma-separated display list of variables, used in error messages
pub fn variable_list(variables: &[ClimateVariable]) -> String {
    variables
        .iter()
        .map(|v| v.column_name())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Observations and Datasets
// =============================================================================

/// A single environmental observation for a country and date
///
/// Immutable once constructed. The `year` field is always derived from
/// `date`, so the two cannot disagree. Climate measurements are sparse:
/// absence from the map represents a null field in the source row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Geographic entity the observation belongs to
    pub country: String,

    /// Calendar date of the observation
    pub date: NaiveDate,

    /// Calendar year, derived from `date`
    pub year: i32,

    /// Climate measurements present on this row
    pub measurements: HashMap<ClimateVariable, f64>,
}

impl Observation {
    /// Create an observation, deriving `year` from the date
    pub fn new(
        country: impl Into<String>,
        date: NaiveDate,
        measurements: HashMap<ClimateVariable, f64>,
    ) -> Self {
        Self {
            country: country.into(),
            year: date.year(),
            date,
            measurements,
        }
    }

    /// Get a measurement value, `None` when the field was null
    pub fn get_measurement(&self, variable: ClimateVariable) -> Option<f64> {
        self.measurements.get(&variable).copied()
    }
}

/// An ordered, immutable collection of observations
///
/// Loaded once per session and immutable afterwards. Filtering produces
/// new `Dataset` values and never mutates the original.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    observations: Vec<Observation>,
    variables: Vec<ClimateVariable>,
}

impl Dataset {
    /// Create a dataset from normalized observations and the climate
    /// variables present in the resolved schema
    pub fn new(observations: Vec<Observation>, variables: Vec<ClimateVariable>) -> Self {
        Self {
            observations,
            variables,
        }
    }

    /// The observations, in load order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Climate variables present in the resolved schema, in column order
    pub fn variables(&self) -> &[ClimateVariable] {
        &self.variables
    }

    /// Whether the resolved schema carries the given variable
    pub fn has_variable(&self, variable: ClimateVariable) -> bool {
        self.variables.contains(&variable)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset holds no observations
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Inclusive (min, max) of the derived years, `None` when empty
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let mut years = self.observations.iter().map(|obs| obs.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(min, max), year| {
            (min.min(year), max.max(year))
        }))
    }

    /// Sorted unique country names, empty names skipped
    pub fn countries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .observations
            .iter()
            .map(|obs| obs.country.clone())
            .filter(|name| !name.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    /// Whether any observation belongs to the given country
    pub fn has_country(&self, country: &str) -> bool {
        self.observations.iter().any(|obs| obs.country == country)
    }
}

// =============================================================================
// Filter Criteria
// =============================================================================

/// Country-set and year-range predicates for subsetting a dataset
///
/// The year range is inclusive on both ends. An empty country set or an
/// inverted range matches nothing; neither is an error.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Countries whose observations are retained
    pub countries: HashSet<String>,

    /// Inclusive (min, max) year range
    pub year_range: (i32, i32),
}

impl FilterCriteria {
    /// Create filter criteria from a country set and inclusive year range
    pub fn new(countries: HashSet<String>, year_range: (i32, i32)) -> Self {
        Self {
            countries,
            year_range,
        }
    }

    /// Whether an observation satisfies both predicates
    pub fn matches(&self, observation: &Observation) -> bool {
        let (min_year, max_year) = self.year_range;
        self.countries.contains(&observation.country)
            && observation.year >= min_year
            && observation.year <= max_year
    }

    /// Check that the requested years lie inside the dataset's derived range
    ///
    /// User input must reference only years the loaded dataset actually
    /// spans; an inverted range (min > max) is allowed and simply matches
    /// nothing.
    pub fn validate_against(&self, dataset: &Dataset) -> Result<()> {
        let Some((data_min, data_max)) = dataset.year_range() else {
            return Err(Error::configuration(
                "dataset contains no observations to filter",
            ));
        };

        let (min_year, max_year) = self.year_range;
        for year in [min_year, max_year] {
            if year < data_min || year > data_max {
                return Err(Error::configuration(format!(
                    "year {} is outside the dataset range {}..={}",
                    year, data_min, data_max
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Aggregates, Trend Models, Forecast Series
// =============================================================================

/// Mean of one climate variable across all observations sharing a year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyAggregate {
    /// Calendar year the mean covers
    pub year: i32,

    /// Arithmetic mean over the year's non-null values
    pub mean_value: f64,
}

/// A fitted degree-1 trend line
///
/// Owned transiently by the forecaster and recomputed on every request;
/// nothing caches a fitted model across requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    /// Change in the variable per year
    pub slope: f64,

    /// Value of the fitted line at year zero
    pub intercept: f64,
}

impl TrendModel {
    /// Evaluate the fitted line at a year
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }
}

/// One model-predicted value of a forecast series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Calendar year of the prediction
    pub year: i32,

    /// Value of the fitted line at that year
    pub predicted_value: f64,
}

/// A forecast series spanning the minimum observed year through the
/// requested target year, inclusive
///
/// Years are strictly increasing with no gaps. Historical years carry the
/// fitted line's value, not the original aggregated input, so serializing
/// the series shows the model's full span rather than actuals mixed with
/// predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    variable: ClimateVariable,
    model: TrendModel,
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Create a forecast series from a fitted model and its predictions
    pub fn new(variable: ClimateVariable, model: TrendModel, points: Vec<ForecastPoint>) -> Self {
        Self {
            variable,
            model,
            points,
        }
    }

    /// The forecast variable
    pub fn variable(&self) -> ClimateVariable {
        self.variable
    }

    /// The model that produced the predictions
    pub fn model(&self) -> &TrendModel {
        &self.model
    }

    /// The predicted points, ascending by year
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Number of predicted points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is degenerate (target year before the first
    /// observed year)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Header name of the value column in the exported series
    pub fn value_column_name(&self) -> String {
        format!("{}{}", FORECAST_COLUMN_PREFIX, self.variable.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn observation(country: &str, year: i32, temperature: Option<f64>) -> Observation {
        let mut measurements = HashMap::new();
        if let Some(value) = temperature {
            measurements.insert(ClimateVariable::Temperature, value);
        }
        Observation::new(country, date(year, 6, 15), measurements)
    }

    mod climate_variable_tests {
        use super::*;

        #[test]
        fn test_from_column_name() {
            assert_eq!(
                ClimateVariable::from_column_name("temperature"),
                Some(ClimateVariable::Temperature)
            );
            assert_eq!(
                ClimateVariable::from_column_name("  Humidity "),
                Some(ClimateVariable::Humidity)
            );
            assert_eq!(
                ClimateVariable::from_column_name("PRECIPITATION"),
                Some(ClimateVariable::Precipitation)
            );
            assert_eq!(ClimateVariable::from_column_name("wind_speed"), None);
        }

        #[test]
        fn test_from_str_rejects_unknown() {
            let result = "wind".parse::<ClimateVariable>();
            assert!(matches!(result, Err(Error::VariableNotFound { .. })));
        }

        #[test]
        fn test_display_matches_column_name() {
            for variable in ClimateVariable::all() {
                assert_eq!(variable.to_string(), variable.column_name());
            }
        }
    }

    mod observation_tests {
        use super::*;

        #[test]
        fn test_year_derived_from_date() {
            let obs = Observation::new("Kenya", date(2019, 3, 1), HashMap::new());
            assert_eq!(obs.year, 2019);
            assert_eq!(obs.date.year(), obs.year);
        }

        #[test]
        fn test_measurement_access() {
            let obs = observation("Kenya", 2019, Some(21.5));
            assert_eq!(obs.get_measurement(ClimateVariable::Temperature), Some(21.5));
            assert_eq!(obs.get_measurement(ClimateVariable::Humidity), None);
        }
    }

    mod dataset_tests {
        use super::*;

        #[test]
        fn test_year_range_and_countries() {
            let dataset = Dataset::new(
                vec![
                    observation("Kenya", 2018, Some(20.0)),
                    observation("Nigeria", 2020, Some(27.0)),
                    observation("Kenya", 2019, None),
                ],
                vec![ClimateVariable::Temperature],
            );

            assert_eq!(dataset.year_range(), Some((2018, 2020)));
            assert_eq!(dataset.countries(), vec!["Kenya", "Nigeria"]);
            assert!(dataset.has_country("Kenya"));
            assert!(!dataset.has_country("Chad"));
        }

        #[test]
        fn test_empty_dataset() {
            let dataset = Dataset::default();
            assert!(dataset.is_empty());
            assert_eq!(dataset.year_range(), None);
            assert!(dataset.countries().is_empty());
        }

        #[test]
        fn test_countries_skips_empty_names() {
            let dataset = Dataset::new(
                vec![observation("", 2018, None), observation("Kenya", 2018, None)],
                vec![],
            );
            assert_eq!(dataset.countries(), vec!["Kenya"]);
        }
    }

    mod filter_criteria_tests {
        use super::*;

        #[test]
        fn test_matches_country_and_year() {
            let criteria = FilterCriteria::new(
                HashSet::from(["Kenya".to_string()]),
                (2018, 2020),
            );

            assert!(criteria.matches(&observation("Kenya", 2019, None)));
            assert!(criteria.matches(&observation("Kenya", 2018, None)));
            assert!(criteria.matches(&observation("Kenya", 2020, None)));
            assert!(!criteria.matches(&observation("Kenya", 2021, None)));
            assert!(!criteria.matches(&observation("Nigeria", 2019, None)));
        }

        #[test]
        fn test_validate_against_dataset_range() {
            let dataset = Dataset::new(
                vec![
                    observation("Kenya", 2015, None),
                    observation("Kenya", 2020, None),
                ],
                vec![],
            );

            let inside = FilterCriteria::new(HashSet::new(), (2016, 2019));
            assert!(inside.validate_against(&dataset).is_ok());

            let outside = FilterCriteria::new(HashSet::new(), (2014, 2019));
            assert!(outside.validate_against(&dataset).is_err());

            let empty = Dataset::default();
            assert!(inside.validate_against(&empty).is_err());
        }
    }

    mod trend_model_tests {
        use super::*;

        #[test]
        fn test_predict_evaluates_line() {
            let model = TrendModel {
                slope: 2.0,
                intercept: -3990.0,
            };
            assert!((model.predict(2005) - 20.0).abs() < 1e-9);
        }
    }

    mod forecast_series_tests {
        use super::*;

        #[test]
        fn test_value_column_name() {
            let series = ForecastSeries::new(
                ClimateVariable::Humidity,
                TrendModel {
                    slope: 0.0,
                    intercept: 0.0,
                },
                Vec::new(),
            );
            assert_eq!(series.value_column_name(), "forecast_humidity");
            assert!(series.is_empty());
        }
    }
}
