//! CSV serialization of filtered datasets and forecast series
//!
//! Exports are UTF-8 with a header row. Dataset exports use the canonical
//! column names and `%Y-%m-%d` dates so that re-parsing an export through
//! the schema resolver and temporal normalizer reproduces the same rows.

use crate::app::models::{Dataset, ForecastSeries};
use crate::constants::{CANONICAL_COUNTRY_COLUMN, CANONICAL_DATE_COLUMN};
use crate::{Error, Result};
use csv::Writer;

/// Serialize a dataset with header `date,country,<variables>`
///
/// Null measurements become empty fields. The derived `year` column is not
/// exported; it is re-derived on load.
pub fn dataset_to_csv(dataset: &Dataset) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());

    let mut header = vec![
        CANONICAL_DATE_COLUMN.to_string(),
        CANONICAL_COUNTRY_COLUMN.to_string(),
    ];
    header.extend(
        dataset
            .variables()
            .iter()
            .map(|variable| variable.column_name().to_string()),
    );
    writer.write_record(&header)?;

    for obs in dataset.observations() {
        let mut record = vec![obs.date.format("%Y-%m-%d").to_string(), obs.country.clone()];
        for variable in dataset.variables() {
            record.push(
                obs.get_measurement(*variable)
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    into_string(writer)
}

/// Serialize a forecast series with header `year,forecast_<variable>`
pub fn forecast_to_csv(series: &ForecastSeries) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(["year".to_string(), series.value_column_name()])?;
    for point in series.points() {
        writer.write_record([point.year.to_string(), point.predicted_value.to_string()])?;
    }

    into_string(writer)
}

/// Finish a CSV writer and take its buffer as a string
fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::csv(format!("failed to flush CSV writer: {}", e), None))?;

    String::from_utf8(bytes)
        .map_err(|e| Error::csv(format!("exported CSV was not valid UTF-8: {}", e), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{
        ClimateVariable, ForecastPoint, Observation, TrendModel,
    };
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn sample_dataset() -> Dataset {
        let mut first = HashMap::new();
        first.insert(ClimateVariable::Temperature, 20.5);
        first.insert(ClimateVariable::Humidity, 61.0);
        let mut second = HashMap::new();
        second.insert(ClimateVariable::Temperature, 21.0);

        Dataset::new(
            vec![
                Observation::new("Kenya", NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(), first),
                Observation::new("Kenya", NaiveDate::from_ymd_opt(2019, 6, 1).unwrap(), second),
            ],
            vec![ClimateVariable::Temperature, ClimateVariable::Humidity],
        )
    }

    #[test]
    fn test_dataset_export_layout() {
        let csv = dataset_to_csv(&sample_dataset()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,country,temperature,humidity");
        assert_eq!(lines[1], "2018-06-01,Kenya,20.5,61");
        // Null humidity exports as an empty field
        assert_eq!(lines[2], "2019-06-01,Kenya,21,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let dataset = Dataset::new(Vec::new(), vec![ClimateVariable::Precipitation]);
        let csv = dataset_to_csv(&dataset).unwrap();
        assert_eq!(csv.trim_end(), "date,country,precipitation");
    }

    #[test]
    fn test_forecast_export_layout() {
        let series = ForecastSeries::new(
            ClimateVariable::Temperature,
            TrendModel {
                slope: 1.0,
                intercept: -1998.0,
            },
            vec![
                ForecastPoint {
                    year: 2020,
                    predicted_value: 22.0,
                },
                ForecastPoint {
                    year: 2021,
                    predicted_value: 23.0,
                },
            ],
        );

        let csv = forecast_to_csv(&series).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "year,forecast_temperature");
        assert_eq!(lines[1], "2020,22");
        assert_eq!(lines[2], "2021,23");
    }
}
