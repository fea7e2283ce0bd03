//! Column-name reconciliation onto the canonical schema
//!
//! Input tables name their columns inconsistently ("Nation",
//! "Recorded_Date", ...). This module scans the raw header row against
//! fixed priority alias lists and records which column indices play the
//! canonical `date` and `country` roles, plus which climate variable
//! columns are present.

use crate::app::models::ClimateVariable;
use crate::constants::{DATE_ALIASES, LOCATION_ALIASES};
use crate::{Error, Result};
use csv::StringRecord;
use tracing::debug;

/// Resolved mapping from raw header positions to the canonical schema
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// Index of the column holding the observation date
    pub date_index: usize,

    /// Index of the column holding the geographic entity
    pub country_index: usize,

    /// Climate variable columns present, with their indices, in header order
    pub variable_indices: Vec<(ClimateVariable, usize)>,

    /// Original header that matched the date aliases
    pub date_source: String,

    /// Original header that matched the location aliases
    pub country_source: String,
}

impl ResolvedSchema {
    /// Climate variables present in the schema, in header order
    pub fn variables(&self) -> Vec<ClimateVariable> {
        self.variable_indices
            .iter()
            .map(|(variable, _)| *variable)
            .collect()
    }

    /// Whether any climate variable column was found
    pub fn has_variables(&self) -> bool {
        !self.variable_indices.is_empty()
    }
}

/// Resolve a raw header row onto the canonical schema
///
/// Alias matching is case-insensitive and whitespace-trimmed,
/// first-match-wins in alias-list order, scanning the input columns in
/// their original order for each alias. Fails when no date-alias or no
/// location-alias column exists; both failures are fatal for the whole
/// pipeline.
pub fn resolve(headers: &StringRecord) -> Result<ResolvedSchema> {
    let (date_index, date_source) = find_by_aliases(headers, DATE_ALIASES)
        .ok_or_else(|| Error::schema("missing date column"))?;

    let (country_index, country_source) = find_by_aliases(headers, LOCATION_ALIASES)
        .ok_or_else(|| Error::schema("missing location column"))?;

    let mut variable_indices = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if index == date_index || index == country_index {
            continue;
        }
        if let Some(variable) = ClimateVariable::from_column_name(header) {
            // First occurrence wins when a variable column is duplicated
            if !variable_indices.iter().any(|(v, _)| *v == variable) {
                variable_indices.push((variable, index));
            }
        }
    }

    debug!(
        "Resolved schema: date='{}' (col {}), country='{}' (col {}), {} climate variable(s)",
        date_source,
        date_index,
        country_source,
        country_index,
        variable_indices.len()
    );

    Ok(ResolvedSchema {
        date_index,
        country_index,
        variable_indices,
        date_source,
        country_source,
    })
}

/// Find the first column matching any alias, in alias-priority order
fn find_by_aliases(headers: &StringRecord, aliases: &[&str]) -> Option<(usize, String)> {
    for alias in aliases {
        for (index, header) in headers.iter().enumerate() {
            let trimmed = header.trim();
            if trimmed.eq_ignore_ascii_case(alias) {
                return Some((index, trimmed.to_string()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> StringRecord {
        StringRecord::from(names.to_vec())
    }

    #[test]
    fn test_resolves_variant_headers() {
        let schema = resolve(&headers(&["Nation", "Recorded_Date", "temperature"])).unwrap();

        assert_eq!(schema.country_index, 0);
        assert_eq!(schema.country_source, "Nation");
        assert_eq!(schema.date_index, 1);
        assert_eq!(schema.date_source, "Recorded_Date");
        assert_eq!(
            schema.variable_indices,
            vec![(ClimateVariable::Temperature, 2)]
        );
    }

    #[test]
    fn test_missing_date_column() {
        let result = resolve(&headers(&["country", "temperature"]));
        match result {
            Err(Error::Schema { message }) => assert_eq!(message, "missing date column"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_location_column() {
        let result = resolve(&headers(&["date", "temperature"]));
        match result {
            Err(Error::Schema { message }) => assert_eq!(message, "missing location column"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_headers() {
        assert!(resolve(&headers(&["x", "y"])).is_err());
    }

    #[test]
    fn test_alias_priority_beats_column_order() {
        // "region" appears first, but "country" has higher alias priority
        let schema = resolve(&headers(&["region", "date", "country"])).unwrap();
        assert_eq!(schema.country_index, 2);
        assert_eq!(schema.country_source, "country");
    }

    #[test]
    fn test_matching_is_case_insensitive_and_trimmed() {
        let schema = resolve(&headers(&["  COUNTRY ", " Observation_Date", "HUMIDITY "])).unwrap();
        assert_eq!(schema.country_index, 0);
        assert_eq!(schema.date_index, 1);
        assert_eq!(schema.variable_indices, vec![(ClimateVariable::Humidity, 2)]);
    }

    #[test]
    fn test_first_column_wins_within_one_alias() {
        let schema = resolve(&headers(&["date", "country", "recorded_date"])).unwrap();
        assert_eq!(schema.date_index, 0);
    }

    #[test]
    fn test_duplicate_variable_columns_keep_first() {
        let schema = resolve(&headers(&["date", "country", "temperature", "Temperature"])).unwrap();
        assert_eq!(
            schema.variable_indices,
            vec![(ClimateVariable::Temperature, 2)]
        );
    }

    #[test]
    fn test_no_climate_variables_is_not_an_error() {
        let schema = resolve(&headers(&["date", "country", "notes"])).unwrap();
        assert!(!schema.has_variables());
    }
}
