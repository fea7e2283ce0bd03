//! Country and year-range filtering
//!
//! A pure view over an immutable dataset: the input is never mutated and
//! the output is a new dataset carrying the retained rows in their
//! original order.

use crate::app::models::{Dataset, FilterCriteria};
use tracing::debug;

/// Apply filter criteria to a dataset
///
/// A row is retained iff its country is in the criteria's country set and
/// its year lies inside the inclusive year range. An empty country set or
/// an inverted range yields an empty dataset, not an error.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let observations: Vec<_> = dataset
        .observations()
        .iter()
        .filter(|obs| criteria.matches(obs))
        .cloned()
        .collect();

    debug!(
        "Filter retained {} of {} observations ({} countries, years {}..={})",
        observations.len(),
        dataset.len(),
        criteria.countries.len(),
        criteria.year_range.0,
        criteria.year_range.1
    );

    Dataset::new(observations, dataset.variables().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{ClimateVariable, Observation};
    use chrono::NaiveDate;
    use std::collections::{HashMap, HashSet};

    fn observation(country: &str, year: i32) -> Observation {
        Observation::new(
            country,
            NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
            HashMap::new(),
        )
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec![
                observation("Kenya", 2018),
                observation("Nigeria", 2018),
                observation("Kenya", 2019),
                observation("Kenya", 2021),
                observation("Egypt", 2019),
            ],
            vec![ClimateVariable::Temperature],
        )
    }

    fn criteria(countries: &[&str], range: (i32, i32)) -> FilterCriteria {
        FilterCriteria::new(
            countries.iter().map(|c| c.to_string()).collect::<HashSet<_>>(),
            range,
        )
    }

    #[test]
    fn test_retains_exactly_the_matching_rows() {
        let dataset = sample_dataset();
        let filtered = filter(&dataset, &criteria(&["Kenya"], (2018, 2019)));

        assert_eq!(filtered.len(), 2);
        for obs in filtered.observations() {
            assert_eq!(obs.country, "Kenya");
            assert!((2018..=2019).contains(&obs.year));
        }

        // Completeness: every matching input row appears in the output
        let matching = dataset
            .observations()
            .iter()
            .filter(|obs| obs.country == "Kenya" && (2018..=2019).contains(&obs.year))
            .count();
        assert_eq!(filtered.len(), matching);
    }

    #[test]
    fn test_multiple_countries() {
        let filtered = filter(&sample_dataset(), &criteria(&["Kenya", "Egypt"], (2019, 2019)));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_empty_country_set_yields_empty_result() {
        let filtered = filter(&sample_dataset(), &criteria(&[], (2018, 2021)));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_inverted_range_yields_empty_result() {
        let filtered = filter(&sample_dataset(), &criteria(&["Kenya"], (2020, 2018)));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_range_is_inclusive_on_both_ends() {
        let filtered = filter(&sample_dataset(), &criteria(&["Kenya"], (2018, 2021)));
        let years: Vec<i32> = filtered.observations().iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2018, 2019, 2021]);
    }

    #[test]
    fn test_input_is_unchanged_and_order_preserved() {
        let dataset = sample_dataset();
        let before = dataset.clone();
        let filtered = filter(&dataset, &criteria(&["Kenya", "Nigeria", "Egypt"], (2018, 2021)));

        assert_eq!(dataset.observations(), before.observations());
        // Output preserves input order
        let countries: Vec<&str> = filtered
            .observations()
            .iter()
            .map(|o| o.country.as_str())
            .collect();
        assert_eq!(countries, vec!["Kenya", "Nigeria", "Kenya", "Kenya", "Egypt"]);
    }

    #[test]
    fn test_variables_carried_through() {
        let filtered = filter(&sample_dataset(), &criteria(&["Kenya"], (2018, 2021)));
        assert_eq!(filtered.variables(), &[ClimateVariable::Temperature]);
    }
}
