//! Application constants for the climate trend pipeline
//!
//! This module contains the alias tables for schema resolution, the accepted
//! date formats for temporal normalization, and default values used
//! throughout the application.

// =============================================================================
// Canonical Schema and Column Aliases
// =============================================================================

/// Canonical name of the observation date column after resolution
pub const CANONICAL_DATE_COLUMN: &str = "date";

/// Canonical name of the geographic entity column after resolution
pub const CANONICAL_COUNTRY_COLUMN: &str = "country";

/// Accepted date column aliases, highest priority first
pub const DATE_ALIASES: &[&str] = &["date", "recorded_date", "observation_date", "year_month"];

/// Accepted location column aliases, highest priority first
pub const LOCATION_ALIASES: &[&str] = &["country", "nation", "location", "region"];

// =============================================================================
// Date Parsing
// =============================================================================

/// Plain date formats tried in order during temporal normalization
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y%m%d"];

/// Datetime formats whose time-of-day component is discarded
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Year-month formats; the day is taken as the first of the month.
/// Stored as (suffix appended to the input, full format used to parse it).
pub const YEAR_MONTH_FORMATS: &[(&str, &str)] = &[("-01", "%Y-%m-%d"), ("/01", "%Y/%m/%d")];

// =============================================================================
// Forecasting
// =============================================================================

/// Minimum number of yearly aggregate points a trend fit requires
pub const MIN_TREND_POINTS: usize = 2;

/// Default bound on how many years past the last observation a forecast
/// may extend. Policy enforced by the CLI, not by the forecaster itself.
pub const DEFAULT_MAX_HORIZON_YEARS: i32 = 20;

// =============================================================================
// Defaults and File Locations
// =============================================================================

/// Bundled dataset used when no input override is given
pub const DEFAULT_DATASET_FILE: &str = "africa_climate_environmental_data.csv";

/// Directory under the platform config dir holding the config file
pub const CONFIG_DIR_NAME: &str = "climate-trend";

/// Config file name within the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of the forecast value column in exported forecast series
pub const FORECAST_COLUMN_PREFIX: &str = "forecast_";
