//! Climate Trend Library
//!
//! A Rust library for normalizing country-level environmental observation
//! tables and extrapolating climate variables with a least-squares linear
//! trend.
//!
//! This library provides tools for:
//! - Resolving variant column headers onto a canonical schema
//! - Permissive date parsing with per-row year derivation
//! - Country and year-range filtering over immutable datasets
//! - Per-year mean aggregation of climate variables
//! - Degree-1 least-squares fitting and extrapolation to a target year
//! - CSV export of filtered subsets and forecast series

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod csv_export;
        pub mod dataset_loader;
        pub mod filter_engine;
        pub mod forecaster;
        pub mod schema_resolver;
        pub mod summary;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ClimateVariable, Dataset, FilterCriteria, ForecastSeries, Observation, TrendModel,
    YearlyAggregate,
};
pub use config::Config;

/// Result type alias for climate-trend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the climate pipeline
///
/// Every variant is terminal for the operation that raised it: malformed
/// input and insufficient data are not transient conditions, so nothing is
/// retried and nothing falls back to defaults.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input file unreadable or structurally malformed
    #[error("failed to load dataset '{path}': {message}")]
    Load {
        path: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No column matching the date or location aliases
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Requested forecast variable absent from the resolved schema
    #[error("variable '{variable}' not found in dataset (available: {available})")]
    VariableNotFound { variable: String, available: String },

    /// Fewer yearly aggregate points than a trend fit requires
    #[error(
        "insufficient data for trend fit: {points} yearly aggregate point(s), need at least {required}"
    )]
    InsufficientData { points: usize, required: usize },

    /// Invalid CLI or config-file input
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed outside of dataset loading
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },
}

impl Error {
    /// Create a load error with file context
    pub fn load(
        path: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a schema resolution error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a variable-not-found error
    pub fn variable_not_found(variable: impl Into<String>, available: impl Into<String>) -> Self {
        Self::VariableNotFound {
            variable: variable.into(),
            available: available.into(),
        }
    }

    /// Create an insufficient-data error for a trend fit attempt
    pub fn insufficient_data(points: usize) -> Self {
        Self::InsufficientData {
            points,
            required: constants::MIN_TREND_POINTS,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error with context
    pub fn csv(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::Csv {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            message: "CSV processing failed".to_string(),
            source: Some(error),
        }
    }
}
