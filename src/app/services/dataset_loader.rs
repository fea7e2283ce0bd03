//! Dataset loading and temporal normalization
//!
//! Reads a raw observation table, resolves its schema, parses dates
//! permissively, and drops every row whose date cannot be parsed. The drop
//! is irreversible for the session; [`LoadStats`] records how many rows
//! were lost so the caller can surface it.

use crate::app::models::{Dataset, Observation};
use crate::app::services::schema_resolver::{self, ResolvedSchema};
use crate::constants::{DATE_FORMATS, DATETIME_FORMATS, YEAR_MONTH_FORMATS};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Statistics for a dataset load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Total data records read from the file
    pub total_records: usize,

    /// Observations that survived temporal normalization
    pub observations_loaded: usize,

    /// Rows dropped because their date failed every accepted format
    pub dropped_dates: usize,

    /// Rows skipped for reasons other than the date (malformed CSV records)
    pub records_skipped: usize,

    /// Per-record error messages for debugging
    pub errors: Vec<String>,
}

impl LoadStats {
    /// Create empty load statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} of {} records ({} dropped for unparseable dates, {} skipped)",
            self.observations_loaded, self.total_records, self.dropped_dates, self.records_skipped
        )
    }
}

/// Loader for observation tables in CSV format
#[derive(Debug, Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self
    }

    /// Load a dataset from a file path
    pub fn load_path(&self, path: &Path) -> Result<(Dataset, LoadStats)> {
        info!("Loading dataset: {}", path.display());

        let file = File::open(path).map_err(|e| {
            Error::load(
                path.display().to_string(),
                "failed to open file",
                Some(Box::new(e)),
            )
        })?;

        self.load_reader(file, &path.display().to_string())
    }

    /// Load a dataset from any reader
    ///
    /// `source` names the input in error messages and logs.
    pub fn load_reader<R: io::Read>(&self, reader: R, source: &str) -> Result<(Dataset, LoadStats)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers().map_err(|e| {
            Error::load(source, "failed to read CSV header row", Some(Box::new(e)))
        })?;

        let schema = schema_resolver::resolve(headers)?;
        if !schema.has_variables() {
            warn!("No climate variable columns found in {}", source);
        }

        let mut stats = LoadStats::new();
        let mut observations = Vec::new();

        for result in csv_reader.records() {
            stats.total_records += 1;

            match result {
                Ok(record) => match parse_observation(&record, &schema) {
                    Some(observation) => {
                        observations.push(observation);
                        stats.observations_loaded += 1;
                    }
                    None => {
                        stats.dropped_dates += 1;
                        debug!(
                            "Dropped record {}: unparseable or missing date",
                            stats.total_records
                        );
                    }
                },
                Err(e) => {
                    stats.records_skipped += 1;
                    stats
                        .errors
                        .push(format!("CSV parse error at record {}: {}", stats.total_records, e));
                }
            }
        }

        if stats.dropped_dates > 0 {
            warn!(
                "{} row(s) dropped for unparseable dates; they are not recoverable this session",
                stats.dropped_dates
            );
        }
        info!("{}", stats.summary());

        let dataset = Dataset::new(observations, schema.variables());
        Ok((dataset, stats))
    }
}

/// Parse one data record into an observation
///
/// Returns `None` when the date field is absent, empty, or fails every
/// accepted format; such rows are dropped before the rest of the pipeline.
/// Climate fields that are empty or non-numeric become null measurements.
fn parse_observation(record: &StringRecord, schema: &ResolvedSchema) -> Option<Observation> {
    let date_value = record.get(schema.date_index)?.trim();
    let date = parse_observation_date(date_value)?;

    let country = record
        .get(schema.country_index)
        .map(|value| value.trim().to_string())
        .unwrap_or_default();

    let mut measurements = HashMap::new();
    for (variable, index) in &schema.variable_indices {
        if let Some(value) = parse_measurement(record, *index) {
            measurements.insert(*variable, value);
        }
    }

    Some(Observation::new(country, date, measurements))
}

/// Parse a climate measurement field, treating blanks and junk as null
fn parse_measurement(record: &StringRecord, index: usize) -> Option<f64> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Permissive date parsing for the temporal normalizer
///
/// Tries plain dates, datetimes (time discarded), RFC 3339 timestamps, and
/// year-month forms (first of month). Returns `None` when nothing matches.
pub fn parse_observation_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    for (suffix, format) in YEAR_MONTH_FORMATS {
        let with_day = format!("{}{}", trimmed, suffix);
        if let Ok(date) = NaiveDate::parse_from_str(&with_day, format) {
            return Some(date);
        }
    }

    None
}

// =============================================================================
// Process-Lifetime Load Cache
// =============================================================================

/// Identity of a file's content, used to decide cache validity
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    modified: Option<SystemTime>,
    len: u64,
}

impl CacheKey {
    fn for_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            Error::load(
                path.display().to_string(),
                "failed to read file metadata",
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: CacheKey,
    dataset: Arc<Dataset>,
    stats: LoadStats,
}

/// Loader with an explicit once-per-process cache
///
/// Entries are keyed by canonical path and validated against the file's
/// modification time and size; a change in either invalidates the entry
/// and reloads. Observable behavior is identical with or without the
/// cache.
#[derive(Debug, Default)]
pub struct CachedLoader {
    loader: DatasetLoader,
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl CachedLoader {
    /// Create an empty cached loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset, reusing the cached copy while the file is unchanged
    pub fn load(&self, path: &Path) -> Result<(Arc<Dataset>, LoadStats)> {
        let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let key = CacheKey::for_path(&canonical)?;

        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(entry) = entries.get(&canonical) {
            if entry.key == key {
                debug!("Dataset cache hit: {}", canonical.display());
                return Ok((Arc::clone(&entry.dataset), entry.stats.clone()));
            }
            debug!("Dataset cache invalidated: {}", canonical.display());
        }

        let (dataset, stats) = self.loader.load_path(&canonical)?;
        let dataset = Arc::new(dataset);
        entries.insert(
            canonical,
            CacheEntry {
                key,
                dataset: Arc::clone(&dataset),
                stats: stats.clone(),
            },
        );

        Ok((dataset, stats))
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }
}
