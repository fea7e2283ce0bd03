//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (explicit `--config` path or the platform config directory), then CLI
//! flags applied by the command layer.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATASET_FILE, DEFAULT_MAX_HORIZON_YEARS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for the climate trend pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset read when no `--input` override is given
    pub dataset_path: PathBuf,

    /// Bound on how many years past the last observation a forecast may
    /// extend. Policy applied by the CLI; the forecaster itself enforces
    /// no limit.
    pub max_horizon_years: i32,

    /// Reuse a loaded dataset while its path, mtime, and size are unchanged
    pub cache_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_FILE),
            max_horizon_years: DEFAULT_MAX_HORIZON_YEARS,
            cache_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration, preferring an explicit file over the default
    /// location
    ///
    /// An explicit path that does not exist is a configuration error; a
    /// missing file at the default location silently falls back to
    /// defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::configuration(format!(
                        "config file does not exist: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Self::default_config_path().filter(|path| path.exists()),
        };

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!("invalid config file {}: {}", path.display(), e))
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default config file location under the platform config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Validate settings for consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_horizon_years < 0 {
            return Err(Error::configuration(
                "max_horizon_years must be non-negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Create configuration with a custom dataset path
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Create configuration with a custom forecast horizon bound
    pub fn with_max_horizon_years(mut self, years: i32) -> Self {
        self.max_horizon_years = years;
        self
    }

    /// Disable the dataset load cache
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_FILE));
        assert_eq!(config.max_horizon_years, DEFAULT_MAX_HORIZON_YEARS);
        assert!(config.cache_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::default()
            .with_dataset_path("custom.csv")
            .with_max_horizon_years(5)
            .without_cache();

        assert_eq!(config.dataset_path, PathBuf::from("custom.csv"));
        assert_eq!(config.max_horizon_years, 5);
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_from_file_partial_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_horizon_years = 10").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.max_horizon_years, 10);
        // Unspecified keys keep their defaults
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_FILE));
    }

    #[test]
    fn test_from_file_rejects_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_horizon_years = \"twenty\"").unwrap();

        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let config = Config::default().with_max_horizon_years(-1);
        assert!(config.validate().is_err());
    }
}
