//! Shared helpers for CLI commands
//!
//! Logging setup, configuration layering, dataset loading through the
//! process-lifetime cache, and output writing used by every subcommand.

use crate::app::models::Dataset;
use crate::app::services::dataset_loader::{CachedLoader, DatasetLoader, LoadStats};
use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Set up tracing output on stderr so stdout stays clean for CSV/JSON
pub fn setup_logging(common: &CommonArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("climate_trend={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    // Color codes in a redirected artifact would corrupt it
    if common.output.is_some() {
        colored::control::set_override(false);
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration, layering the optional file over defaults
pub fn load_configuration(common: &CommonArgs) -> Result<Config> {
    let config = Config::load(common.config_file.as_deref())?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// The input path to load: CLI override, else the configured dataset
pub fn resolve_input_path(common: &CommonArgs, config: &Config) -> PathBuf {
    common
        .input
        .clone()
        .unwrap_or_else(|| config.dataset_path.clone())
}

/// Process-lifetime dataset cache, shared across commands in one run
static CACHED_LOADER: OnceLock<CachedLoader> = OnceLock::new();

/// Load the dataset named by the CLI/config, honoring the cache setting
pub fn load_dataset(common: &CommonArgs, config: &Config) -> Result<(Arc<Dataset>, LoadStats)> {
    let path = resolve_input_path(common, config);

    let (dataset, stats) = if config.cache_enabled {
        CACHED_LOADER.get_or_init(CachedLoader::new).load(&path)?
    } else {
        let (dataset, stats) = DatasetLoader::new().load_path(&path)?;
        (Arc::new(dataset), stats)
    };

    info!("Dataset ready: {} observation(s)", dataset.len());
    Ok((dataset, stats))
}

/// Write rendered content to the output file, or stdout when none is set
pub fn write_output(common: &CommonArgs, content: &str) -> Result<()> {
    match &common.output {
        Some(path) => {
            std::fs::write(path, content).map_err(|e| {
                Error::io(format!("failed to write output file {}", path.display()), e)
            })?;
            info!("Wrote output to {}", path.display());
            Ok(())
        }
        None => {
            if content.ends_with('\n') {
                print!("{}", content);
            } else {
                println!("{}", content);
            }
            Ok(())
        }
    }
}
