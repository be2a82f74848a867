//! Configuration management for the harness.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from a YAML file (`harness.yaml` by default) and merged with defaults.
//! Host definitions used for URL placeholders live in their own file, see [`HostConfig`].

pub mod hosts;
pub mod schema;
pub mod yaml;

pub use hosts::HostConfig;
pub use schema::HarnessConfig;
pub use yaml::{read_yaml, write_yaml};

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Default location of the harness configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "harness.yaml";

/// Errors raised while loading or writing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Global configuration instance.
///
/// This is lazily initialized on first access and can be updated at runtime.
static CONFIG: Lazy<RwLock<HarnessConfig>> = Lazy::new(|| RwLock::new(HarnessConfig::default()));

/// Loads configuration from a YAML file.
///
/// The file contents are merged over the defaults, validated, and stored as the
/// global configuration.
///
/// # Arguments
///
/// * `path` - Configuration file to read, or `None` to use defaults only
///
/// # Returns
///
/// `Ok(HarnessConfig)` with the loaded configuration, or `Err` if the file
/// exists but cannot be read, or the result fails validation. A missing file
/// means defaults; a file that is not valid configuration YAML is logged and
/// the defaults are used.
///
/// # Example
///
/// ```no_run
/// use api_harness::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Some(Path::new("harness.yaml"))).unwrap();
/// println!("timeout: {}s", config.timeout);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    let mut config = HarnessConfig::default();

    if let Some(path) = path.filter(|p| p.exists()) {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match serde_yaml::from_str::<HarnessConfig>(&content) {
            Ok(user_config) => {
                config = config.merge(&user_config);
                debug!(path = %path.display(), "loaded harness configuration");
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse harness configuration, using defaults"
                );
            }
        }
    }

    config.validate().map_err(ConfigError::Invalid)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets the current global configuration.
///
/// Returns a clone of the current configuration, or the defaults if nothing
/// has been loaded yet.
pub fn get_config() -> HarnessConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| HarnessConfig::default())
}

/// Updates the global configuration in place.
///
/// If the updated configuration fails validation it is reset to defaults.
///
/// # Example
///
/// ```no_run
/// use api_harness::config::update_config;
///
/// update_config(|config| {
///     config.timeout = 30;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut HarnessConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            warn!(error = %e, "configuration invalid after update, reverting to defaults");
            *config = HarnessConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = HarnessConfig::default();
    }
}
