//! Configuration schema for the harness.
//!
//! This module defines the configuration structure and validation logic for
//! the settings read from `harness.yaml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the harness.
///
/// Every field has a default, so a partial (or absent) configuration file is
/// valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Request timeout in seconds.
    ///
    /// Passed to the transport for every request. Defaults to 10. Must be
    /// greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// YAML file holding the `Host` mapping used for URL placeholders.
    ///
    /// Defaults to `config/hosts.yaml`. A missing file means no hosts.
    #[serde(default = "default_hosts_file")]
    pub hosts_file: PathBuf,

    /// Column that receives the step outcome when results are written back.
    #[serde(default = "default_result_column")]
    pub result_column: String,

    /// Whether step outcomes are written back into the case source.
    #[serde(default)]
    pub write_results: bool,

    /// Whether decoded bodies of successful responses are kept in the store
    /// as `response_<title>`.
    #[serde(default)]
    pub cache_responses: bool,

    /// Directory searched for case files when no path is given.
    #[serde(default = "default_case_dir")]
    pub case_dir: PathBuf,

    /// File extensions treated as case files during discovery.
    #[serde(default = "default_case_extensions")]
    pub case_extensions: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            hosts_file: default_hosts_file(),
            result_column: default_result_column(),
            write_results: false,
            cache_responses: false,
            case_dir: default_case_dir(),
            case_extensions: default_case_extensions(),
        }
    }
}

impl HarnessConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a description of the
    /// first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.result_column.trim().is_empty() {
            return Err("resultColumn must not be empty".to_string());
        }

        if let Some(ext) = self.case_extensions.iter().find(|ext| !ext.starts_with('.')) {
            return Err(format!("caseExtensions entry '{}' must start with '.'", ext));
        }

        Ok(())
    }

    /// Merges another configuration over this one.
    ///
    /// Fields of `other` that differ from the defaults win.
    pub fn merge(&self, other: &HarnessConfig) -> HarnessConfig {
        let defaults = HarnessConfig::default();
        let mut merged = self.clone();

        if other.timeout != defaults.timeout {
            merged.timeout = other.timeout;
        }
        if other.hosts_file != defaults.hosts_file {
            merged.hosts_file = other.hosts_file.clone();
        }
        if other.result_column != defaults.result_column {
            merged.result_column = other.result_column.clone();
        }
        if other.write_results != defaults.write_results {
            merged.write_results = other.write_results;
        }
        if other.cache_responses != defaults.cache_responses {
            merged.cache_responses = other.cache_responses;
        }
        if other.case_dir != defaults.case_dir {
            merged.case_dir = other.case_dir.clone();
        }
        if other.case_extensions != defaults.case_extensions {
            merged.case_extensions = other.case_extensions.clone();
        }

        merged
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_hosts_file() -> PathBuf {
    PathBuf::from("config/hosts.yaml")
}

fn default_result_column() -> String {
    "result".to_string()
}

fn default_case_dir() -> PathBuf {
    PathBuf::from("test-data")
}

fn default_case_extensions() -> Vec<String> {
    vec![".json".to_string(), ".yaml".to_string(), ".yml".to_string()]
}
