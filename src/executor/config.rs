//! HTTP request execution configuration.

use crate::config::get_config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters that control how requests are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in seconds.
    ///
    /// Maximum time to wait for a complete response, including connection,
    /// headers, and body download.
    pub timeout_secs: u64,
}

impl ExecutionConfig {
    /// Creates a new ExecutionConfig with the given timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_secs` - Timeout duration in seconds
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Returns the timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Creates an ExecutionConfig from the global harness configuration.
    pub fn from_global_config() -> Self {
        Self::new(get_config().timeout)
    }
}

impl Default for ExecutionConfig {
    /// Reads the timeout from the global configuration.
    fn default() -> Self {
        Self::from_global_config()
    }
}
