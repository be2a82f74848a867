//! Host configuration for URL placeholders.
//!
//! Hosts live under the `Host` key of a YAML file:
//!
//! ```yaml
//! Host:
//!   api_host: https://api.example.com
//!   auth_host: https://auth.example.com
//! ```
//!
//! Loading never fails. A missing file, unparsable YAML or a document without
//! a `Host` mapping all produce an empty host config, and URL resolution then
//! relies on the variable store alone.

use super::yaml::read_yaml;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Key of the host mapping inside the configuration document.
const HOST_KEY: &str = "Host";

/// Static, read-only mapping of named hosts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostConfig {
    hosts: Map<String, Value>,
}

impl HostConfig {
    /// Creates an empty host config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the `Host` mapping from a YAML file.
    pub fn load(path: &Path) -> Self {
        let Some(document) = read_yaml(path) else {
            warn!(path = %path.display(), "host config unavailable, using empty host config");
            return Self::new();
        };

        let config = Self::from_document(&document);
        debug!(path = %path.display(), hosts = config.len(), "loaded host config");
        config
    }

    /// Extracts the `Host` mapping from an already parsed document.
    pub fn from_document(document: &Value) -> Self {
        match document.get(HOST_KEY) {
            Some(Value::Object(hosts)) => Self {
                hosts: hosts.clone(),
            },
            Some(_) => {
                warn!("'{}' entry is not a mapping, using empty host config", HOST_KEY);
                Self::new()
            }
            None => Self::new(),
        }
    }

    /// Adds or replaces a host entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.hosts.insert(name.into(), value.into());
    }

    /// Looks up a host by name. Entries bound to `null` count as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.hosts.get(name).filter(|value| !value.is_null())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
