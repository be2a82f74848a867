//! Runtime variable store.
//!
//! Values captured from responses (and values set explicitly by a runner) live
//! here for the rest of a test run. Later steps read them back through
//! placeholder resolution.
//!
//! The store is a plain owned value. It is meant to be created once per run and
//! passed by reference into every resolution and capture call; it provides no
//! synchronization, so a run must drive it from a single thread. Sharing one
//! store between parallel workers would need per-key atomic read-modify-write
//! or a store per worker.

use serde_json::Value;
use std::collections::HashMap;

/// Key/value mapping of captured variables.
///
/// Writes are last-write-wins and entries never expire; they are removed only
/// by [`VariableStore::remove`] or [`VariableStore::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    entries: HashMap<String, Value>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Gets a variable by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Gets a variable by name, falling back to `default` when it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_harness::variables::VariableStore;
    /// use serde_json::json;
    ///
    /// let mut store = VariableStore::new();
    /// store.set("token", "abc");
    ///
    /// assert_eq!(store.get_or("token", json!("none")), json!("abc"));
    /// assert_eq!(store.get_or("missing", json!("none")), json!("none"));
    /// ```
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    /// Looks up a variable for placeholder resolution.
    ///
    /// A stored `null` counts as unset, so a placeholder bound to it is left
    /// in place.
    pub(crate) fn lookup(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|value| !value.is_null())
    }

    /// Removes a variable.
    ///
    /// Returns `true` if the key existed and was deleted.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every variable.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns a snapshot copy of all variables.
    ///
    /// The snapshot is independent of the store: mutating it does not affect
    /// stored values.
    pub fn get_all(&self) -> HashMap<String, Value> {
        self.entries.clone()
    }

    /// Returns `true` if the store holds the given key (even if bound to `null`).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no variables are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
