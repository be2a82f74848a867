//! Placeholder resolution for request URLs and request data.
//!
//! Placeholders use the `${name}` syntax, where `name` matches `[a-zA-Z0-9_]+`.
//! There are two entry points with different lookup rules:
//!
//! - [`resolve_url`] consults the host configuration first and the variable
//!   store second, and always produces a string.
//! - [`resolve_data`] consults the variable store only and replaces whole
//!   placeholder leaves with the stored value, keeping its type.
//!
//! Resolution is best-effort in both cases: a placeholder nobody can resolve is
//! left in the output verbatim.

use super::VariableStore;
use crate::config::HostConfig;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Cached regex pattern for matching `${name}` placeholders.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([a-zA-Z0-9_]+)\}").expect("Failed to compile placeholder regex")
});

/// Resolves every `${name}` placeholder in a URL.
///
/// Each distinct name is looked up once: in `hosts` first, then in `store`.
/// Every occurrence of a resolved placeholder is replaced with the value's
/// string form; unresolved placeholders stay as they are. Inserted values are
/// not scanned again.
///
/// # Examples
///
/// ```
/// use api_harness::config::HostConfig;
/// use api_harness::variables::{resolve_url, VariableStore};
///
/// let mut hosts = HostConfig::new();
/// hosts.insert("host", "example.com");
///
/// let mut store = VariableStore::new();
/// store.set("host", "wrong.com");
/// store.set("id", 7);
///
/// let url = resolve_url("https://${host}/users/${id}/${missing}", &hosts, &store);
/// assert_eq!(url, "https://example.com/users/7/${missing}");
/// ```
pub fn resolve_url(url: &str, hosts: &HostConfig, store: &VariableStore) -> String {
    if !url.contains("${") {
        return url.to_string();
    }

    let mut replacements: HashMap<&str, Option<String>> = HashMap::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(url) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        replacements.entry(name).or_insert_with(|| {
            let resolved = hosts
                .get(name)
                .or_else(|| store.lookup(name))
                .map(value_to_string);
            if resolved.is_none() {
                debug!(placeholder = name, "URL placeholder left unresolved");
            }
            resolved
        });
    }

    PLACEHOLDER_REGEX
        .replace_all(url, |caps: &Captures| {
            match replacements.get(&caps[1]) {
                Some(Some(value)) => value.clone(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Resolves placeholder leaves of a nested mapping in place.
///
/// A leaf is a placeholder when it is a string that starts with `${` and ends
/// with `}`; the text in between is the variable name. Only the variable store
/// is consulted. A hit replaces the leaf with the stored value (numbers stay
/// numbers, objects stay objects); a miss keeps the original string.
///
/// Nested mappings are walked recursively. Arrays are treated as leaves, and a
/// top-level value that is not a mapping is left untouched.
///
/// # Examples
///
/// ```
/// use api_harness::variables::{resolve_data, VariableStore};
/// use serde_json::json;
///
/// let mut store = VariableStore::new();
/// store.set("x", 1);
/// store.set("y", "z");
///
/// let mut data = json!({"a": "${x}", "b": {"c": "${y}"}});
/// resolve_data(&mut data, &store);
/// assert_eq!(data, json!({"a": 1, "b": {"c": "z"}}));
/// ```
pub fn resolve_data(data: &mut Value, store: &VariableStore) {
    if let Value::Object(map) = data {
        resolve_map(map, store);
    }
}

fn resolve_map(map: &mut Map<String, Value>, store: &VariableStore) {
    for value in map.values_mut() {
        if let Value::Object(nested) = value {
            resolve_map(nested, store);
            continue;
        }

        let replacement = value
            .as_str()
            .and_then(placeholder_name)
            .and_then(|name| store.lookup(name))
            .cloned();

        match replacement {
            Some(resolved) => *value = resolved,
            None => {
                if let Some(name) = value.as_str().and_then(placeholder_name) {
                    debug!(placeholder = name, "data placeholder left unresolved");
                }
            }
        }
    }
}

/// Extracts the variable name from a whole-value placeholder such as `${token}`.
fn placeholder_name(text: &str) -> Option<&str> {
    text.strip_prefix("${")?.strip_suffix('}')
}

/// Converts a JSON value to the string used when splicing it into text.
///
/// - Strings: returned as-is (without quotes)
/// - Numbers, booleans, null: their JSON spelling
/// - Objects, arrays: compact JSON
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
