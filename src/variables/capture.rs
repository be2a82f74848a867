//! Capturing response values into the variable store.
//!
//! A case declares captures as a mapping from variable name to extraction
//! expression:
//!
//! ```text
//! extract: {"authToken": "$.token", "orderId": "order-(\\d+)"}
//! ```
//!
//! JSON bodies are queried with the JSONPath and the first match is stored with
//! its JSON type. Text bodies are searched with the regex; the first capture
//! group is stored if the pattern has one, otherwise the whole match.

use super::VariableStore;
use crate::assertion::{extract_value, AssertionError, MatchSpan};
use crate::response::ResponseBody;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Variable names must be usable as URL placeholders.
static VARIABLE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile variable name regex"));

/// A single capture: where to store, and what to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDirective {
    /// Name of the variable receiving the captured value.
    pub variable_name: String,

    /// JSONPath or regex, depending on the response body.
    pub expression: String,
}

impl CaptureDirective {
    /// Creates a new CaptureDirective.
    pub fn new(variable_name: String, expression: String) -> Self {
        Self {
            variable_name,
            expression,
        }
    }
}

/// Reads capture directives from a case's `extract` value.
///
/// Directives keep the order in which the case declares them. Only a mapping
/// of names to string expressions is understood. Entries with an
/// invalid variable name or a non-string expression are skipped with a
/// warning; a non-mapping value yields no directives.
pub fn parse_capture_directives(extract: &Value) -> Vec<CaptureDirective> {
    let Some(map) = extract.as_object() else {
        if !extract.is_null() {
            warn!("ignoring extract value that is not a mapping: {}", extract);
        }
        return Vec::new();
    };

    map.iter()
        .filter_map(|(name, expression)| {
            if !validate_variable_name(name) {
                warn!(variable = %name, "ignoring capture with invalid variable name");
                return None;
            }
            match expression.as_str() {
                Some(expr) if !expr.trim().is_empty() => {
                    Some(CaptureDirective::new(name.clone(), expr.trim().to_string()))
                }
                _ => {
                    warn!(variable = %name, "ignoring capture without a string expression");
                    None
                }
            }
        })
        .collect()
}

/// Returns `true` if `name` can be referenced as `${name}`.
pub fn validate_variable_name(name: &str) -> bool {
    VARIABLE_NAME_REGEX.is_match(name)
}

/// Evaluates each directive against `body` and stores the results.
///
/// Stops at the first directive that cannot be satisfied; values captured by
/// earlier directives stay in the store. Returns the number of stored values.
pub fn apply_captures(
    directives: &[CaptureDirective],
    body: &ResponseBody,
    store: &mut VariableStore,
) -> Result<usize, AssertionError> {
    for directive in directives {
        let value = extract_value(body, &directive.expression, MatchSpan::FirstGroup)?;
        debug!(variable = %directive.variable_name, value = %value, "captured response value");
        store.set(directive.variable_name.clone(), value);
    }
    Ok(directives.len())
}
