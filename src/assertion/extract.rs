//! Value extraction from classified response bodies.
//!
//! JSON bodies are queried with JSONPath (RFC 9535, via `serde_json_path`);
//! text bodies are searched with a regular expression. Which of the two applies
//! is decided by the body, never by the caller.

use super::AssertionError;
use crate::response::ResponseBody;
use regex::Regex;
use serde_json::Value;
use serde_json_path::JsonPath;

/// How a regex match on a text body turns into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSpan {
    /// The entire matched span. Used by value assertions.
    Whole,
    /// The first capture group if the pattern has one, else the whole match.
    /// Used by captures.
    FirstGroup,
}

/// Runs a JSONPath query and returns all matches in document order.
pub fn jsonpath_values<'a>(document: &'a Value, path: &str) -> Result<Vec<&'a Value>, AssertionError> {
    let query = JsonPath::parse(path).map_err(|e| AssertionError::InvalidJsonPath {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(query.query(document).all())
}

/// Searches text with a regex and returns the selected span of the first match.
pub fn regex_search(text: &str, pattern: &str, span: MatchSpan) -> Result<Option<String>, AssertionError> {
    let re = Regex::new(pattern).map_err(|e| AssertionError::InvalidRegex {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };

    let selected = match span {
        MatchSpan::Whole => caps.get(0),
        MatchSpan::FirstGroup => caps.get(1).or_else(|| caps.get(0)),
    };
    Ok(selected.map(|m| m.as_str().to_string()))
}

/// Extracts a single value from a classified body.
///
/// - JSON object: the first JSONPath match. Arrays and scalars at the top
///   level are not queried.
/// - Text: the regex match selected by `span`, as a JSON string.
///
/// Returns [`AssertionError::NoJsonPathMatch`] / [`AssertionError::NoRegexMatch`]
/// when nothing matches, and [`AssertionError::UnsupportedShape`] for every
/// other body shape.
pub fn extract_value(body: &ResponseBody, expression: &str, span: MatchSpan) -> Result<Value, AssertionError> {
    match body {
        ResponseBody::Text(text) => regex_search(text, expression, span)?
            .map(Value::String)
            .ok_or_else(|| AssertionError::NoRegexMatch {
                pattern: expression.to_string(),
            }),
        ResponseBody::Json(Some(document @ Value::Object(_))) => jsonpath_values(document, expression)?
            .first()
            .map(|value| (*value).clone())
            .ok_or_else(|| AssertionError::NoJsonPathMatch {
                path: expression.to_string(),
            }),
        other => Err(AssertionError::UnsupportedShape(other.shape())),
    }
}
