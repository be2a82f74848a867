//! Assertions against HTTP responses.
//!
//! Two kinds of problems come out of this module and callers must keep them
//! apart:
//!
//! - **Failures** ([`ErrorKind::Failure`]): the response did not meet the
//!   expectation. The step fails, the run goes on.
//! - **Usage errors** ([`ErrorKind::Usage`]): the expectation cannot be
//!   evaluated at all, e.g. a JSONPath against a binary body or a malformed
//!   regex. These point at a defect in the test case itself.

pub mod extract;

pub use extract::{extract_value, jsonpath_values, regex_search, MatchSpan};

use crate::models::HttpResponse;
use crate::response::{classify, BodyShape, ResponseBody};
use crate::variables::value_to_string;
use serde_json::Value;
use thiserror::Error;

/// Category of an [`AssertionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The response did not match the expectation.
    Failure,
    /// The expectation is not applicable to this response.
    Usage,
}

/// Errors produced while checking a response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssertionError {
    #[error("expected status code {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("regex '{pattern}' found no match in the response")]
    NoRegexMatch { pattern: String },

    #[error("JSONPath '{path}' found no match in the response")]
    NoJsonPathMatch { path: String },

    #[error("extracted value {actual} does not equal expected value {expected}")]
    ValueMismatch { actual: Value, expected: Value },

    #[error("value extraction is not supported for {0} responses")]
    UnsupportedShape(BodyShape),

    #[error("invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("invalid JSONPath '{path}': {reason}")]
    InvalidJsonPath { path: String, reason: String },
}

impl AssertionError {
    /// Returns whether this is a test failure or a usage error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssertionError::StatusMismatch { .. }
            | AssertionError::NoRegexMatch { .. }
            | AssertionError::NoJsonPathMatch { .. }
            | AssertionError::ValueMismatch { .. } => ErrorKind::Failure,
            AssertionError::UnsupportedShape(_)
            | AssertionError::InvalidRegex { .. }
            | AssertionError::InvalidJsonPath { .. } => ErrorKind::Usage,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Failure`.
    pub fn is_failure(&self) -> bool {
        self.kind() == ErrorKind::Failure
    }
}

/// Asserts that the response carries exactly the expected status code.
pub fn assert_status_code(response: &HttpResponse, expected: u16) -> Result<(), AssertionError> {
    if response.status_code == expected {
        Ok(())
    } else {
        Err(AssertionError::StatusMismatch {
            expected,
            actual: response.status_code,
        })
    }
}

/// Asserts a value inside the response body.
///
/// The response is classified first; the expression is then applied according
/// to the resulting shape:
///
/// - text: `expression` is a regex. The whole matched span of the first match
///   must equal the string form of `expected`.
/// - JSON: `expression` is a JSONPath. The first match must equal `expected`
///   (deep equality); further matches are ignored.
///
/// Any other shape yields [`AssertionError::UnsupportedShape`].
///
/// # Examples
///
/// ```
/// use api_harness::assertion::assert_body_value;
/// use api_harness::models::HttpResponse;
/// use serde_json::json;
///
/// let mut response = HttpResponse::new(200, "OK".to_string());
/// response.add_header("Content-Type".to_string(), "application/json".to_string());
/// response.set_body(br#"{"id": 1, "name": "x"}"#.to_vec());
///
/// assert!(assert_body_value(&response, "$.id", &json!(1)).is_ok());
/// assert!(assert_body_value(&response, "$.missing", &json!(1)).is_err());
/// ```
pub fn assert_body_value(
    response: &HttpResponse,
    expression: &str,
    expected: &Value,
) -> Result<(), AssertionError> {
    assert_classified_value(&classify(response), expression, expected)
}

/// Same as [`assert_body_value`] for an already classified body.
pub fn assert_classified_value(
    body: &ResponseBody,
    expression: &str,
    expected: &Value,
) -> Result<(), AssertionError> {
    let actual = extract_value(body, expression, MatchSpan::Whole)?;

    let matches = match (&actual, body) {
        (Value::String(matched), ResponseBody::Text(_)) => *matched == value_to_string(expected),
        _ => actual == *expected,
    };

    if matches {
        Ok(())
    } else {
        Err(AssertionError::ValueMismatch {
            actual,
            expected: expected.clone(),
        })
    }
}
