//! A single test case as read from a case source.

use crate::variables::value_to_string;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of a case source.
///
/// Column names are camelCase. Every column is optional; text columns accept
/// any scalar and keep its string form, since sources may hand over numbers or
/// booleans where text is meant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Identifier used in reports.
    #[serde(default)]
    pub case_id: Value,

    /// Human readable title. Also names the cached response.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub method: String,

    /// Request URL, possibly containing `${name}` placeholders.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,

    #[serde(default)]
    pub headers: Value,

    #[serde(default)]
    pub params: Value,

    /// How `data` is sent: `json`, `form`, `file`, or empty for no body.
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_type: String,

    #[serde(default)]
    pub data: Value,

    #[serde(default, deserialize_with = "lenient_status")]
    pub expected_status: Option<u16>,

    /// JSONPath or regex checked against the response body.
    #[serde(default, deserialize_with = "lenient_string")]
    pub assert_exp: String,

    #[serde(default)]
    pub expected_value: Value,

    /// Mapping of variable name to extraction expression.
    #[serde(default)]
    pub extract: Value,

    /// The step passes only if the request itself errors.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub expect_failure: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub skip: bool,
}

impl CaseRecord {
    /// Label used in logs and reports: the case id if present, else the title.
    pub fn label(&self) -> String {
        match &self.case_id {
            Value::Null => self.title.clone(),
            id if self.title.is_empty() => value_to_string(id),
            id => format!("{} {}", value_to_string(id), self.title),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        other => value_to_string(&other).trim().to_string(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid status code {}", value))),
        Value::String(s) => s
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid status code '{}'", s))),
        _ => Err(D::Error::custom(format!("invalid status code {}", value))),
    }
}
