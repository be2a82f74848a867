//! Turning a case record into a request.

use super::{CaseError, CaseRecord};
use crate::config::HostConfig;
use crate::models::{FilePart, HttpMethod, HttpRequest, RequestBody};
use crate::variables::{resolve_data, resolve_url, value_to_string, VariableStore};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Builds the request described by `case`.
///
/// The URL is resolved against the host config and the store; headers,
/// query parameters and body data are resolved against the store only (a
/// value that is exactly `${name}` is replaced by the stored value).
///
/// The `dataType` column picks the body encoding:
///
/// - `json`: `data` is sent as a JSON document
/// - `form`: `data` must be a mapping; each entry becomes a multipart field
/// - `file`: `data` must map field names to file paths; each file is uploaded
///   as a multipart part
/// - empty: no body
pub fn prepare_request(
    case: &CaseRecord,
    store: &VariableStore,
    hosts: &HostConfig,
) -> Result<HttpRequest, CaseError> {
    let method =
        HttpMethod::parse(&case.method).ok_or_else(|| CaseError::InvalidMethod(case.method.clone()))?;

    if case.url.trim().is_empty() {
        return Err(CaseError::InvalidData {
            column: "url",
            reason: "a request URL is required".to_string(),
        });
    }

    let url = resolve_url(case.url.trim(), hosts, store);
    let mut request = HttpRequest::new(Uuid::new_v4().to_string(), method, url);

    request.headers = string_map("headers", &case.headers, store)?;
    request.params = string_map("params", &case.params, store)?;
    request.set_body(build_body(case, store)?);

    Ok(request)
}

fn build_body(case: &CaseRecord, store: &VariableStore) -> Result<RequestBody, CaseError> {
    let mut data = case.data.clone();
    resolve_data(&mut data, store);

    match case.data_type.to_ascii_lowercase().as_str() {
        "" => Ok(RequestBody::None),
        "json" if data.is_null() => Ok(RequestBody::None),
        "json" => Ok(RequestBody::Json(data)),
        "form" => {
            let fields = flatten_map("data", data)?;
            Ok(RequestBody::Form(fields))
        }
        "file" => {
            let Value::Object(entries) = data else {
                return Err(CaseError::InvalidData {
                    column: "data",
                    reason: "file uploads need a mapping of field names to paths".to_string(),
                });
            };

            entries
                .into_iter()
                .map(|(field, path)| match path {
                    Value::String(path) if !path.trim().is_empty() => Ok(FilePart {
                        field,
                        path: PathBuf::from(path.trim()),
                    }),
                    other => Err(CaseError::InvalidData {
                        column: "data",
                        reason: format!("field '{}' has no file path: {}", field, other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(RequestBody::Files)
        }
        other => Err(CaseError::UnknownDataType(other.to_string())),
    }
}

/// Resolves a mapping column and flattens its values to strings.
fn string_map(
    column: &'static str,
    value: &Value,
    store: &VariableStore,
) -> Result<BTreeMap<String, String>, CaseError> {
    let mut resolved = value.clone();
    resolve_data(&mut resolved, store);
    flatten_map(column, resolved)
}

/// Flattens already-resolved mapping values to strings.
///
/// `null` is treated as an empty mapping; `null` entries are dropped.
fn flatten_map(column: &'static str, value: Value) -> Result<BTreeMap<String, String>, CaseError> {
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(entries) => Ok(entries
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k, value_to_string(&v)))
            .collect()),
        other => Err(CaseError::InvalidData {
            column,
            reason: format!("expected a mapping, got {}", other),
        }),
    }
}
