//! HTTP request data models.
//!
//! An [`HttpRequest`] is what the harness hands to a transport after a case
//! record has been resolved: method, final URL, headers, query parameters and
//! one of the supported body encodings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Parses a method name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for methods the harness does not send.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "HEAD" => Some(HttpMethod::HEAD),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One file part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// Path of the file to upload; its file name is sent as the part's file name.
    pub path: PathBuf,
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RequestBody {
    /// No body; only the URL and query parameters are sent.
    #[default]
    None,
    /// JSON document sent with `application/json`.
    Json(Value),
    /// Text fields sent as `multipart/form-data`.
    Form(BTreeMap<String, String>),
    /// Files sent as `multipart/form-data` parts.
    Files(Vec<FilePart>),
}

impl RequestBody {
    /// Returns `true` if there is nothing to send.
    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }
}

/// A fully resolved request ready for a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Unique identifier, used to correlate log lines with a step.
    pub id: String,

    /// HTTP method.
    pub method: HttpMethod,

    /// Target URL with placeholders already resolved.
    pub url: String,

    /// Request headers.
    pub headers: BTreeMap<String, String>,

    /// Query string parameters appended to the URL by the transport.
    pub params: BTreeMap<String, String>,

    /// Request body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Creates a new HttpRequest with no headers, parameters or body.
    pub fn new(id: String, method: HttpMethod, url: String) -> Self {
        Self {
            id,
            method,
            url,
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            body: RequestBody::None,
        }
    }

    /// Sets the request body.
    pub fn set_body(&mut self, body: RequestBody) {
        self.body = body;
    }
}
