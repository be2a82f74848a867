//! HTTP request executor.
//!
//! The harness talks to the network through the [`Transport`] trait. Given a
//! resolved [`HttpRequest`] it returns the status code, headers and raw body,
//! or a [`RequestError`] if no response was obtained. [`HttpTransport`] is the
//! implementation backed by a blocking `reqwest` client; tests substitute
//! their own.

pub mod config;
pub mod error;

pub use config::ExecutionConfig;
pub use error::RequestError;

use crate::models::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use std::collections::HashMap;
use std::fs;
use std::time::Instant;
use tracing::debug;

/// Sends requests and returns responses.
pub trait Transport {
    /// Sends `request` and waits for the complete response.
    ///
    /// Any status code is a response; only failures to obtain one are errors.
    fn send(
        &self,
        request: &HttpRequest,
        config: &ExecutionConfig,
    ) -> Result<HttpResponse, RequestError>;
}

/// Transport built on a blocking `reqwest` client.
///
/// The client keeps a connection pool, so one instance should be shared by all
/// steps of a run.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a fresh client.
    ///
    /// # Returns
    ///
    /// `Err(RequestError::BuildError)` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, RequestError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RequestError::BuildError(e.to_string()))?;
        Ok(Self { client })
    }

    fn build(&self, request: &HttpRequest, config: &ExecutionConfig) -> Result<RequestBuilder, RequestError> {
        let method = match request.method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::HEAD => reqwest::Method::HEAD,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(config.timeout_duration());

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => {
                let form = fields
                    .iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name.clone(), value.clone()));
                builder.multipart(form)
            }
            RequestBody::Files(parts) => builder.multipart(file_form(parts)?),
        };

        Ok(builder)
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &HttpRequest,
        config: &ExecutionConfig,
    ) -> Result<HttpResponse, RequestError> {
        validate_url(&request.url)?;

        let builder = self.build(request, config)?;
        let start_time = Instant::now();

        debug!(id = %request.id, method = %request.method, url = %request.url, "sending request");
        let response = builder.send()?;

        let status = response.status();
        let mut http_response = HttpResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown").to_string(),
        );

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_string(), value_str.to_string());
            }
        }
        http_response.headers = headers;

        http_response.body = response.bytes()?.to_vec();
        http_response.duration = start_time.elapsed();

        debug!(
            id = %request.id,
            status = http_response.status_code,
            bytes = http_response.body.len(),
            "received response"
        );

        Ok(http_response)
    }
}

/// Reads every upload file up front so a missing file is reported by path.
fn file_form(parts: &[FilePart]) -> Result<Form, RequestError> {
    parts.iter().try_fold(Form::new(), |form, part| {
        let bytes = fs::read(&part.path).map_err(|source| RequestError::FileRead {
            path: part.path.clone(),
            source,
        })?;

        let file_name = part
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| part.field.clone());

        Ok(form.part(part.field.clone(), Part::bytes(bytes).file_name(file_name)))
    })
}

/// Validates that the URL is well-formed and uses a supported protocol.
///
/// # Returns
///
/// `Ok(())` if the URL is valid, or `Err(RequestError)` if invalid.
pub fn validate_url(url: &str) -> Result<(), RequestError> {
    let parsed = url::Url::parse(url)?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RequestError::UnsupportedProtocol(format!(
            "Only HTTP and HTTPS are supported, got: {}",
            scheme
        )));
    }

    Ok(())
}
