//! Data-driven HTTP API test harness
//!
//! Test cases are flat records (method, URL, parameters, expectations) read
//! from JSON or YAML case files. A runner sends each request, asserts against
//! the response, and captures values from it for the steps that follow.
//!
//! # Architecture
//!
//! - **variables**: the variable store, `${name}` placeholder resolution, and
//!   capturing response values into the store
//! - **response**: classification of response bodies by content type
//! - **assertion**: JSONPath/regex extraction and status/value assertions
//! - **models**: request and response data structures
//! - **cases**: case records, case files, and request preparation
//! - **executor**: the transport seam and its `reqwest` implementation
//! - **runner**: step execution and reports
//! - **config**: harness settings and host configuration
//!
//! # Pipeline
//!
//! For every case, in order:
//! 1. Placeholders in the URL are resolved against the host config first and
//!    the variable store second; placeholders in headers, parameters and body
//!    data are resolved against the store
//! 2. The request is sent through a [`executor::Transport`]
//! 3. The response body is classified by its `Content-Type` header
//! 4. The status code and an optional body value are asserted
//! 5. Values named in the case's `extract` column are stored for later steps
//!
//! # Example
//!
//! ```no_run
//! use api_harness::cases::CaseRecord;
//! use api_harness::config::{HarnessConfig, HostConfig};
//! use api_harness::executor::{ExecutionConfig, HttpTransport};
//! use api_harness::runner::Runner;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut hosts = HostConfig::new();
//! hosts.insert("api_host", "https://api.example.com");
//!
//! let mut runner = Runner::new(HttpTransport::new()?, hosts, ExecutionConfig::new(10));
//!
//! let login: CaseRecord = serde_json::from_value(json!({
//!     "title": "login",
//!     "method": "POST",
//!     "url": "${api_host}/login",
//!     "dataType": "json",
//!     "data": {"user": "demo", "password": "secret"},
//!     "expectedStatus": 200,
//!     "extract": {"token": "$.token"}
//! }))?;
//!
//! let report = runner.run_case(&login);
//! println!("{}: {}", report.label, report.status);
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod cases;
pub mod config;
pub mod executor;
pub mod models;
pub mod response;
pub mod runner;
pub mod variables;
