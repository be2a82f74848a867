//! Integration tests module for the API harness
//!
//! Shared helpers for tests that drive the harness against a local mock
//! server.

pub mod end_to_end_test;
pub mod properties_test;
pub mod request_chaining_test;

use api_harness::config::HostConfig;
use api_harness::executor::{ExecutionConfig, HttpTransport};
use api_harness::runner::Runner;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Runner with a real HTTP transport whose `api_host` points at `base_url`.
pub fn http_runner(base_url: &str) -> Runner<HttpTransport> {
    init_test_env();

    let mut hosts = HostConfig::new();
    hosts.insert("api_host", base_url);

    let transport = HttpTransport::new().expect("Failed to create transport");
    Runner::new(transport, hosts, ExecutionConfig::new(5))
}
