//! Request chaining and case file workflow tests
//!
//! These tests run whole case files: values captured by one step feed the
//! placeholders of the next, results are written back to the file, and hosts
//! come from a host file.

use super::{http_runner, init_test_env};
use api_harness::cases::{discover_case_files, open_case_source, CaseFile, CaseSource};
use api_harness::config::{HarnessConfig, HostConfig};
use api_harness::executor::HttpTransport;
use api_harness::runner::{RunOptions, Runner, StepStatus};
use mockito::Matcher;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to write a file into the temp directory
fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

#[test]
fn test_login_token_flows_into_next_request() {
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "secret-xyz", "user": {"id": 42}}"#)
        .create();
    let profile = server
        .mock("GET", "/users/42")
        .match_header("authorization", "secret-xyz")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "ann"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "chain.json",
        r#"[
            {"caseId": 1, "title": "login", "method": "POST", "url": "${api_host}/auth/login",
             "dataType": "json", "data": "{\"user\": \"ann\"}", "expectedStatus": 200,
             "extract": "{\"token\": \"$.token\", \"userId\": \"$.user.id\"}"},
            {"caseId": 2, "title": "profile", "method": "GET", "url": "${api_host}/users/${userId}",
             "headers": {"Authorization": "${token}"}, "expectedStatus": 200,
             "assertExp": "$.name", "expectedValue": "ann"}
        ]"#,
    );

    let mut runner = http_runner(&server.url());
    let report = runner.run_file(&path).unwrap();

    login.assert();
    profile.assert();
    assert_eq!(report.passed(), 2);
    assert!(report.is_success());
}

#[test]
fn test_failed_capture_leaves_placeholder_unresolved() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "bad credentials"}"#)
        .create();
    let unresolved = server
        .mock("GET", Matcher::Regex(r"^/users/\$.*userId".to_string()))
        .with_status(404)
        .create();

    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "chain.yaml",
        "- title: login\n  method: POST\n  url: ${api_host}/auth/login\n  extract:\n    userId: $.user.id\n\
         - title: profile\n  method: GET\n  url: ${api_host}/users/${userId}\n  expectedStatus: 200\n",
    );

    let mut runner = http_runner(&server.url());
    let report = runner.run_file(&path).unwrap();

    assert!(matches!(report.steps[0].status, StepStatus::Failed(_)));
    assert!(matches!(report.steps[1].status, StepStatus::Failed(_)));
    assert!(!runner.store().contains("userId"));
    unresolved.assert();
}

#[test]
fn test_results_written_back_to_case_file() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/ok").with_status(200).create();
    server.mock("GET", "/missing").with_status(404).create();

    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cases.json",
        r#"[
            {"title": "ok", "method": "GET", "url": "${api_host}/ok", "expectedStatus": 200},
            {"title": null, "method": null, "url": null},
            {"title": "missing", "method": "GET", "url": "${api_host}/missing", "expectedStatus": 200},
            {"title": "bad method", "method": "FETCH", "url": "${api_host}/ok"},
            {"title": "later", "method": "GET", "url": "${api_host}/ok", "skip": true}
        ]"#,
    );

    let mut runner = http_runner(&server.url()).with_options(RunOptions {
        write_results: true,
        result_column: "outcome".to_string(),
        ..RunOptions::default()
    });

    let mut source = CaseFile::open(&path).unwrap();
    let report = runner.run_source(&mut source);
    assert_eq!(report.steps.len(), 4);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved[0]["outcome"], json!("PASS"));
    assert_eq!(saved[1].get("outcome"), None);
    assert_eq!(saved[2]["outcome"], json!("FAIL"));
    assert_eq!(saved[3]["outcome"], json!("ERROR"));
    assert_eq!(saved[4]["outcome"], json!("SKIP"));
}

#[test]
fn test_runner_from_config_uses_host_file() {
    init_test_env();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "up"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let hosts_file = write_file(
        &dir,
        "hosts.yaml",
        &format!("Host:\n  api_host: {}\n", server.url()),
    );
    let cases = write_file(
        &dir,
        "health.yml",
        "- title: health\n  method: GET\n  url: ${api_host}/health\n",
    );

    let config = HarnessConfig {
        hosts_file,
        cache_responses: true,
        ..HarnessConfig::default()
    };

    let mut runner = Runner::from_config(HttpTransport::new().unwrap(), &config);
    assert_eq!(runner.hosts().len(), 1);

    let report = runner.run_file(&cases).unwrap();
    mock.assert();
    assert!(report.is_success());
    assert_eq!(
        runner.store().get("response_health"),
        Some(&json!({"status": "up"}))
    );

    runner.teardown();
    assert!(runner.store().is_empty());
}

#[test]
fn test_host_config_wins_over_store() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/ping").with_status(200).create();

    let mut runner = http_runner(&server.url());
    runner.store_mut().set("api_host", "http://127.0.0.1:1");

    let source = json!({"method": "GET", "url": "${api_host}/ping", "expectedStatus": 200});
    let report = runner.run_case(&serde_json::from_value(source).unwrap());

    mock.assert();
    assert_eq!(report.status, StepStatus::Passed);
}

#[test]
fn test_discover_and_open_case_tree() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("orders")).unwrap();
    write_file(&dir, "users.json", r#"[{"title": "a", "method": "GET", "url": "/a"}]"#);
    write_file(&dir, "orders/create.yaml", "- title: b\n  method: POST\n  url: /b\n");
    write_file(&dir, "README.md", "# cases");

    let extensions = HarnessConfig::default().case_extensions;
    let files = discover_case_files(dir.path(), &extensions).unwrap();
    assert_eq!(files.len(), 2);

    let titles: Vec<String> = files
        .values()
        .flatten()
        .flat_map(|path| {
            open_case_source(path)
                .unwrap()
                .records()
                .iter()
                .map(|r| r.title.clone())
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"a".to_string()));
    assert!(titles.contains(&"b".to_string()));

    assert!(HostConfig::load(&dir.path().join("hosts.yaml")).is_empty());
}
