//! End-to-end tests: case records sent over HTTP to a local mock server.

use super::http_runner;
use api_harness::cases::CaseRecord;
use api_harness::executor::{ExecutionConfig, HttpTransport, RequestError, Transport};
use api_harness::models::{HttpMethod, HttpRequest, RequestBody};
use api_harness::runner::StepStatus;
use mockito::Matcher;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn case(value: Value) -> CaseRecord {
    serde_json::from_value(value).expect("Invalid case record")
}

#[test]
fn test_get_with_query_params_and_json_assertion() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/posts/1")
        .match_query(Matcher::UrlEncoded("verbose".into(), "true".into()))
        .match_header("x-trace", "abc")
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(r#"{"id": 1, "title": "hello", "userId": 7}"#)
        .create();

    let mut runner = http_runner(&server.url());
    let report = runner.run_case(&case(json!({
        "title": "get post",
        "method": "GET",
        "url": "${api_host}/posts/1",
        "params": {"verbose": true},
        "headers": {"X-Trace": "abc"},
        "expectedStatus": 200,
        "assertExp": "$.title",
        "expectedValue": "hello"
    })));

    mock.assert();
    assert_eq!(report.status, StepStatus::Passed);
    assert_eq!(report.status_code, Some(200));
}

#[test]
fn test_post_json_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/posts")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"title": "test post", "userId": 1})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 101}"#)
        .create();

    let mut runner = http_runner(&server.url());
    let report = runner.run_case(&case(json!({
        "method": "POST",
        "url": "${api_host}/posts",
        "dataType": "json",
        "data": {"title": "test post", "userId": 1},
        "expectedStatus": 201,
        "extract": {"postId": "$.id"}
    })));

    mock.assert();
    assert_eq!(report.status, StepStatus::Passed);
    assert_eq!(runner.store().get("postId"), Some(&json!(101)));
}

#[test]
fn test_form_and_file_uploads_are_multipart() {
    let dir = TempDir::new().unwrap();
    let upload = dir.path().join("avatar.txt");
    fs::write(&upload, "file-contents").unwrap();

    let mut server = mockito::Server::new();
    let form_mock = server
        .mock("POST", "/form")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::Regex("name=\"user\"".into()))
        .with_status(204)
        .create();
    let file_mock = server
        .mock("PUT", "/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::Regex("filename=\"avatar.txt\"[\\s\\S]*file-contents".into()))
        .with_status(200)
        .create();

    let mut runner = http_runner(&server.url());
    let form = runner.run_case(&case(json!({
        "method": "POST",
        "url": "${api_host}/form",
        "dataType": "form",
        "data": {"user": "ann"},
        "expectedStatus": 204
    })));
    let file = runner.run_case(&case(json!({
        "method": "PUT",
        "url": "${api_host}/upload",
        "dataType": "file",
        "data": {"avatar": upload.to_string_lossy()},
        "expectedStatus": 200
    })));

    form_mock.assert();
    file_mock.assert();
    assert_eq!(form.status, StepStatus::Passed);
    assert_eq!(file.status, StepStatus::Passed);
}

#[test]
fn test_text_body_regex_assertion_and_capture() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/orders/latest")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("order-42-confirmed")
        .create();

    let mut runner = http_runner(&server.url());
    let passing = runner.run_case(&case(json!({
        "method": "GET",
        "url": "${api_host}/orders/latest",
        "assertExp": "\\d+",
        "expectedValue": "42",
        "extract": {"orderId": "order-(\\d+)"}
    })));
    let failing = runner.run_case(&case(json!({
        "method": "GET",
        "url": "${api_host}/orders/latest",
        "assertExp": "\\d+",
        "expectedValue": "order-42"
    })));

    assert_eq!(passing.status, StepStatus::Passed);
    assert_eq!(runner.store().get("orderId"), Some(&json!("42")));
    assert!(matches!(failing.status, StepStatus::Failed(_)));
}

#[test]
fn test_status_only_response_cannot_be_asserted() {
    let mut server = mockito::Server::new();
    server.mock("DELETE", "/posts/1").with_status(404).create();

    let mut runner = http_runner(&server.url());
    let status_ok = runner.run_case(&case(json!({
        "method": "DELETE",
        "url": "${api_host}/posts/1",
        "expectedStatus": 404
    })));
    let body_assert = runner.run_case(&case(json!({
        "method": "DELETE",
        "url": "${api_host}/posts/1",
        "assertExp": "$.id",
        "expectedValue": 1
    })));

    assert_eq!(status_ok.status, StepStatus::Passed);
    assert!(matches!(body_assert.status, StepStatus::Errored(_)));
}

#[test]
fn test_connection_refused_is_transport_error() {
    let transport = HttpTransport::new().unwrap();
    let request = HttpRequest::new(
        "req-1".to_string(),
        HttpMethod::GET,
        "http://127.0.0.1:1/test".to_string(),
    );

    let result = transport.send(&request, &ExecutionConfig::new(2));
    assert!(matches!(result, Err(RequestError::NetworkError(_))));
}

#[test]
fn test_expected_failure_against_unreachable_host() {
    let mut runner = http_runner("http://127.0.0.1:1");
    let report = runner.run_case(&case(json!({
        "title": "local service down",
        "method": "GET",
        "url": "${api_host}/test",
        "expectedStatus": 200,
        "expectFailure": true
    })));

    assert_eq!(report.status, StepStatus::Passed);
}

#[test]
fn test_transport_reads_response_headers() {
    let mut server = mockito::Server::new();
    server
        .mock("HEAD", "/ping")
        .with_status(200)
        .with_header("x-request-id", "r-1")
        .create();

    let transport = HttpTransport::new().unwrap();
    let mut request = HttpRequest::new(
        "req-2".to_string(),
        HttpMethod::HEAD,
        format!("{}/ping", server.url()),
    );
    request.set_body(RequestBody::None);

    let response = transport.send(&request, &ExecutionConfig::new(2)).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.header("X-Request-Id"), Some("r-1"));
    assert!(response.body.is_empty());
}
