//! End-to-end suite tests against a local HTTP server.
//!
//! Each test writes a suite directory with `tempfile`, serves the endpoints
//! it calls with `mockito`, and runs the suite over real HTTP.

use super::{http_runner, server_dictionary, write_file};
use apitest::runner::RunError;
use mockito::Matcher;
use std::net::TcpListener;
use tempfile::TempDir;

#[test]
fn test_suite_with_status_headers_and_rules() {
    let mut server = mockito::Server::new();
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-service", "inventory/2.1")
        .with_body(r#"{"status": "ok", "uptime": 1500, "checks": [{"name": "db"}, {"name": "cache"}]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "health.json",
        r#"{
            // Service health
            "description": "health check",
            "request": {"method": "get", "endpoint": "/health"},
            "response": {
                "status": 200,
                "headers": {"X-Service": ["inventory"]}
            },
            "tests": [
                {"name": "status", "query": "status", "op": "eq", "value": "ok"},
                {"name": "uptime", "query": "uptime", "op": "ge", "value": "1000"},
                {"name": "checks", "query": "checks.*.name", "op": "len", "value": "2"},
                {"name": "check count", "query": "checks", "op": "len", "value": "2"},
                {"name": "cache", "query": "checks.1.name", "op": "contains", "value": "cach"}
            ]
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let summary = runner.run(dir.path()).unwrap();

    health.assert();
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.results[0].description, "health check");
}

#[test]
fn test_request_body_params_and_headers_are_substituted() {
    let mut server = mockito::Server::new();
    let create = server
        .mock("POST", "/users")
        .match_query(Matcher::UrlEncoded("notify".into(), "yes please".into()))
        .match_header("x-client", "apitest-0")
        .match_body(Matcher::Json(serde_json::json!({"name": "alice", "team": "blue"})))
        .with_status(201)
        .with_body(r#"{"id": 42}"#)
        .create();

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "dictionary.json", r#"{"NAME": "alice", "SEQ": "$seq"}"#);
    write_file(
        dir.path(),
        "create.json",
        r#"{
            "description": "create user",
            "request": {
                "method": "POST",
                "endpoint": "/users",
                "params": {"notify": "yes please"},
                "headers": {"X-Client": ["apitest-{{SEQ}}"]},
                "body": {"name": "{{NAME}}", "team": "blue"}
            },
            "response": {"status": 201, "save": {"USER_ID": "id"}}
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let summary = runner.run(dir.path()).unwrap();

    create.assert();
    assert_eq!(summary.passed, 1);
    assert_eq!(runner.dictionary().get("USER_ID"), Some("42"));
}

#[test]
fn test_body_file_substituted_before_sending() {
    let mut server = mockito::Server::new();
    let upload = server
        .mock("PUT", "/upload")
        .match_body("owner=alice {{NOT_A_TOKEN}}\n")
        .with_status(204)
        .create();

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "dictionary.json", r#"{"OWNER": "alice"}"#);
    write_file(dir.path(), "payloads/data.txt", "owner={{OWNER}} {{NOT_A_TOKEN}}\n");
    write_file(
        dir.path(),
        "upload.json",
        r#"{
            "request": {"method": "PUT", "endpoint": "/upload", "file": "payloads/data.txt"},
            "response": {"status": 204}
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    assert_eq!(runner.run(dir.path()).unwrap().passed, 1);
    upload.assert();
}

#[test]
fn test_failures_reported_and_counted() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/items")
        .with_status(200)
        .with_body(r#"{"items": [{"id": 1}, {"id": 2}]}"#)
        .expect_at_least(1)
        .create();

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "a-status.json",
        r#"{"description": "status", "request": {"endpoint": "/items"}, "response": {"status": 404}}"#,
    );
    write_file(
        dir.path(),
        "b-rule.json",
        r#"{
            "description": "rule",
            "request": {"endpoint": "/items"},
            "tests": [{"name": "second", "query": "items.1.id", "op": "eq", "value": "3"}]
        }"#,
    );
    write_file(
        dir.path(),
        "c-range.json",
        r#"{
            "description": "range",
            "request": {"endpoint": "/items"},
            "tests": [{"name": "third", "query": "items.2.id", "op": "exists"}]
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let summary = runner.run(dir.path()).unwrap();

    assert_eq!(summary.passed, 0);
    assert_eq!(summary.failed, 3);
    assert!(!summary.is_success());

    let errors: Vec<&str> = summary
        .results
        .iter()
        .map(|result| result.error.as_deref().unwrap())
        .collect();
    assert_eq!(errors[0], "status, expected status 404, got 200");
    assert_eq!(errors[1], "rule, second: expected equal to '3', got '2'");
    assert!(errors[2].contains("third"));
}

#[test]
fn test_refused_connection_aborts_run() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "dictionary.json",
        &format!(r#"{{"SCHEME": "http", "HOST": "127.0.0.1", "PORT": "{}"}}"#, port),
    );
    write_file(dir.path(), "1.json", r#"{"request": {"endpoint": "/health"}}"#);
    write_file(dir.path(), "2.json", r#"{"request": {"endpoint": "/health"}}"#);

    let server = mockito::Server::new();
    let mut runner = http_runner(server_dictionary(&server, dir.path()));

    match runner.run(dir.path()).unwrap_err() {
        RunError::Aborted { reason, summary } => {
            assert!(reason.to_lowercase().contains("connection refused"));
            assert_eq!(summary.passed + summary.failed, 0);
            assert_eq!(summary.skipped, 2);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_cleanup_task_removes_file() {
    let mut server = mockito::Server::new();
    server
        .mock("DELETE", "/reports/7")
        .with_status(200)
        .with_body("{}")
        .create();

    let dir = TempDir::new().unwrap();
    let report = write_file(dir.path(), "output/report-7.csv", "a,b\n");
    write_file(
        dir.path(),
        "delete.json",
        r#"{
            "request": {"method": "DELETE", "endpoint": "/reports/7"},
            "response": {"status": 200},
            "tasks": [{"command": "Delete", "parameters": ["output/report-7.csv"]}]
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    assert_eq!(runner.run(dir.path()).unwrap().passed, 1);
    assert!(!report.exists());
}
