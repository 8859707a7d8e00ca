//! Request chaining across test files and directories.
//!
//! These tests verify that values saved from one response reach later tests,
//! that nested dictionaries layer over their parents, and that dictionary
//! directives resolve as the suite runs.

use super::{http_runner, server_dictionary, write_file};
use apitest::runner::RunError;
use serial_test::serial;
use std::env;
use tempfile::TempDir;

#[test]
fn test_token_saved_in_one_directory_used_in_another() {
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/services/admin/logon")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"password": "secret"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"token": "tok-991", "identity": {"user": "admin"}}"#)
        .create();
    let profile = server
        .mock("GET", "/users/admin")
        .match_header("authorization", "Bearer tok-991")
        .with_status(200)
        .with_body(r#"{"name": "admin", "roles": ["root", "ops"]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "dictionary.json", r#"{"PASSWORD": "secret"}"#);
    write_file(
        dir.path(),
        "01-setup/logon.json",
        r#"{
            "description": "log on",
            "request": {
                "method": "POST",
                "endpoint": "/services/admin/logon",
                "body": {"user": "admin", "password": "{{PASSWORD}}"}
            },
            "response": {
                "status": 200,
                "save": {"API_TOKEN": "token", "USER": "identity.user"}
            }
        }"#,
    );
    write_file(
        dir.path(),
        "02-users/profile.json",
        r#"{
            "description": "profile",
            "request": {
                "endpoint": "/users/{{USER}}",
                "headers": {"Authorization": ["Bearer {{API_TOKEN}}"]}
            },
            "tests": [
                {"name": "roles", "query": "roles.*", "op": "len", "value": "2"},
                {"name": "root", "query": "roles.*", "op": "eq", "value": "root"}
            ]
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let summary = runner.run(dir.path()).unwrap();

    login.assert();
    profile.assert();
    assert_eq!(summary.passed, 2);
    assert_eq!(runner.dictionary().get("API_TOKEN"), Some("tok-991"));
}

#[test]
fn test_sequence_yields_consecutive_ids() {
    let mut server = mockito::Server::new();
    let first = server.mock("GET", "/items/0").with_body("{}").create();
    let second = server.mock("GET", "/items/1").with_body("{}").create();

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "dictionary.json", r#"{"ID": "$seq"}"#);
    write_file(dir.path(), "a.json", r#"{"request": {"endpoint": "/items/{{ID}}"}}"#);
    write_file(dir.path(), "b.json", r#"{"request": {"endpoint": "/items/{{ID}}"}}"#);

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    assert_eq!(runner.run(dir.path()).unwrap().passed, 2);

    first.assert();
    second.assert();
}

#[test]
fn test_nested_dictionary_overrides_parent_values() {
    let mut server = mockito::Server::new();
    let v2 = server.mock("GET", "/v2/status").with_body("{}").expect(2).create();
    let v1 = server.mock("GET", "/v1/status").with_body("{}").expect(0).create();

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "dictionary.json", r#"{"API": "v1"}"#);
    write_file(dir.path(), "status.json", r#"{"request": {"endpoint": "/{{API}}/status"}}"#);
    write_file(dir.path(), "next/dictionary.json", r#"{"API": "v2"}"#);
    write_file(
        dir.path(),
        "next/status.json",
        r#"{"request": {"endpoint": "/{{API}}/status"}}"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let summary = runner.run(dir.path()).unwrap();

    // The subdirectory runs first and its entries stay in the dictionary
    assert_eq!(summary.passed, 2);
    v2.assert();
    v1.assert();
}

#[test]
fn test_dictionary_file_include() {
    let mut server = mockito::Server::new();
    let create = server
        .mock("POST", "/widgets")
        .match_body(mockito::Matcher::Json(serde_json::json!({"widget": {"size": 3}})))
        .with_status(201)
        .with_body("{}")
        .create();

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "payloads/widget.json", r#"{"size": {{SIZE}}}"#);
    write_file(
        dir.path(),
        "dictionary.json",
        r#"{"SIZE": "3", "WIDGET": "$file payloads/widget.json"}"#,
    );
    write_file(
        dir.path(),
        "create.json",
        r#"{
            "request": {"method": "POST", "endpoint": "/widgets", "body": {"widget": {{WIDGET}}}},
            "response": {"status": 201}
        }"#,
    );

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    assert_eq!(runner.run(dir.path()).unwrap().passed, 1);
    create.assert();
}

#[test]
fn test_failed_save_fails_test_but_run_continues() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/a").with_body(r#"{"other": 1}"#).create();
    server.mock("GET", "/b").with_body("{}").create();

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "a.json",
        r#"{"request": {"endpoint": "/a"}, "response": {"save": {"TOKEN": "token"}}}"#,
    );
    write_file(dir.path(), "b.json", r#"{"request": {"endpoint": "/b"}}"#);

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let summary = runner.run(dir.path()).unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.passed, 1);
    assert!(runner.dictionary().get("TOKEN").is_none());
}

#[test]
fn test_abort_flag_skips_remaining_tests() {
    let mut server = mockito::Server::new();
    let never = server.mock("GET", "/after").expect(0).create();
    server.mock("GET", "/login").with_status(401).with_body("{}").create();

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "1-login.json",
        r#"{"description": "login", "abort": true, "request": {"endpoint": "/login"}, "response": {"status": 200}}"#,
    );
    write_file(dir.path(), "2-after.json", r#"{"request": {"endpoint": "/after"}}"#);

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    let err = runner.run(dir.path()).unwrap_err();

    assert!(matches!(err, RunError::Aborted { .. }));
    assert_eq!(
        err.to_string(),
        "Server testing unavailable, login, expected status 200, got 401"
    );
    never.assert();
}

#[test]
#[serial]
fn test_dictionary_reads_environment_variables() {
    env::set_var("APITEST_IT_GREETING", "hello");

    let mut server = mockito::Server::new();
    let greet = server.mock("GET", "/greet/hello").with_body("{}").create();

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "dictionary.json",
        r#"{"GREETING": "$APITEST_IT_GREETING", "UNSET": "$APITEST_IT_UNSET"}"#,
    );
    write_file(dir.path(), "greet.json", r#"{"request": {"endpoint": "/greet/{{GREETING}}"}}"#);

    let mut runner = http_runner(server_dictionary(&server, dir.path()));
    assert_eq!(runner.run(dir.path()).unwrap().passed, 1);
    assert_eq!(runner.dictionary().get("UNSET"), Some("$APITEST_IT_UNSET"));

    greet.assert();
    env::remove_var("APITEST_IT_GREETING");
}
