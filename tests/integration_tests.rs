//! End-to-end tests for apitest.
//!
//! The suites live in `tests/integration/`; this target only declares them
//! and checks the shared helpers they are built on.

mod integration;

use integration::{http_runner, server_dictionary, write_file};
use tempfile::TempDir;

#[test]
fn test_helpers_point_runner_at_server() {
    let server = mockito::Server::new();
    let dir = TempDir::new().unwrap();

    let written = write_file(dir.path(), "nested/suite/a.json", "{}");
    assert!(written.is_file());
    assert!(written.starts_with(dir.path()));

    let runner = http_runner(server_dictionary(&server, dir.path()));
    let port = server.socket_address().port().to_string();
    assert_eq!(runner.dictionary().get("PORT"), Some(port.as_str()));
    assert_eq!(runner.dictionary().get("SCHEME"), Some("http"));
}
