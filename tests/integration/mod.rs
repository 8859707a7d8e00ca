//! Integration tests module for apitest
//!
//! Shared helpers for building on-disk test suites and running them against
//! a local mock server.

pub mod chaining_test;
pub mod properties_test;
pub mod suite_test;

use apitest::config::RunnerConfig;
use apitest::dictionary::Dictionary;
use apitest::executor::{ExecutionConfig, ReqwestTransport, TestExecutor};
use apitest::runner::SuiteRunner;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Writes `content` to `name` under `dir`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create test directory");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// A dictionary pointing root-relative endpoints at `server`.
pub fn server_dictionary(server: &mockito::Server, root: &Path) -> Dictionary {
    let address = server.socket_address();
    let mut dictionary = Dictionary::with_entries([
        ("SCHEME", "http".to_string()),
        ("HOST", address.ip().to_string()),
        ("PORT", address.port().to_string()),
        ("ROOT", root.display().to_string()),
    ]);
    dictionary.set_root(root);
    dictionary
}

/// A runner that sends real HTTP requests.
pub fn http_runner(dictionary: Dictionary) -> SuiteRunner<ReqwestTransport> {
    init_test_env();

    let config = RunnerConfig {
        timeout: 5000,
        ..Default::default()
    };
    let transport = ReqwestTransport::new(&ExecutionConfig::from(&config))
        .expect("Failed to build HTTP client");

    SuiteRunner::new(TestExecutor::new(transport), dictionary, config)
}
