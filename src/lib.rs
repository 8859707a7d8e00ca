//! Declarative HTTP API testing.
//!
//! A test is a JSON file describing one request, the response it should get,
//! and rules checking values in the response body. Tests share a dictionary
//! of `{{KEY}}` tokens, so values saved from one response (a session token,
//! a created id) can be used by the tests that follow.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **dictionary**: Token store, `{{KEY}}` substitution and `$` directives
//! - **query**: Dot-notation paths into JSON documents
//! - **validation**: Comparison rules checked against a response body
//! - **models**: Test, request and response definitions
//! - **executor**: Runs one test through an HTTP transport
//! - **tasks**: Cleanup actions run after a test passes
//! - **runner**: Walks a directory of tests and reports results
//! - **formatter**: Report lines, durations and body logging
//! - **config**: Run settings
//! - **cli**: Command-line parsing for the `apitest` binary
//!
//! # Test files
//!
//! ```json
//! {
//!     "description": "Log in",
//!     "request": {
//!         "method": "POST",
//!         "endpoint": "/services/admin/logon",
//!         "body": { "username": "admin", "password": "{{PASSWORD}}" }
//!     },
//!     "response": {
//!         "status": 200,
//!         "save": { "API_TOKEN": "token" }
//!     },
//!     "tests": [
//!         { "name": "has expiry", "query": "expires", "op": "exists" }
//!     ]
//! }
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use apitest::config::RunnerConfig;
//! use apitest::dictionary::Dictionary;
//! use apitest::executor::{ExecutionConfig, ReqwestTransport, TestExecutor};
//! use apitest::runner::SuiteRunner;
//! use std::path::Path;
//!
//! let config = RunnerConfig::default();
//! let transport = ReqwestTransport::new(&ExecutionConfig::from(&config)).unwrap();
//! let dictionary = Dictionary::with_entries([("SCHEME", "http"), ("HOST", "localhost")]);
//!
//! let mut runner = SuiteRunner::new(TestExecutor::new(transport), dictionary, config);
//! let summary = runner.run(Path::new("tests")).unwrap();
//! println!("{} passed, {} failed", summary.passed, summary.failed);
//! ```

pub mod cli;
pub mod config;
pub mod dictionary;
pub mod executor;
pub mod formatter;
pub mod models;
pub mod query;
pub mod runner;
pub mod tasks;
pub mod validation;

pub use config::RunnerConfig;
pub use dictionary::{Dictionary, DictionaryError};
pub use executor::{TestError, TestExecutor, Transport};
pub use models::{RequestSpec, ResponseSpec, TestSpec, ValidationRule};
pub use query::QueryError;
pub use runner::{RunError, SuiteRunner, SuiteSummary};
pub use validation::{Operator, ValidationError};
