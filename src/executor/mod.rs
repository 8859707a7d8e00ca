//! Test execution.
//!
//! [`TestExecutor`] runs one [`TestSpec`] end to end:
//!
//! 1. substitute the request and build the URL,
//! 2. send it through a [`Transport`],
//! 3. check the status code and expected headers,
//! 4. validate the body,
//! 5. run cleanup tasks if everything passed,
//! 6. save values from the body into the dictionary.
//!
//! Saving happens whenever a response was received, even if an earlier check
//! failed. The error reported is the first one encountered.

pub mod config;
pub mod error;
pub mod transport;

pub use config::ExecutionConfig;
pub use error::{error_chain, RequestError};
pub use transport::{PreparedRequest, ReqwestTransport, Transport, TransportResponse};

use crate::dictionary::{Dictionary, DictionaryError, HOST_KEY, PORT_KEY, SCHEME_KEY};
use crate::formatter;
use crate::models::{HttpMethod, RequestSpec, TestSpec};
use crate::tasks::{self, TaskError};
use crate::validation::{self, ValidationError};
use chrono::Utc;
use std::fs;
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_HOST: &str = "localhost";

/// Errors building a request from its specification.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Substitution(#[from] DictionaryError),

    #[error("unsupported method '{0}'")]
    InvalidMethod(String),

    #[error("unable to read request file {path}: {source}")]
    BodyFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Url(#[from] RequestError),
}

/// Why a test failed.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("{test}: {source}")]
    Prepare {
        test: String,
        #[source]
        source: PrepareError,
    },

    #[error("{test}: {source}")]
    Request {
        test: String,
        #[source]
        source: RequestError,
    },

    #[error("{test}, expected status {expected}, got {actual}")]
    Status {
        test: String,
        expected: u16,
        actual: u16,
    },

    #[error("{test}, expected header '{header}' to be present")]
    MissingHeader { test: String, header: String },

    #[error("{test}, expected header '{header}' to contain '{expected}', got '{actual}'")]
    HeaderMismatch {
        test: String,
        header: String,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{test}: {source}")]
    Task {
        test: String,
        #[source]
        source: TaskError,
    },

    #[error("{test}: {source}")]
    Update {
        test: String,
        #[source]
        source: DictionaryError,
    },
}

impl TestError {
    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, TestError::Request { .. })
    }
}

/// Summary of a passed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
    /// Status code received.
    pub status: u16,
    /// Time spent waiting for the response.
    pub duration: Duration,
}

/// Runs tests through a transport.
#[derive(Debug, Clone)]
pub struct TestExecutor<T> {
    transport: T,
    log_bodies: bool,
}

impl<T: Transport> TestExecutor<T> {
    /// Creates an executor that sends requests through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            log_bodies: false,
        }
    }

    /// Enables logging of request and response bodies.
    pub fn with_body_logging(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs `test`, recording the response body, start time, duration and
    /// result in it.
    ///
    /// # Arguments
    ///
    /// * `test` - The test to run; run-time fields are updated in place
    /// * `dictionary` - Substitution source, and destination of saved values
    ///
    /// # Returns
    ///
    /// `Ok(TestOutcome)` if every check passed, or the first `TestError`.
    pub fn execute(
        &self,
        test: &mut TestSpec,
        dictionary: &mut Dictionary,
    ) -> Result<TestOutcome, TestError> {
        test.succeeded = false;
        test.time = Some(Utc::now());

        let request = prepare(&test.request, dictionary).map_err(|source| TestError::Prepare {
            test: test.description.clone(),
            source,
        })?;

        log::info!("  {} {}", request.method, request.url);
        formatter::log_body(
            self.log_bodies,
            "Request body",
            &request.body,
            request.content_type(),
        );

        let started = Instant::now();
        let response = self
            .transport
            .execute(&request)
            .map_err(|source| TestError::Request {
                test: test.description.clone(),
                source,
            })?;
        test.duration = started.elapsed();

        let body = response.body_text();
        let checked = self.check_response(test, dictionary, &response, &body);

        let saved = dictionary
            .update(&body, &test.response.save)
            .map_err(|source| TestError::Update {
                test: test.description.clone(),
                source,
            });

        checked?;
        saved?;

        test.succeeded = true;
        Ok(TestOutcome {
            status: response.status,
            duration: test.duration,
        })
    }

    fn check_response(
        &self,
        test: &mut TestSpec,
        dictionary: &Dictionary,
        response: &TransportResponse,
        body: &str,
    ) -> Result<(), TestError> {
        if test.response.checks_status() {
            log::info!("  Validating response code {}", test.response.status);

            if response.status != test.response.status {
                return Err(TestError::Status {
                    test: test.description.clone(),
                    expected: test.response.status,
                    actual: response.status,
                });
            }
        }

        if !test.response.headers.is_empty() {
            log::info!("  Validating response headers");
            check_headers(test, dictionary, response)?;
        }

        if !response.body.is_empty() {
            test.response.body = body.to_string();
            formatter::log_body(
                self.log_bodies,
                "Response body",
                &response.body,
                response.content_type(),
            );

            validation::validate(dictionary, &test.description, body, &test.tests)?;
        }

        for task in &test.tasks {
            tasks::execute_task(dictionary, task).map_err(|source| TestError::Task {
                test: test.description.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

fn check_headers(
    test: &TestSpec,
    dictionary: &Dictionary,
    response: &TransportResponse,
) -> Result<(), TestError> {
    let substitution_error = |source| TestError::Prepare {
        test: test.description.clone(),
        source: PrepareError::Substitution(source),
    };

    for (name, values) in &test.response.headers {
        for value in values {
            log::info!("    Validating {}", name);

            let expected = dictionary.apply(value).map_err(substitution_error)?;

            let actual = response.header_values(name);
            if actual.is_empty() {
                return Err(TestError::MissingHeader {
                    test: test.description.clone(),
                    header: name.clone(),
                });
            }

            let joined = actual.join(",");
            if !joined.contains(&expected) {
                return Err(TestError::HeaderMismatch {
                    test: test.description.clone(),
                    header: name.clone(),
                    expected,
                    actual: joined,
                });
            }
        }
    }

    Ok(())
}

/// Builds the request to send: method, URL, substituted headers and body.
pub fn prepare(
    request: &RequestSpec,
    dictionary: &Dictionary,
) -> Result<PreparedRequest, PrepareError> {
    let method: HttpMethod = request.method.parse().map_err(PrepareError::InvalidMethod)?;
    let url = build_url(dictionary, request)?;

    let mut headers = Vec::new();
    for (name, values) in &request.headers {
        for value in values {
            headers.push((name.clone(), dictionary.apply(value)?));
        }
    }

    let body = match request.file.as_deref() {
        Some(file) if !file.trim().is_empty() => {
            let name = dictionary.apply(file)?;
            let path = dictionary.resolve_path(name.trim());
            let raw = fs::read(&path).map_err(|source| PrepareError::BodyFile {
                path: path.display().to_string(),
                source,
            })?;

            // Binary files are sent as read
            match String::from_utf8(raw) {
                Ok(text) => dictionary.apply(&text)?.into_bytes(),
                Err(err) => err.into_bytes(),
            }
        }
        _ => {
            let text = request.body_text();
            if text.is_empty() {
                Vec::new()
            } else {
                dictionary.apply(&text)?.into_bytes()
            }
        }
    };

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body,
    })
}

/// Builds the full URL for a request.
///
/// A root-relative endpoint (starting with `/`) is prefixed with
/// `SCHEME://HOST[:PORT]` from the dictionary, defaulting to `https` and
/// `localhost`. Query parameters are substituted and appended, URL-encoded,
/// in declaration order.
///
/// # Examples
///
/// ```
/// use apitest::dictionary::Dictionary;
/// use apitest::executor::build_url;
/// use apitest::models::RequestSpec;
///
/// let dictionary = Dictionary::with_entries([
///     ("SCHEME", "http"),
///     ("HOST", "api.test"),
///     ("PORT", "8080"),
///     ("USER", "alice"),
/// ]);
///
/// let mut request = RequestSpec::default();
/// request.endpoint = "/users/{{USER}}".to_string();
/// request.params.insert("expand".to_string(), "roles".to_string());
///
/// assert_eq!(
///     build_url(&dictionary, &request).unwrap(),
///     "http://api.test:8080/users/alice?expand=roles"
/// );
/// ```
pub fn build_url(dictionary: &Dictionary, request: &RequestSpec) -> Result<String, PrepareError> {
    let endpoint = dictionary.apply(&request.endpoint)?;

    let url = if endpoint.starts_with('/') {
        let scheme = non_empty(dictionary.get(SCHEME_KEY)).unwrap_or(DEFAULT_SCHEME);
        let host = non_empty(dictionary.get(HOST_KEY)).unwrap_or(DEFAULT_HOST);
        match non_empty(dictionary.get(PORT_KEY)) {
            Some(port) => format!("{}://{}:{}{}", scheme, host, port, endpoint),
            None => format!("{}://{}{}", scheme, host, endpoint),
        }
    } else {
        endpoint
    };

    let mut parsed = validate_url(&url)?;

    if request.params.is_empty() {
        return Ok(url);
    }

    let mut params = Vec::with_capacity(request.params.len());
    for (key, value) in &request.params {
        params.push((key.as_str(), dictionary.apply(value)?));
    }

    parsed
        .query_pairs_mut()
        .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));

    Ok(parsed.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Validates that the URL is well-formed and uses a supported protocol.
fn validate_url(url: &str) -> Result<Url, RequestError> {
    let parsed = Url::parse(url).map_err(|e| RequestError::InvalidUrl(format!("{}: {}", url, e)))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RequestError::UnsupportedProtocol(format!(
            "Only HTTP and HTTPS are supported, got: {}",
            scheme
        )));
    }

    Ok(parsed)
}
