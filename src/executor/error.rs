//! HTTP request execution error types.
//!
//! This module defines error types that can occur while sending a test's
//! request, including network errors, timeouts, and malformed URLs.

use thiserror::Error;

/// Errors that can occur during HTTP request execution.
///
/// Messages carry the full chain of underlying causes, so an operating system
/// error such as "Connection refused" is visible in the text.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network error occurred during request execution.
    ///
    /// This includes connection failures, DNS resolution errors,
    /// and other network-level issues.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out before completion.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The URL could not be parsed or is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Certificate validation errors, handshake failures, and other TLS issues.
    #[error("TLS/SSL error: {0}")]
    TlsError(String),

    /// Errors constructing the HTTP client or request.
    #[error("Request build error: {0}")]
    BuildError(String),

    /// Only HTTP and HTTPS are supported.
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),
}

/// Renders an error followed by each of its sources, separated by `": "`.
///
/// Sources whose text already appears in the message are skipped.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

/// Convert reqwest errors to RequestError.
///
/// Maps reqwest's error kinds onto our variants, keeping the full cause chain.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        let lowered = message.to_lowercase();

        if err.is_timeout() {
            RequestError::Timeout(message)
        } else if err.is_builder() {
            RequestError::BuildError(message)
        } else if lowered.contains("certificate")
            || lowered.contains("tls")
            || lowered.contains("ssl")
        {
            RequestError::TlsError(message)
        } else {
            RequestError::NetworkError(message)
        }
    }
}

/// Convert URL parsing errors to RequestError.
impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}
