//! HTTP request execution configuration.
//!
//! This module defines the options that control how the transport sends
//! requests: the timeout and whether server certificates are checked.

use crate::config::RunnerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for HTTP request execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Defaults to 30 seconds.
    pub timeout_ms: u64,

    /// Whether to reject invalid or self-signed server certificates.
    pub validate_ssl: bool,
}

impl ExecutionConfig {
    /// Creates a new ExecutionConfig with the given timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Timeout duration in milliseconds
    ///
    /// # Returns
    ///
    /// A new `ExecutionConfig` that does not validate certificates.
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            validate_ssl: false,
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

impl From<&RunnerConfig> for ExecutionConfig {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            timeout_ms: config.timeout,
            validate_ssl: config.validate_ssl,
        }
    }
}
