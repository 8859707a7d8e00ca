//! Configuration schema for a test run.
//!
//! This module defines the run settings and their validation. Settings come
//! from an optional JSON file given with `--config`, overlaid by command-line
//! flags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one invocation of the runner.
///
/// ```json
/// {
///     "timeout": 10000,
///     "validateSsl": true,
///     "abortSentinel": "connection refused",
///     "define": { "HOST": "staging.example.com" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Defaults to 30000ms (30 seconds).
    ///
    /// Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to validate SSL/TLS certificates.
    ///
    /// Test servers commonly run with self-signed certificates, so this
    /// defaults to false.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// Text that marks a failure as "server unavailable".
    ///
    /// A failing test whose error contains this text (ignoring case) stops
    /// the run. A `CONNECTION_REFUSED` dictionary entry overrides it.
    #[serde(default = "default_abort_sentinel")]
    pub abort_sentinel: String,

    /// File name of the per-directory dictionary.
    #[serde(default = "default_dictionary_file")]
    pub dictionary_file: String,

    /// Log each step of each test.
    #[serde(default)]
    pub verbose: bool,

    /// Log request and response bodies.
    #[serde(default)]
    pub rest: bool,

    /// Dictionary entries applied after the built-in defaults.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub define: IndexMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            validate_ssl: default_validate_ssl(),
            abort_sentinel: default_abort_sentinel(),
            dictionary_file: default_dictionary_file(),
            verbose: false,
            rest: false,
            define: IndexMap::new(),
        }
    }
}

impl RunnerConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.abort_sentinel.trim().is_empty() {
            return Err("abortSentinel must not be empty".to_string());
        }

        if self.dictionary_file.trim().is_empty() {
            return Err("dictionaryFile must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Merges this configuration with another, using values from `other`.
    ///
    /// Defines are combined; entries in `other` replace entries with the same
    /// key. The flags are enabled if either side enables them.
    ///
    /// # Arguments
    ///
    /// * `other` - Configuration to merge with (takes precedence)
    ///
    /// # Returns
    ///
    /// A new `RunnerConfig` with merged values.
    pub fn merge(&self, other: &RunnerConfig) -> Self {
        let mut define = self.define.clone();
        for (key, value) in &other.define {
            define.insert(key.clone(), value.clone());
        }

        Self {
            timeout: other.timeout,
            validate_ssl: other.validate_ssl,
            abort_sentinel: other.abort_sentinel.clone(),
            dictionary_file: other.dictionary_file.clone(),
            verbose: self.verbose || other.verbose,
            rest: self.rest || other.rest,
            define,
        }
    }
}

// Default value functions for serde

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_validate_ssl() -> bool {
    false
}

fn default_abort_sentinel() -> String {
    "connection refused".to_string()
}

fn default_dictionary_file() -> String {
    "dictionary.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.timeout, 30000);
        assert!(!config.validate_ssl);
        assert_eq!(config.abort_sentinel, "connection refused");
        assert_eq!(config.dictionary_file, "dictionary.json");
        assert!(!config.verbose);
        assert!(!config.rest);
        assert!(config.define.is_empty());
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config = RunnerConfig {
            timeout: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            "timeout must be greater than 0"
        );
    }

    #[test]
    fn test_config_validation_empty_sentinel() {
        let config = RunnerConfig {
            abort_sentinel: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_duration() {
        let config = RunnerConfig {
            timeout: 5000,
            ..Default::default()
        };
        assert_eq!(config.timeout_duration(), Duration::from_millis(5000));
    }

    #[test]
    fn test_merge_config() {
        let mut base = RunnerConfig::default();
        base.verbose = true;
        base.define.insert("HOST".to_string(), "base".to_string());
        base.define.insert("PORT".to_string(), "80".to_string());

        let mut custom = RunnerConfig::default();
        custom.timeout = 60000;
        custom.validate_ssl = true;
        custom.define.insert("HOST".to_string(), "custom".to_string());

        let merged = base.merge(&custom);
        assert_eq!(merged.timeout, 60000);
        assert!(merged.validate_ssl);
        assert!(merged.verbose);
        assert_eq!(merged.define["HOST"], "custom");
        assert_eq!(merged.define["PORT"], "80");
    }

    #[test]
    fn test_deserialization_with_defaults() {
        let json = r#"{
            "timeout": 60000,
            "validateSsl": true,
            "define": {"SCHEME": "http"}
        }"#;

        let config: RunnerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.timeout, 60000);
        assert!(config.validate_ssl);
        assert_eq!(config.define["SCHEME"], "http");
        // Other fields should have defaults
        assert_eq!(config.abort_sentinel, "connection refused");
        assert_eq!(config.dictionary_file, "dictionary.json");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&RunnerConfig::default()).unwrap();
        assert!(json.contains("\"timeout\":30000"));
        assert!(json.contains("validateSsl"));
        assert!(json.contains("abortSentinel"));
        assert!(!json.contains("define"));
    }
}
