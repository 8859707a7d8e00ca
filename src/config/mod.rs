//! Configuration management for test runs.
//!
//! A run is configured from defaults, an optional JSON settings file, and
//! command-line flags, in that order of increasing precedence.

pub mod schema;

pub use schema::RunnerConfig;

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors reading or validating a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads settings from a JSON file and merges them over the defaults.
///
/// Missing keys take their default values. The result is validated.
///
/// # Example
///
/// ```no_run
/// use apitest::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("apitest.json")).unwrap();
/// println!("Timeout: {}ms", config.timeout);
/// ```
pub fn load_config(path: &Path) -> Result<RunnerConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let user_config: RunnerConfig =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let config = RunnerConfig::default().merge(&user_config);
    config.validate().map_err(ConfigError::Invalid)?;

    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apitest.json");
        fs::write(&path, r#"{"timeout": 1234, "rest": true}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.timeout, 1234);
        assert!(config.rest);
        assert!(!config.verbose);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_config_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apitest.json");
        fs::write(&path, r#"{"timeout": 0}"#).unwrap();

        let err = load_config(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: timeout must be greater than 0"
        );
    }

    #[test]
    fn test_load_config_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apitest.json");
        fs::write(&path, "{timeout: 5}").unwrap();

        assert!(matches!(
            load_config(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
