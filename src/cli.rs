//! Command-line interface.

use crate::config::{load_config, ConfigError, RunnerConfig};
use clap::Parser;
use std::path::PathBuf;

/// Runs a directory of JSON API tests against a server
#[derive(Debug, Parser)]
#[command(name = "apitest")]
#[command(about = "Runs a directory of JSON API tests against a server")]
#[command(version)]
pub struct Cli {
    /// Directory containing the tests to run
    #[arg(short, long)]
    pub path: PathBuf,

    /// Set a dictionary value, overriding the defaults
    #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_define)]
    pub define: Vec<(String, String)>,

    /// Log each step of each test
    #[arg(short, long)]
    pub verbose: bool,

    /// Log request and response bodies
    #[arg(short, long)]
    pub rest: bool,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Builds the run settings: defaults, then the `--config` file, then flags.
    pub fn runner_config(&self) -> Result<RunnerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RunnerConfig::default(),
        };

        config.verbose |= self.verbose || self.rest;
        config.rest |= self.rest;

        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }

        for (key, value) in &self.define {
            config.define.insert(key.clone(), value.clone());
        }

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Parses a `KEY=VALUE` definition. The value may itself contain `=`.
fn parse_define(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid key=value format for --define: {}", text)),
    }
}
