//! apitest binary entry point.
//!
//! Parses the command line, seeds the dictionary with its defaults and runs
//! the test directory. PASS/FAIL lines go to stdout; the step-by-step trace
//! enabled by `--verbose` goes to stderr through `env_logger`.

use apitest::cli::Cli;
use apitest::config::RunnerConfig;
use apitest::dictionary::{Dictionary, HOST_KEY, ROOT_KEY, SCHEME_KEY};
use apitest::executor::{ExecutionConfig, ReqwestTransport, TestExecutor};
use apitest::formatter::format_duration;
use apitest::runner::{RunError, SuiteRunner};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

fn main() {
    let started = Instant::now();
    let cli = Cli::parse();

    let config = match cli.runner_config() {
        Ok(config) => config,
        Err(e) => exit(&e.to_string()),
    };

    init_logging(config.verbose);

    let root = match std::path::absolute(&cli.path) {
        Ok(root) => root,
        Err(e) => exit(&format!("bad path: {}", e)),
    };

    let transport = match ReqwestTransport::new(&ExecutionConfig::from(&config)) {
        Ok(transport) => transport,
        Err(e) => exit(&e.to_string()),
    };

    let dictionary = default_dictionary(&config, &root);
    let executor = TestExecutor::new(transport).with_body_logging(config.rest);
    let verbose = config.verbose;
    let mut runner = SuiteRunner::new(executor, dictionary, config);

    match runner.run(&cli.path) {
        Ok(summary) => {
            log::info!(
                "{} passed, {} failed",
                summary.passed,
                summary.failed
            );
            if !summary.is_success() {
                process::exit(1);
            }
        }
        Err(e @ RunError::Aborted { .. }) => {
            println!("{}", e);
        }
        Err(e) => {
            println!("Error running tests: {}", e);
            process::exit(1);
        }
    }

    if verbose {
        println!("\nTotal test duration: {}", format_duration(started.elapsed()));
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Built-in entries, then `--define` values, then the test root.
fn default_dictionary(config: &RunnerConfig, root: &Path) -> Dictionary {
    let mut dictionary = Dictionary::with_entries([
        (SCHEME_KEY, "https".to_string()),
        (HOST_KEY, hostname()),
        ("PASSWORD", "password".to_string()),
        ("VERSION", env!("CARGO_PKG_VERSION").to_string()),
    ]);

    for (key, value) in &config.define {
        dictionary.set(key.clone(), value.clone());
    }

    dictionary.set(ROOT_KEY, root.display().to_string());
    dictionary.set_root(root);
    dictionary
}

/// The machine's host name, qualified with `.local` when it has no domain.
fn hostname() -> String {
    let name = std::env::var("HOSTNAME")
        .ok()
        .or_else(|| fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string());

    if name.contains('.') {
        name
    } else {
        format!("{}.local", name)
    }
}

fn exit(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
