//! Suite runner.
//!
//! A suite is a directory tree of test files:
//!
//! ```text
//! tests/
//! ├── dictionary.json        entries for this directory and below
//! ├── 01-login.json
//! ├── 02-profile.json
//! └── admin/
//!     ├── dictionary.json
//!     └── 01-users.json
//! ```
//!
//! Each directory first loads its dictionary file, then runs its
//! subdirectories in name order, then its own `.json` test files in name
//! order. Every test file is stripped of comments and substituted as a whole
//! before it is parsed.
//!
//! When a failure's text contains the abort sentinel (by default "connection
//! refused") the server is assumed to be unavailable and the whole run stops.
//! A failing test marked `"abort": true` stops the run the same way.

pub mod comments;

pub use comments::strip_comments;

use crate::config::RunnerConfig;
use crate::dictionary::{Dictionary, DictionaryError, ABORT_SENTINEL_KEY};
use crate::executor::{error_chain, TestError, TestExecutor, Transport};
use crate::formatter;
use crate::models::TestSpec;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a test file could not be run or did not pass.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Substitution(#[from] DictionaryError),

    #[error("invalid test file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Test(#[from] TestError),
}

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The server looks unavailable, or a test marked `abort` failed.
    #[error("Server testing unavailable, {reason}")]
    Aborted {
        reason: String,
        summary: SuiteSummary,
    },

    #[error("unable to load dictionary: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("unable to read directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result of one test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    /// File name without its directory.
    pub file: String,
    /// Path of the file.
    pub path: PathBuf,
    /// The test's description, if it could be parsed.
    pub description: String,
    /// Time spent waiting for the response.
    pub duration: Duration,
    /// Failure text, or `None` if the test passed.
    pub error: Option<String>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    /// Test files not run because the run was aborted.
    pub skipped: usize,
    /// Wall-clock time of the whole run.
    pub duration: Duration,
    /// Per-file results in execution order.
    pub results: Vec<TestResult>,
}

impl SuiteSummary {
    /// Returns true if no test failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, result: TestResult) {
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }
}

/// What stopped a directory early.
struct Abort {
    reason: String,
}

/// Runs test directories through a [`TestExecutor`].
pub struct SuiteRunner<T> {
    executor: TestExecutor<T>,
    dictionary: Dictionary,
    config: RunnerConfig,
    abort_sentinel: String,
}

impl<T: Transport> SuiteRunner<T> {
    /// Creates a runner that starts from `dictionary`.
    pub fn new(executor: TestExecutor<T>, dictionary: Dictionary, config: RunnerConfig) -> Self {
        let abort_sentinel = config.abort_sentinel.clone();
        Self {
            executor,
            dictionary,
            config,
            abort_sentinel,
        }
    }

    /// The dictionary as it stands, including values saved by tests.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The sentinel currently matched against failures.
    pub fn abort_sentinel(&self) -> &str {
        &self.abort_sentinel
    }

    /// Runs every test under `path`.
    ///
    /// # Returns
    ///
    /// The summary of the run, or `RunError::Aborted` carrying the summary so
    /// far when the run was stopped early.
    pub fn run(&mut self, path: &Path) -> Result<SuiteSummary, RunError> {
        let started = Instant::now();
        let mut summary = SuiteSummary::default();

        let outcome = self.run_directory(path, &mut summary);
        summary.duration = started.elapsed();

        match outcome? {
            Some(abort) => Err(RunError::Aborted {
                reason: abort.reason,
                summary,
            }),
            None => Ok(summary),
        }
    }

    fn run_directory(
        &mut self,
        dir: &Path,
        summary: &mut SuiteSummary,
    ) -> Result<Option<Abort>, RunError> {
        log::info!("Testing suite {}...", dir.display());

        self.dictionary
            .load(&dir.join(&self.config.dictionary_file))?;

        if let Some(sentinel) = self.dictionary.get(ABORT_SENTINEL_KEY) {
            self.abort_sentinel = sentinel.to_string();
        }

        let (subdirs, files) = self.list_directory(dir)?;

        for (index, subdir) in subdirs.iter().enumerate() {
            if let Some(abort) = self.run_directory(subdir, summary)? {
                let remaining: usize = subdirs[index + 1..]
                    .iter()
                    .map(|rest| self.count_tests(rest))
                    .sum();
                summary.skipped += remaining + files.len();
                return Ok(Some(abort));
            }
        }

        for (index, file) in files.iter().enumerate() {
            let name = file_name(file);
            let (spec, result) = self.run_file(file);

            let description = spec.as_ref().map(|s| s.description.clone()).unwrap_or_default();
            let abort_on_failure = spec.as_ref().is_some_and(|s| s.abort);

            match result {
                Ok(duration) => {
                    println!("{}{}", self.pad(), formatter::format_pass(&name, duration));
                    summary.record(TestResult {
                        file: name,
                        path: file.clone(),
                        description,
                        duration,
                        error: None,
                    });
                }
                Err(err) => {
                    let text = error_chain(&err);

                    if self.is_abort(&text) {
                        log::warn!("{}: {}", name, text);
                        summary.skipped += files.len() - index;
                        return Ok(Some(Abort { reason: text }));
                    }

                    println!("{}{}", self.pad(), formatter::format_fail(&name, &err));
                    summary.record(TestResult {
                        file: name,
                        path: file.clone(),
                        description,
                        duration: Duration::ZERO,
                        error: Some(text.clone()),
                    });

                    if abort_on_failure {
                        summary.skipped += files.len() - index - 1;
                        return Ok(Some(Abort { reason: text }));
                    }
                }
            }
        }

        Ok(None)
    }

    /// Runs one test file. Returns the parsed test, when parsing got that
    /// far, along with the result.
    pub fn run_file(&mut self, path: &Path) -> (Option<TestSpec>, Result<Duration, FileError>) {
        let mut test = match self.load_test(path) {
            Ok(test) => test,
            Err(err) => return (None, Err(err)),
        };

        if test.description.is_empty() {
            log::info!("Running {}", file_name(path));
        } else {
            log::info!("Running {}, {}", file_name(path), test.description);
        }

        let result = self
            .executor
            .execute(&mut test, &mut self.dictionary)
            .map(|outcome| outcome.duration)
            .map_err(FileError::from);

        (Some(test), result)
    }

    fn load_test(&self, path: &Path) -> Result<TestSpec, FileError> {
        let raw = fs::read_to_string(path).map_err(|source| FileError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let text = self.dictionary.apply(&strip_comments(&raw))?;

        TestSpec::from_json(&text).map_err(|source| FileError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn list_directory(&self, dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), RunError> {
        let read_error = |source| RunError::ReadDir {
            path: dir.display().to_string(),
            source,
        };

        let mut subdirs = Vec::new();
        let mut files = Vec::new();

        for entry in fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();

            if path.is_dir() {
                subdirs.push(path);
            } else if is_test_file(&path, &self.config.dictionary_file) {
                files.push(path);
            }
        }

        subdirs.sort();
        files.sort();
        Ok((subdirs, files))
    }

    /// Number of test files under `dir` and its subdirectories. Unreadable
    /// directories count as empty.
    fn count_tests(&self, dir: &Path) -> usize {
        match self.list_directory(dir) {
            Ok((subdirs, files)) => {
                files.len() + subdirs.iter().map(|sub| self.count_tests(sub)).sum::<usize>()
            }
            Err(err) => {
                log::debug!("Not counting skipped tests: {}", err);
                0
            }
        }
    }

    fn is_abort(&self, text: &str) -> bool {
        let sentinel = self.abort_sentinel.to_lowercase();
        !sentinel.is_empty() && text.to_lowercase().contains(&sentinel)
    }

    fn pad(&self) -> &'static str {
        if self.config.verbose {
            "  "
        } else {
            ""
        }
    }
}

fn is_test_file(path: &Path, dictionary_file: &str) -> bool {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let is_dictionary = path
        .file_name()
        .is_some_and(|name| name == dictionary_file);
    is_json && !is_dictionary
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
