//! Cleanup tasks run after a test's validations pass.
//!
//! ```json
//! "tasks": [
//!     { "command": "delete", "parameters": ["downloads/{{REPORT}}.csv"] }
//! ]
//! ```
//!
//! `delete` removes each named file. Parameters are substituted through the
//! dictionary and relative paths resolve against the test root.

use crate::dictionary::{Dictionary, DictionaryError};
use crate::models::Task;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by cleanup tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Unknown task command: {0}")]
    UnknownCommand(String),

    #[error("task parameter substitution failed: {0}")]
    Substitution(#[from] DictionaryError),

    #[error("unable to delete file {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Runs one task. The command name is matched case-insensitively.
pub fn execute_task(dictionary: &Dictionary, task: &Task) -> Result<(), TaskError> {
    match task.command.to_lowercase().as_str() {
        "delete" => delete_files(dictionary, &task.parameters),
        _ => {
            log::info!("  Task       {}, unknown task", task.command);
            Err(TaskError::UnknownCommand(task.command.clone()))
        }
    }
}

fn delete_files(dictionary: &Dictionary, names: &[String]) -> Result<(), TaskError> {
    for name in names {
        let name = dictionary.apply(name)?;
        let path = absolute(&dictionary.resolve_path(&name));

        log::info!("  Task       deleting file: {}", path.display());

        fs::remove_file(&path).map_err(|source| {
            log::info!("  Task       deleting file: {}, err={}", path.display(), source);
            TaskError::Delete {
                path: path.display().to_string(),
                source,
            }
        })?;
    }

    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
