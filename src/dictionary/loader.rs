//! Dictionary file loader.
//!
//! A dictionary file is a JSON object mapping token names to string values:
//!
//! ```json
//! {
//!     "HOST": "localhost",
//!     "PORT": "8443",
//!     "SESSION": "$uuid",
//!     "PAYLOAD": "$file payloads/user.json",
//!     "HOME_DIR": "$HOME"
//! }
//! ```
//!
//! Directives are resolved once, when the file is loaded, and the resolved text
//! is stored. `$file` paths are relative to the dictionary file's directory.
//! `$seq` is stored unresolved so it keeps counting at substitution time. Any
//! other `$NAME` value is replaced by environment variable `NAME` when that is
//! set and non-empty.

use super::directive::{self, Directive};
use super::{Dictionary, DictionaryError};
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::Path;

/// Default file name of a per-directory dictionary.
pub const DICTIONARY_FILE_NAME: &str = "dictionary.json";

/// Loads `path` into `dictionary`, overwriting existing keys.
///
/// A file that does not exist is treated as an empty dictionary. Read errors
/// and malformed JSON are reported.
pub fn load(dictionary: &mut Dictionary, path: &Path) -> Result<(), DictionaryError> {
    load_entries(dictionary, path).map(|_| ())
}

/// Loads `path` into `dictionary` and returns the number of entries stored.
pub fn load_entries(dictionary: &mut Dictionary, path: &Path) -> Result<usize, DictionaryError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("No dictionary at {}", path.display());
            return Ok(0);
        }
        Err(source) => {
            return Err(DictionaryError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let entries: IndexMap<String, String> =
        serde_json::from_str(&content).map_err(|source| DictionaryError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let count = entries.len();

    for (key, value) in entries {
        let value = resolve_at_load(dictionary, &value, base)?;
        dictionary.set(key, value);
    }

    log::info!("Loaded {} dictionary entries from {}", count, path.display());
    Ok(count)
}

fn resolve_at_load(
    dictionary: &Dictionary,
    value: &str,
    base: &Path,
) -> Result<String, DictionaryError> {
    match Directive::parse(value) {
        Directive::Sequence => Ok(value.to_string()),
        Directive::Literal(text) => match text.strip_prefix('$') {
            Some(name) if !name.is_empty() => Ok(directive::env_or(name, text)),
            _ => Ok(text.to_string()),
        },
        _ => directive::resolve(dictionary, value, Some(base), 0),
    }
}
