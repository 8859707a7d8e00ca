//! Saving response values into the dictionary.
//!
//! A test's `response.save` map names dictionary keys and the path of the value
//! to store under each:
//!
//! ```json
//! "save": {
//!     "API_TOKEN": "token",
//!     "USER_ID": "user.id"
//! }
//! ```
//!
//! Entries are processed in declaration order. Each path must match exactly
//! one value; the first path that does not stops the update, leaving later
//! keys untouched.

use super::{Dictionary, DictionaryError};
use crate::query::{self, QueryError};
use indexmap::IndexMap;
use serde_json::Value;

/// Keys whose values are never written to the log.
const REDACTED_KEYS: &[&str] = &["API_TOKEN"];

/// Extracts each saved path from `body` and stores it under its key.
pub fn update(
    dictionary: &mut Dictionary,
    body: &str,
    extractions: &IndexMap<String, String>,
) -> Result<(), DictionaryError> {
    let Some((first_key, first_path)) = extractions.first() else {
        return Ok(());
    };

    let document: Value = serde_json::from_str(body).map_err(|err| DictionaryError::Extract {
        key: first_key.clone(),
        path: first_path.clone(),
        source: QueryError::from(err),
    })?;

    for (key, path) in extractions {
        let value =
            query::query_one(&document, path).map_err(|source| DictionaryError::Extract {
                key: key.clone(),
                path: path.clone(),
                source,
            })?;

        if REDACTED_KEYS.contains(&key.as_str()) {
            log::info!("  Updating   {{{{{}}}}} = ***REDACTED***", key);
        } else {
            log::info!("  Updating   {{{{{}}}}} = {}", key, value);
        }

        dictionary.set(key.clone(), value);
    }

    Ok(())
}
