//! Token substitution.
//!
//! Replaces `{{KEY}}` markers with the resolved value of `KEY`. The input is
//! scanned once: text produced by a substitution is never scanned again, so a
//! value that itself contains `{{OTHER}}` is inserted literally. The only
//! exception is a `$file` value, whose file contents are substituted before
//! they are inserted.
//!
//! Markers naming keys that are not in the dictionary are left untouched.

use super::{directive, Dictionary, DictionaryError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Maximum nesting of `$file` inclusions.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Matches `{{KEY}}` where KEY contains no braces.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("Failed to compile token regex"));

/// Substitutes every known `{{KEY}}` marker in `text`.
///
/// Each distinct key is resolved once per call, so a `$seq` key used twice in
/// the same text receives the same number both times.
///
/// # Examples
///
/// ```
/// use apitest::dictionary::{apply, Dictionary};
///
/// let dictionary = Dictionary::with_entries([("HOST", "localhost"), ("PORT", "8080")]);
///
/// let text = "http://{{HOST}}:{{PORT}}/{{UNKNOWN}}";
/// assert_eq!(apply(&dictionary, text).unwrap(), "http://localhost:8080/{{UNKNOWN}}");
/// ```
pub fn apply(dictionary: &Dictionary, text: &str) -> Result<String, DictionaryError> {
    substitute(dictionary, text, 0)
}

/// Substitutes text read from an included file.
pub(crate) fn apply_nested(
    dictionary: &Dictionary,
    text: &str,
    depth: usize,
    origin: &Path,
) -> Result<String, DictionaryError> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(DictionaryError::IncludeDepth {
            path: origin.display().to_string(),
        });
    }

    substitute(dictionary, text, depth)
}

fn substitute(dictionary: &Dictionary, text: &str, depth: usize) -> Result<String, DictionaryError> {
    // Fast path: nothing that could be a marker
    if !text.contains("{{") {
        return Ok(text.to_string());
    }

    let mut resolved: HashMap<&str, String> = HashMap::new();
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    let mut last_match_end = 0;

    for cap in TOKEN_REGEX.captures_iter(text) {
        let (Some(marker), Some(key)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        let key = key.as_str();
        let Some(stored) = dictionary.get(key) else {
            continue;
        };

        if !resolved.contains_key(key) {
            let value = directive::resolve(dictionary, stored, None, depth)?;
            resolved.insert(key, value);
        }

        result.push_str(&text[last_match_end..marker.start()]);
        if let Some(value) = resolved.get(key) {
            result.push_str(value);
        }
        last_match_end = marker.end();
    }

    result.push_str(&text[last_match_end..]);
    Ok(result)
}
