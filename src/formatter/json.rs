//! JSON pretty-printing for logged bodies.

use crate::formatter::FormatError;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Bodies larger than this (1MB) are logged as received.
const MAX_PRETTY_SIZE: usize = 1024 * 1024;

/// Re-indents a JSON body with two spaces per level.
///
/// # Arguments
///
/// * `body` - Raw body bytes
///
/// # Returns
///
/// The indented text, or a `FormatError` if the body is too large, is not
/// valid JSON, or cannot be rendered as UTF-8.
///
/// # Examples
///
/// ```
/// use apitest::formatter::json::pretty_json;
///
/// let pretty = pretty_json(br#"{"token":"abc","ttl":60}"#).unwrap();
/// assert_eq!(pretty, "{\n  \"token\": \"abc\",\n  \"ttl\": 60\n}");
/// ```
pub fn pretty_json(body: &[u8]) -> Result<String, FormatError> {
    if body.len() > MAX_PRETTY_SIZE {
        return Err(FormatError::ResponseTooLarge(body.len()));
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| FormatError::JsonError(e.to_string()))?;

    let mut out = Vec::with_capacity(body.len() * 2);
    let mut serializer = serde_json::Serializer::with_formatter(
        &mut out,
        serde_json::ser::PrettyFormatter::with_indent(b"  "),
    );
    value
        .serialize(&mut serializer)
        .map_err(|e| FormatError::JsonError(e.to_string()))?;

    String::from_utf8(out).map_err(|e| FormatError::EncodingError(e.to_string()))
}

/// Indented JSON when the body parses, otherwise the body as lossy text.
pub fn pretty_or_raw(body: &[u8]) -> Cow<'_, str> {
    match pretty_json(body) {
        Ok(pretty) => Cow::Owned(pretty),
        Err(err) => {
            log::debug!("Logging body unformatted: {}", err);
            String::from_utf8_lossy(body)
        }
    }
}
