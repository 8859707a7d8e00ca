//! Path query error types.

use thiserror::Error;

/// Errors raised while evaluating a dot-notation path against a JSON document.
///
/// Every variant carries the segment, index or expression that triggered it
/// so a failing validation can be diagnosed from the message alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// An integer segment selected an element outside the array bounds.
    #[error("Index out of range: {index} (array has {len} elements)")]
    IndexOutOfRange { index: i64, len: usize },

    /// A wildcard segment matched no element of the array.
    #[error("Array element not found: {path}")]
    ElementNotFound { path: String },

    /// A field segment named a key the object does not have.
    #[error("Map element not found: {name}")]
    MapElementNotFound { name: String },

    /// An index or wildcard segment was applied to something other than an array.
    #[error("Item is not an array: {segment} (found {found})")]
    NotAnArray { segment: String, found: &'static str },

    /// A field segment was applied to something other than an object.
    #[error("Item is not a map: {segment} (found {found})")]
    NotAMap { segment: String, found: &'static str },

    /// A single value was required but the expression matched several.
    #[error("Ambiguous expression (multiple values): {path}")]
    Ambiguous { path: String },

    /// A single value was required but the expression matched nothing.
    #[error("No such item found: {path}")]
    NoSuchItem { path: String },

    /// The document text was not valid JSON.
    #[error("Invalid JSON document: {0}")]
    InvalidJson(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::InvalidJson(err.to_string())
    }
}
