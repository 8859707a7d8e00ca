//! Dot-notation query engine for JSON response bodies.
//!
//! A path such as `data.items.*.id` is evaluated against a parsed JSON document
//! and yields the string form of every leaf it reaches, in document order.
//!
//! # Syntax
//!
//! ```text
//! status            object member
//! items.0           array element by index
//! items.*.id        every element of an array
//! meta.file\.name   literal dot inside a member name
//! .                 the whole document
//! ```
//!
//! # Examples
//!
//! ```
//! use apitest::query::query_text;
//!
//! let body = r#"{"items": [{"id": 1}, {"id": 2}]}"#;
//! assert_eq!(query_text(body, "items.*.id").unwrap(), vec!["1", "2"]);
//! assert_eq!(query_text(body, "items.1.id").unwrap(), vec!["2"]);
//! ```

pub mod error;
pub mod path;

pub use error::QueryError;
pub use path::{split_path, Segment};

use serde_json::Value;

/// Evaluates `path` against `document` and returns every matched leaf as text.
///
/// Concrete paths (no wildcard) yield exactly one value or an error. A wildcard
/// path yields the concatenation of the matches of each array element; a
/// wildcard that matches nothing is an error.
pub fn query(document: &Value, path: &str) -> Result<Vec<String>, QueryError> {
    if path == path::WHOLE_DOCUMENT {
        return Ok(vec![stringify(document)]);
    }

    let segments = split_path(path);
    evaluate(document, &segments)
}

/// Evaluates `path` and requires exactly one matching value.
pub fn query_one(document: &Value, path: &str) -> Result<String, QueryError> {
    let mut values = query(document, path)?;

    match values.len() {
        1 => Ok(values.remove(0)),
        0 => Err(QueryError::NoSuchItem {
            path: path.to_string(),
        }),
        _ => Err(QueryError::Ambiguous {
            path: path.to_string(),
        }),
    }
}

/// Counts the values `path` reaches, as checked by length rules.
///
/// A concrete path that ends on an array counts the array's elements, and
/// any other concrete path counts one. A wildcard path counts its matches.
///
/// # Examples
///
/// ```
/// use apitest::query::count;
/// use serde_json::json;
///
/// let body = json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}]});
/// assert_eq!(count(&body, "items").unwrap(), 3);
/// assert_eq!(count(&body, "items.*.id").unwrap(), 3);
/// assert_eq!(count(&body, "items.0").unwrap(), 1);
/// ```
pub fn count(document: &Value, path: &str) -> Result<usize, QueryError> {
    if path == path::WHOLE_DOCUMENT {
        return Ok(size(document));
    }

    let segments = split_path(path);
    if segments.contains(&Segment::Wildcard) {
        return Ok(evaluate(document, &segments)?.len());
    }

    resolve(document, &segments).map(size)
}

/// Parses `text` as JSON and evaluates `path` against it.
pub fn query_text(text: &str, path: &str) -> Result<Vec<String>, QueryError> {
    let document: Value = serde_json::from_str(text)?;
    query(&document, path)
}

/// Parses `text` as JSON and evaluates `path`, requiring exactly one value.
pub fn query_one_text(text: &str, path: &str) -> Result<String, QueryError> {
    let document: Value = serde_json::from_str(text)?;
    query_one(&document, path)
}

/// Renders a JSON value in its canonical textual form.
///
/// Strings are returned without quotes; containers render as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn size(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

/// Walks a wildcard-free path down to the value it names.
fn resolve<'a>(value: &'a Value, segments: &[Segment]) -> Result<&'a Value, QueryError> {
    segments
        .iter()
        .try_fold(value, |current, segment| step(current, segment))
}

fn evaluate(value: &Value, segments: &[Segment]) -> Result<Vec<String>, QueryError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(vec![stringify(value)]);
    };

    match head {
        Segment::Wildcard => {
            let items = expect_array(value, head)?;
            let matches: Vec<String> = items
                .iter()
                .filter_map(|element| evaluate(element, rest).ok())
                .flatten()
                .collect();

            if matches.is_empty() {
                return Err(QueryError::ElementNotFound {
                    path: path::join_segments(segments),
                });
            }

            Ok(matches)
        }

        _ => evaluate(step(value, head)?, rest),
    }
}

/// Follows one index or field segment.
fn step<'a>(value: &'a Value, segment: &Segment) -> Result<&'a Value, QueryError> {
    match segment {
        Segment::Index(index) => {
            let items = expect_array(value, segment)?;
            usize::try_from(*index)
                .ok()
                .and_then(|position| items.get(position))
                .ok_or(QueryError::IndexOutOfRange {
                    index: *index,
                    len: items.len(),
                })
        }

        Segment::Field(name) => match value {
            Value::Object(map) => map.get(name).ok_or_else(|| QueryError::MapElementNotFound {
                name: name.clone(),
            }),
            other => Err(QueryError::NotAMap {
                segment: segment.to_string(),
                found: kind(other),
            }),
        },

        Segment::Wildcard => Err(QueryError::ElementNotFound {
            path: segment.to_string(),
        }),
    }
}

fn expect_array<'a>(value: &'a Value, segment: &Segment) -> Result<&'a Vec<Value>, QueryError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(QueryError::NotAnArray {
            segment: segment.to_string(),
            found: kind(other),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
