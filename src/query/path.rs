//! Dot-notation path parsing.
//!
//! A path is a list of segments separated by unescaped `.` characters. A literal
//! dot inside a segment is written `\.`. Each segment is classified once, up
//! front, so the evaluator never re-inspects raw text.

use std::fmt;

/// Marker used for wildcard array traversal.
pub const WILDCARD: &str = "*";

/// Path that selects the whole document.
pub const WHOLE_DOCUMENT: &str = ".";

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Array element selected by position. Negative values never match.
    Index(i64),

    /// Every element of an array.
    Wildcard,

    /// Object member selected by exact, case-sensitive key.
    Field(String),
}

impl Segment {
    /// Classifies an unescaped segment.
    pub fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            return Segment::Wildcard;
        }

        match raw.parse::<i64>() {
            Ok(index) => Segment::Index(index),
            Err(_) => Segment::Field(raw.to_string()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(index) => write!(f, "{}", index),
            Segment::Wildcard => f.write_str(WILDCARD),
            Segment::Field(name) => f.write_str(&name.replace('.', "\\.")),
        }
    }
}

/// Splits a path expression on unescaped dots and classifies each part.
///
/// # Examples
///
/// ```
/// use apitest::query::path::{split_path, Segment};
///
/// let segments = split_path(r"items.*.file\.name");
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Field("items".to_string()),
///         Segment::Wildcard,
///         Segment::Field("file.name".to_string()),
///     ]
/// );
/// ```
pub fn split_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'.') => {
                chars.next();
                current.push('.');
            }
            '.' => segments.push(Segment::parse(&std::mem::take(&mut current))),
            _ => current.push(ch),
        }
    }

    segments.push(Segment::parse(&current));
    segments
}

/// Renders segments back into path syntax, re-escaping literal dots.
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_path() {
        assert_eq!(
            split_path("data.items"),
            vec![
                Segment::Field("data".to_string()),
                Segment::Field("items".to_string())
            ]
        );
    }

    #[test]
    fn test_split_single_segment() {
        assert_eq!(split_path("status"), vec![Segment::Field("status".to_string())]);
    }

    #[test]
    fn test_integer_segments() {
        assert_eq!(
            split_path("items.1.-2"),
            vec![
                Segment::Field("items".to_string()),
                Segment::Index(1),
                Segment::Index(-2)
            ]
        );
    }

    #[test]
    fn test_escaped_dot_stays_in_segment() {
        assert_eq!(
            split_path(r"headers.content\.type"),
            vec![
                Segment::Field("headers".to_string()),
                Segment::Field("content.type".to_string())
            ]
        );
    }

    #[test]
    fn test_backslash_without_dot_is_literal() {
        assert_eq!(split_path(r"a\b"), vec![Segment::Field(r"a\b".to_string())]);
    }

    #[test]
    fn test_join_segments_round_trips_escapes() {
        let path = r"items.*.file\.name.0";
        assert_eq!(join_segments(&split_path(path)), path);
    }
}
