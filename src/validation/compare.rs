//! Ordering of extracted values against expected values.
//!
//! Values arrive as text. Two values are compared as integers when both parse
//! as `i64`, otherwise as floating point when both parse as `f64`, and
//! otherwise lexicographically. Integer comparison comes first so that large
//! integers are not rounded through `f64`.

use std::cmp::Ordering;

/// How a pair of values was compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Both values parsed as integers.
    Integer(Ordering),
    /// Both values parsed as floating point numbers.
    Float(Ordering),
    /// At least one value was not numeric.
    Text(Ordering),
}

impl Comparison {
    /// The ordering of the actual value relative to the expected value.
    pub fn ordering(&self) -> Ordering {
        match self {
            Comparison::Integer(ordering)
            | Comparison::Float(ordering)
            | Comparison::Text(ordering) => *ordering,
        }
    }
}

/// Compares `actual` with `expected`.
///
/// # Examples
///
/// ```
/// use apitest::validation::compare::{compare, Comparison};
/// use std::cmp::Ordering;
///
/// assert_eq!(compare("10", "9"), Comparison::Integer(Ordering::Greater));
/// assert_eq!(compare("2.5", "10"), Comparison::Float(Ordering::Less));
/// assert_eq!(compare("apple", "banana"), Comparison::Text(Ordering::Less));
/// ```
pub fn compare(actual: &str, expected: &str) -> Comparison {
    if let (Ok(a), Ok(b)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return Comparison::Integer(a.cmp(&b));
    }

    if let (Ok(a), Ok(b)) = (actual.parse::<f64>(), expected.parse::<f64>()) {
        if let Some(ordering) = a.partial_cmp(&b) {
            return Comparison::Float(ordering);
        }
    }

    Comparison::Text(actual.cmp(expected))
}
