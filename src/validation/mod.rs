//! Validation of response bodies.
//!
//! Each [`ValidationRule`] selects values from the response body with a path
//! query and compares them with an expected value using an [`Operator`]:
//!
//! ```json
//! "tests": [
//!     { "name": "status ok",  "query": "status",       "value": "ok" },
//!     { "name": "three rows", "query": "rows.*",       "op": "len", "value": "3" },
//!     { "name": "fresh",      "query": "meta.version", "op": "ge",  "value": "{{VERSION}}" }
//! ]
//! ```
//!
//! Rules run in order and validation stops at the first failure.

pub mod compare;
pub mod operator;

pub use compare::{compare, Comparison};
pub use operator::{Operator, UnknownOperator};

use crate::dictionary::{Dictionary, DictionaryError};
use crate::models::ValidationRule;
use crate::query::{self, QueryError};
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

/// Why a validation rule did not pass.
///
/// Every variant names the test and the rule it came from.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The rule's operator token is not recognized.
    #[error("{test}, {rule}: {source}")]
    InvalidOperator {
        test: String,
        rule: String,
        #[source]
        source: UnknownOperator,
    },

    /// A `len` rule whose expected value is not a count.
    #[error("{test}, {rule}: invalid length '{value}'")]
    InvalidLength {
        test: String,
        rule: String,
        value: String,
    },

    /// The expected value could not be substituted.
    #[error("{test}, {rule}: {source}")]
    Substitution {
        test: String,
        rule: String,
        #[source]
        source: DictionaryError,
    },

    /// The rule's path could not be evaluated against the body.
    #[error("{test}, {rule}: {source}")]
    Query {
        test: String,
        rule: String,
        #[source]
        source: QueryError,
    },

    /// An operator that needs a value had none to compare.
    #[error("{test}, {rule}: expected a value, found none")]
    NoValue { test: String, rule: String },

    /// The comparison did not hold.
    #[error("{test}, {rule}: expected {} '{expected}', got {actual}", .operator.description())]
    Mismatch {
        test: String,
        rule: String,
        operator: Operator,
        expected: String,
        actual: String,
    },
}

impl ValidationError {
    /// The description of the test that failed.
    pub fn test(&self) -> &str {
        match self {
            ValidationError::InvalidOperator { test, .. }
            | ValidationError::InvalidLength { test, .. }
            | ValidationError::Substitution { test, .. }
            | ValidationError::Query { test, .. }
            | ValidationError::NoValue { test, .. }
            | ValidationError::Mismatch { test, .. } => test,
        }
    }

    /// The name of the rule that failed.
    pub fn rule(&self) -> &str {
        match self {
            ValidationError::InvalidOperator { rule, .. }
            | ValidationError::InvalidLength { rule, .. }
            | ValidationError::Substitution { rule, .. }
            | ValidationError::Query { rule, .. }
            | ValidationError::NoValue { rule, .. }
            | ValidationError::Mismatch { rule, .. } => rule,
        }
    }
}

/// Runs `rules` against `body`, stopping at the first failure.
///
/// # Arguments
///
/// * `dictionary` - Used to substitute each rule's expected value
/// * `test` - Description of the test, carried into errors
/// * `body` - Response body; must be JSON when there is at least one rule
/// * `rules` - Rules to evaluate in order
///
/// # Examples
///
/// ```
/// use apitest::dictionary::Dictionary;
/// use apitest::models::ValidationRule;
/// use apitest::validation::validate;
///
/// let dictionary = Dictionary::with_entries([("EXPECTED", "ok")]);
/// let rules = vec![ValidationRule::new("status", "status", "eq", "{{EXPECTED}}")];
///
/// assert!(validate(&dictionary, "health", r#"{"status": "ok"}"#, &rules).is_ok());
///
/// let err = validate(&dictionary, "health", r#"{"status": "fail"}"#, &rules).unwrap_err();
/// assert_eq!(err.to_string(), "health, status: expected equal to 'ok', got 'fail'");
/// ```
pub fn validate(
    dictionary: &Dictionary,
    test: &str,
    body: &str,
    rules: &[ValidationRule],
) -> Result<(), ValidationError> {
    let Some(first) = rules.first() else {
        return Ok(());
    };

    let document: Value = serde_json::from_str(body).map_err(|err| ValidationError::Query {
        test: test.to_string(),
        rule: first.name.clone(),
        source: QueryError::from(err),
    })?;

    for rule in rules {
        validate_rule(dictionary, test, &document, rule)?;
    }

    Ok(())
}

/// Runs a single rule against an already parsed document.
pub fn validate_rule(
    dictionary: &Dictionary,
    test: &str,
    document: &Value,
    rule: &ValidationRule,
) -> Result<(), ValidationError> {
    let operator: Operator = rule.op.parse().map_err(|source| ValidationError::InvalidOperator {
        test: test.to_string(),
        rule: rule.name.clone(),
        source,
    })?;

    let expected = dictionary
        .apply(&rule.value)
        .map_err(|source| ValidationError::Substitution {
            test: test.to_string(),
            rule: rule.name.clone(),
            source,
        })?;

    log::info!(
        "  Checking   {}: {} {} '{}'",
        rule.name,
        rule.query,
        operator,
        expected
    );

    let query_failed = |source| ValidationError::Query {
        test: test.to_string(),
        rule: rule.name.clone(),
        source,
    };

    let outcome = match operator {
        Operator::Length => {
            let count = query::count(document, &rule.query).map_err(query_failed)?;
            check_length(&expected, count)
        }
        _ => {
            let results = query::query(document, &rule.query).map_err(query_failed)?;
            check(operator, &expected, &results)
        }
    };

    outcome.map_err(|failure| failure.into_error(test, &rule.name, expected))
}

/// Outcome of a failed comparison, before test and rule context is attached.
enum Failure {
    NoValue,
    InvalidLength,
    Mismatch { operator: Operator, actual: String },
}

impl Failure {
    fn into_error(self, test: &str, rule: &str, expected: String) -> ValidationError {
        let test = test.to_string();
        let rule = rule.to_string();
        match self {
            Failure::NoValue => ValidationError::NoValue { test, rule },
            Failure::InvalidLength => ValidationError::InvalidLength {
                test,
                rule,
                value: expected,
            },
            Failure::Mismatch { operator, actual } => ValidationError::Mismatch {
                test,
                rule,
                operator,
                expected,
                actual,
            },
        }
    }
}

fn check(operator: Operator, expected: &str, results: &[String]) -> Result<(), Failure> {
    let holds = match operator {
        Operator::Exists => return first(results).map(|_| ()),
        Operator::Equals => results.iter().any(|value| value == expected),
        Operator::NotEquals => results.iter().any(|value| value != expected),
        Operator::Length => return check_length(expected, results.len()),
        Operator::Contains => first(results)?.contains(expected),
        Operator::NotContains => !first(results)?.contains(expected),
        Operator::LessThan => compare(first(results)?, expected).ordering() == Ordering::Less,
        Operator::LessOrEqual => compare(first(results)?, expected).ordering() != Ordering::Greater,
        Operator::GreaterOrEqual => compare(first(results)?, expected).ordering() != Ordering::Less,
        Operator::GreaterThan => compare(first(results)?, expected).ordering() == Ordering::Greater,
    };

    if holds {
        Ok(())
    } else {
        Err(Failure::Mismatch {
            operator,
            actual: render_results(results),
        })
    }
}

fn check_length(expected: &str, count: usize) -> Result<(), Failure> {
    let wanted: usize = expected.trim().parse().map_err(|_| Failure::InvalidLength)?;
    if count == wanted {
        return Ok(());
    }
    Err(Failure::Mismatch {
        operator: Operator::Length,
        actual: count.to_string(),
    })
}

fn first(results: &[String]) -> Result<&str, Failure> {
    results.first().map(String::as_str).ok_or(Failure::NoValue)
}

/// Renders results for a failure message: a single value quoted, several
/// values as a bracketed list.
fn render_results(results: &[String]) -> String {
    match results {
        [single] => format!("'{}'", single),
        _ => {
            let quoted: Vec<String> = results.iter().map(|value| format!("'{}'", value)).collect();
            format!("[{}]", quoted.join(", "))
        }
    }
}
