//! Validation operators.
//!
//! Test files may spell an operator several ways (`eq`, `==`, `equals`, ...).
//! Every spelling is normalized once into an [`Operator`] before evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A comparison applied to the values selected by a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    /// The expected value appears among the results.
    Equals,
    /// At least one result differs from the expected value.
    NotEquals,
    /// The first result is less than the expected value.
    LessThan,
    /// The first result is less than or equal to the expected value.
    LessOrEqual,
    /// The first result is greater than or equal to the expected value.
    GreaterOrEqual,
    /// The first result is greater than the expected value.
    GreaterThan,
    /// The first result contains the expected value.
    Contains,
    /// The first result does not contain the expected value.
    NotContains,
    /// The number of results equals the expected integer.
    Length,
    /// The path resolves; values are not compared.
    Exists,
}

/// Returned when an operator token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid results comparison operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Parses an operator token, ignoring case and surrounding whitespace.
    ///
    /// An empty token means [`Operator::Equals`].
    ///
    /// # Examples
    ///
    /// ```
    /// use apitest::validation::Operator;
    ///
    /// assert_eq!("".parse::<Operator>().unwrap(), Operator::Equals);
    /// assert_eq!("GE".parse::<Operator>().unwrap(), Operator::GreaterOrEqual);
    /// assert_eq!("!contains".parse::<Operator>().unwrap(), Operator::NotContains);
    /// assert!("like".parse::<Operator>().is_err());
    /// ```
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalized = token.trim().to_lowercase();

        let operator = match normalized.as_str() {
            "" | "eq" | ".eq." | "==" | "=" | "equals" | "equal" => Operator::Equals,
            "ne" | ".ne." | "<>" | "!=" | "not equal" | "not-equals" => Operator::NotEquals,
            "lt" | ".lt." | "<" | "less than" | "less-than" => Operator::LessThan,
            "le" | ".le." | "<=" | "less than or equal" | "less-or-equal" => Operator::LessOrEqual,
            "ge" | ".ge." | ">=" | "greater than or equal" | "greater-or-equal" => {
                Operator::GreaterOrEqual
            }
            "gt" | ".gt." | ">" | "greater than" | "greater-than" => Operator::GreaterThan,
            "contains" | ".contains." | "has" | ".has." | "includes" => Operator::Contains,
            "!contains" | "not contains" | ".not contains." | "not-contains" => {
                Operator::NotContains
            }
            "len" | "length" => Operator::Length,
            "exists" => Operator::Exists,
            _ => return Err(UnknownOperator(token.to_string())),
        };

        Ok(operator)
    }
}

impl Operator {
    /// Returns the wording used in failure messages.
    pub fn description(&self) -> &'static str {
        match self {
            Operator::Equals => "equal to",
            Operator::NotEquals => "not equal to",
            Operator::LessThan => "less than",
            Operator::LessOrEqual => "less than or equal to",
            Operator::GreaterOrEqual => "greater than or equal to",
            Operator::GreaterThan => "greater than",
            Operator::Contains => "to contain",
            Operator::NotContains => "not to contain",
            Operator::Length => "length",
            Operator::Exists => "to exist",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "ne",
            Operator::LessThan => "lt",
            Operator::LessOrEqual => "le",
            Operator::GreaterOrEqual => "ge",
            Operator::GreaterThan => "gt",
            Operator::Contains => "contains",
            Operator::NotContains => "!contains",
            Operator::Length => "len",
            Operator::Exists => "exists",
        };
        f.write_str(name)
    }
}
