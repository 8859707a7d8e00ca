//! A complete test: request, expectations, validations and cleanup.

use super::{RequestSpec, ResponseSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One declarative test, as read from a test file.
///
/// Fields after `abort` are filled in while the test runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    /// Free text shown in reports and error messages.
    #[serde(default)]
    pub description: String,

    /// The request to send.
    pub request: RequestSpec,

    /// Expected response and values to save from it.
    #[serde(default)]
    pub response: ResponseSpec,

    /// Checks run against the response body, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<ValidationRule>,

    /// Cleanup commands run after a successful validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,

    /// Skip the rest of the suite if this test fails.
    #[serde(default)]
    pub abort: bool,

    /// Whether the test passed.
    #[serde(rename = "success", default)]
    pub succeeded: bool,

    /// When the test started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    /// Time spent waiting for the response.
    #[serde(skip)]
    pub duration: Duration,
}

impl TestSpec {
    /// Parses a test from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// A single check against the response body.
///
/// ```json
/// { "name": "user is active", "query": "user.active", "op": "eq", "value": "true" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Label used in failure messages.
    #[serde(default)]
    pub name: String,

    /// Path of the values to check.
    pub query: String,

    /// Expected value. Substituted through the dictionary before use.
    #[serde(default)]
    pub value: String,

    /// Operator token. Empty means equality.
    #[serde(default)]
    pub op: String,
}

impl ValidationRule {
    /// Creates a rule from its parts.
    pub fn new(
        name: impl Into<String>,
        query: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            value: value.into(),
            op: op.into(),
        }
    }
}

/// A cleanup command with string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Command name, matched case-insensitively.
    pub command: String,

    /// Command arguments. Substituted before use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_test_file() {
        let test = TestSpec::from_json(
            r#"{
                "description": "create user",
                "abort": true,
                "request": {
                    "method": "POST",
                    "endpoint": "/users",
                    "body": {"name": "{{USER}}"}
                },
                "response": {
                    "status": 201,
                    "headers": {"Content-Type": ["json"]},
                    "save": {"USER_ID": "id"}
                },
                "tests": [
                    {"name": "name echoed", "query": "name", "value": "{{USER}}"},
                    {"name": "id positive", "query": "id", "op": "gt", "value": "0"}
                ],
                "tasks": [
                    {"command": "delete", "parameters": ["out.txt"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(test.description, "create user");
        assert!(test.abort);
        assert_eq!(test.response.status, 201);
        assert_eq!(test.tests.len(), 2);
        assert_eq!(test.tests[0].op, "");
        assert_eq!(test.tests[1], ValidationRule::new("id positive", "id", "gt", "0"));
        assert_eq!(test.tasks[0].command, "delete");
        assert!(!test.succeeded);
        assert!(test.time.is_none());
    }

    #[test]
    fn test_request_is_required() {
        assert!(TestSpec::from_json(r#"{"description": "no request"}"#).is_err());
    }

    #[test]
    fn test_run_fields_serialize() {
        let mut test = TestSpec::from_json(r#"{"request": {"endpoint": "/"}}"#).unwrap();
        test.succeeded = true;
        test.duration = Duration::from_millis(5);

        let value = serde_json::to_value(&test).unwrap();
        assert_eq!(value["success"], serde_json::Value::Bool(true));
        assert!(value.get("duration").is_none());
    }
}
