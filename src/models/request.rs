//! Request half of a test specification.
//!
//! This module defines the `request` object of a test file along with the
//! HTTP method it names and the rendering of its body into request text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Parses a method name, ignoring case. An empty name means GET.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "" | "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            "PATCH" => Ok(HttpMethod::PATCH),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            "HEAD" => Ok(HttpMethod::HEAD),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The `request` object of a test file.
///
/// ```json
/// "request": {
///     "method": "POST",
///     "endpoint": "/api/users",
///     "params": { "verbose": "true" },
///     "headers": { "Authorization": ["Bearer {{API_TOKEN}}"] },
///     "body": { "name": "{{USER}}" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Absolute URL, or a path starting with `/` that is resolved against
    /// the `SCHEME`, `HOST` and `PORT` dictionary entries.
    pub endpoint: String,

    /// Query parameters, appended to the URL in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,

    /// Request headers. A header may carry several values.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Vec<String>>,

    /// Method name as written in the test file. Empty means GET.
    #[serde(default)]
    pub method: String,

    /// Inline body of any JSON type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// File whose raw contents replace the inline body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl RequestSpec {
    /// Returns true if the endpoint is relative to the server root.
    pub fn is_root_relative(&self) -> bool {
        self.endpoint.starts_with('/')
    }

    /// Renders the inline body as request text.
    ///
    /// Strings are sent as-is, numbers and booleans in their canonical form,
    /// arrays and objects as compact JSON. A missing or null body renders as
    /// an empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use apitest::models::RequestSpec;
    /// use serde_json::json;
    ///
    /// let mut request = RequestSpec::default();
    /// assert_eq!(request.body_text(), "");
    ///
    /// request.body = Some(json!({"name": "alice"}));
    /// assert_eq!(request.body_text(), r#"{"name":"alice"}"#);
    ///
    /// request.body = Some(json!("raw text"));
    /// assert_eq!(request.body_text(), "raw text");
    /// ```
    pub fn body_text(&self) -> String {
        match &self.body {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(value @ (Value::Array(_) | Value::Object(_))) => value.to_string(),
        }
    }
}
