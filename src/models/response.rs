//! Response half of a test specification.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `response` object of a test file: what to expect and what to keep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Expected status code. Zero skips the status check.
    #[serde(default)]
    pub status: u16,

    /// Expected headers. Each listed value must appear as a substring of the
    /// header's received values.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Vec<String>>,

    /// Body received when the test ran.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,

    /// Dictionary keys to set from the response body, mapped to the path of
    /// the value to store.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub save: IndexMap<String, String>,
}

impl ResponseSpec {
    /// Returns true if a specific status code is expected.
    pub fn checks_status(&self) -> bool {
        self.status != 0
    }
}
