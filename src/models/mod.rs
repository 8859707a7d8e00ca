//! Data models for declarative tests.
//!
//! A test file deserializes into a [`TestSpec`]: the request to send, the
//! response to expect, validation rules over the response body, cleanup tasks,
//! and the values to save into the dictionary for later tests.

pub mod request;
pub mod response;
pub mod test_case;

pub use request::{HttpMethod, RequestSpec};
pub use response::ResponseSpec;
pub use test_case::{Task, TestSpec, ValidationRule};
