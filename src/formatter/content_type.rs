//! Content type detection and classification.
//!
//! Bodies logged with `--rest` are rendered according to their content type:
//! JSON is pretty-printed, text is shown line by line, anything else as a hex
//! preview.

use serde::{Deserialize, Serialize};

/// Content type classification for request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// JSON data (application/json, application/problem+json, ...)
    Json,
    /// Any textual format other than JSON (text/*, XML, HTML)
    Text,
    /// Binary data, or text that is not valid UTF-8
    Binary,
}

impl ContentType {
    /// Returns the heading word used when logging a body.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "JSON",
            ContentType::Text => "Text",
            ContentType::Binary => "Binary",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detects the content type from a Content-Type header value and the body.
///
/// The header wins when it names JSON or a textual type. Without a usable
/// header the body is inspected.
///
/// # Examples
///
/// ```
/// use apitest::formatter::content_type::{detect_content_type, ContentType};
///
/// assert_eq!(detect_content_type(Some("application/json; charset=utf-8"), b"{}"), ContentType::Json);
/// assert_eq!(detect_content_type(Some("text/plain"), b"hello"), ContentType::Text);
/// assert_eq!(detect_content_type(None, br#"[1, 2]"#), ContentType::Json);
/// assert_eq!(detect_content_type(None, &[0xff, 0x00]), ContentType::Binary);
/// ```
pub fn detect_content_type(header: Option<&str>, body: &[u8]) -> ContentType {
    if let Some(header) = header {
        let lowered = header.to_lowercase();

        // Parse the content type, ignoring charset and other parameters
        let mime_type = lowered.split(';').next().unwrap_or(&lowered).trim();

        if mime_type.contains("json") {
            return ContentType::Json;
        } else if mime_type.starts_with("text/")
            || mime_type.contains("xml")
            || mime_type.contains("html")
        {
            return ContentType::Text;
        } else if mime_type == "application/octet-stream" || mime_type.starts_with("image/") {
            return ContentType::Binary;
        }
    }

    inspect_body_content(body)
}

/// Guesses the content type from the body itself.
fn inspect_body_content(body: &[u8]) -> ContentType {
    match std::str::from_utf8(body) {
        Ok(text) => {
            let trimmed = text.trim();
            if (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'))
            {
                ContentType::Json
            } else if trimmed.chars().any(|c| c.is_control() && !c.is_whitespace()) {
                ContentType::Binary
            } else {
                ContentType::Text
            }
        }
        Err(_) => ContentType::Binary,
    }
}
