//! Console formatting: durations, report lines, and logged bodies.

pub mod content_type;
pub mod json;

pub use content_type::{detect_content_type, ContentType};

use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;

/// Width of the file name column in report lines.
const NAME_WIDTH: usize = 30;

/// Lines of hex shown for a binary body.
const HEX_PREVIEW_LINES: usize = 4;

/// Bytes per line of hex preview.
const HEX_BYTES_PER_LINE: usize = 40;

/// Errors that can occur while formatting a body.
#[derive(Debug, Error)]
pub enum FormatError {
    /// JSON parsing or formatting error.
    #[error("JSON formatting error: {0}")]
    JsonError(String),

    /// UTF-8 encoding error.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Body too large to format.
    #[error("Response too large to format: {0} bytes")]
    ResponseTooLarge(usize),
}

/// Formats a duration for report lines.
///
/// Durations under a second use two decimals of the largest fitting unit
/// (`ms` or `µs`) in a six-character field. Longer durations are broken into
/// day, hour, minute and second parts, right-justified to six characters.
///
/// # Examples
///
/// ```
/// use apitest::formatter::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_micros(12_500)), " 12.50ms");
/// assert_eq!(format_duration(Duration::from_secs(65)), " 1m 5s");
/// assert_eq!(format_duration(Duration::from_secs(3)), "    3s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }

    let nanos = duration.as_nanos();

    if duration < Duration::from_secs(1) {
        if nanos > 1_000_000 {
            return format!("{:6.2}ms", nanos as f64 / 1_000_000.0);
        }
        if nanos > 1_000 {
            return format!("{:6.2}µs", nanos as f64 / 1_000.0);
        }
        return format!("{}ns", nanos);
    }

    let total_secs = duration.as_secs();
    let days = total_secs / 86_400;
    let hours = (total_secs / 3_600) % 24;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")]
        .iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| format!("{}{}", amount, unit))
        .collect();

    format!("{:>6}", parts.join(" "))
}

/// Report line for a test that passed.
pub fn format_pass(name: &str, duration: Duration) -> String {
    format!(
        "PASS       {:<width$} {}",
        name,
        format_duration(duration),
        width = NAME_WIDTH
    )
}

/// Report line for a test that failed.
pub fn format_fail(name: &str, error: &dyn std::fmt::Display) -> String {
    format!("FAIL       {:<width$}: {}", name, error, width = NAME_WIDTH)
}

/// Renders a body for the log, or `None` if it is empty.
///
/// JSON is pretty-printed, text is indented line by line, and anything else
/// is shown as a short hex preview.
pub fn format_body(heading: &str, body: &[u8], content_type: Option<&str>) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    let kind = detect_content_type(content_type, body);
    let mut out = String::new();

    match kind {
        ContentType::Json => {
            let formatted = json::pretty_or_raw(body);
            let _ = write!(out, "  {} {}:", kind, heading);
            for line in formatted.lines() {
                let _ = write!(out, "\n    {}", line);
            }
        }
        ContentType::Text => {
            let text = String::from_utf8_lossy(body);
            let _ = write!(out, "  {} {}", kind, heading);
            for line in text.split('\n') {
                let _ = write!(out, "\n    {}", line);
            }
        }
        ContentType::Binary => {
            let _ = write!(out, "  {} {}", kind, heading);
            for (index, chunk) in body
                .chunks(HEX_BYTES_PER_LINE)
                .take(HEX_PREVIEW_LINES)
                .enumerate()
            {
                let hex: String = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                let _ = write!(out, "\n    {:3}: {}", index * HEX_BYTES_PER_LINE, hex);
            }
        }
    }

    Some(out)
}

/// Logs a body at info level when `enabled`.
pub fn log_body(enabled: bool, heading: &str, body: &[u8], content_type: Option<&str>) {
    if !enabled {
        return;
    }
    if let Some(text) = format_body(heading, body, content_type) {
        log::info!("{}", text);
    }
}
