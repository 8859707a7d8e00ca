//! Dynamic dictionary values.
//!
//! A stored value that starts with `$` may be a directive. Directives are
//! resolved each time the value is substituted, so `{{ID}}` bound to `$uuid`
//! yields a different UUID on every use:
//!
//! | Stored value    | Substituted with                                   |
//! |-----------------|----------------------------------------------------|
//! | `$uuid`         | a new random UUID                                  |
//! | `$hash`         | a new UUID rendered as compact alphanumeric text   |
//! | `$seq`          | the next value of the dictionary sequence counter  |
//! | `$env NAME`     | environment variable `NAME`, if set and non-empty  |
//! | `$file PATH`    | contents of `PATH`, itself substituted             |
//!
//! Anything else is a literal.

use super::{substitution, Dictionary, DictionaryError};
use std::env;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Digits used by [`gibberish`]; omits characters that are easy to misread.
const GIBBERISH_DIGITS: &[u8] = b"abcdefghjkmnpqrstuvwxyz23456789";

/// A parsed dictionary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Plain text used as-is.
    Literal(&'a str),
    /// `$uuid`
    Uuid,
    /// `$hash`
    Hash,
    /// `$seq`
    Sequence,
    /// `$env NAME`
    Env(&'a str),
    /// `$file PATH`
    File(&'a str),
}

impl<'a> Directive<'a> {
    /// Classifies a stored dictionary value.
    ///
    /// # Examples
    ///
    /// ```
    /// use apitest::dictionary::Directive;
    ///
    /// assert_eq!(Directive::parse("$seq"), Directive::Sequence);
    /// assert_eq!(Directive::parse("$env HOME"), Directive::Env("HOME"));
    /// assert_eq!(Directive::parse("$file body.json"), Directive::File("body.json"));
    /// assert_eq!(Directive::parse("plain"), Directive::Literal("plain"));
    /// ```
    pub fn parse(value: &'a str) -> Self {
        match value {
            "$uuid" => return Directive::Uuid,
            "$hash" => return Directive::Hash,
            "$seq" => return Directive::Sequence,
            _ => {}
        }

        if let Some(path) = value.strip_prefix("$file ") {
            return Directive::File(path.trim());
        }

        if let Some(name) = value.strip_prefix("$env ") {
            return Directive::Env(name.trim());
        }

        Directive::Literal(value)
    }
}

/// Resolves a stored value into the text substituted for its token.
///
/// `$file` paths are resolved against `base` when given, otherwise against the
/// dictionary's test root.
pub fn resolve(
    dictionary: &Dictionary,
    value: &str,
    base: Option<&Path>,
    depth: usize,
) -> Result<String, DictionaryError> {
    let resolved = match Directive::parse(value) {
        Directive::Literal(text) => text.to_string(),
        Directive::Uuid => Uuid::new_v4().to_string(),
        Directive::Hash => gibberish(Uuid::new_v4()),
        Directive::Sequence => dictionary.next_sequence().to_string(),
        Directive::Env(name) => env_or(name, value),
        Directive::File(path) => {
            let full_path = match base {
                Some(dir) => dir.join(path),
                None => dictionary.resolve_path(path),
            };

            let contents =
                fs::read_to_string(&full_path).map_err(|source| DictionaryError::FileInclude {
                    path: full_path.display().to_string(),
                    source,
                })?;

            log::debug!("Including file {}", full_path.display());
            substitution::apply_nested(dictionary, &contents, depth + 1, &full_path)?
        }
    };

    Ok(resolved)
}

/// Returns the environment variable `name`, or `fallback` if it is unset or empty.
pub(crate) fn env_or(name: &str, fallback: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => fallback.to_string(),
    }
}

/// Renders a UUID as a short string of unambiguous letters and digits.
///
/// The UUID is split into two 64-bit halves, each written out least
/// significant digit first in the radix of [`GIBBERISH_DIGITS`]. A UUID of all
/// zero bits renders as `-empty-`.
///
/// # Examples
///
/// ```
/// use apitest::dictionary::gibberish;
/// use uuid::Uuid;
///
/// assert_eq!(gibberish(Uuid::nil()), "-empty-");
/// assert_eq!(gibberish(Uuid::from_u128(1)), "b");
/// ```
pub fn gibberish(uuid: Uuid) -> String {
    let bits = uuid.as_u128();
    let high = (bits >> 64) as u64;
    let low = bits as u64;

    let mut text = String::new();
    push_digits(&mut text, low);
    push_digits(&mut text, high);

    if text.is_empty() {
        return "-empty-".to_string();
    }

    text
}

fn push_digits(text: &mut String, mut value: u64) {
    let radix = GIBBERISH_DIGITS.len() as u64;

    while value > 0 {
        text.push(GIBBERISH_DIGITS[(value % radix) as usize] as char);
        value /= radix;
    }
}
