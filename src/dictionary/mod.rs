//! Substitution dictionary for test runs.
//!
//! The dictionary maps token names to string values. Any text passed through
//! [`Dictionary::apply`] has its `{{NAME}}` markers replaced with the current
//! value of `NAME`. Values are seeded from defaults, `dictionary.json` files and
//! `--define` flags, and are updated from response bodies after each test so
//! later tests can reuse them.
//!
//! Stored values may be directives that are resolved every time they are
//! substituted; see [`directive`].
//!
//! # Example
//!
//! ```
//! use apitest::dictionary::Dictionary;
//!
//! let mut dictionary = Dictionary::new();
//! dictionary.set("HOST", "api.example.com");
//! dictionary.set("ID", "$seq");
//!
//! assert_eq!(dictionary.apply("https://{{HOST}}/users").unwrap(), "https://api.example.com/users");
//! assert_eq!(dictionary.apply("id={{ID}}").unwrap(), "id=0");
//! assert_eq!(dictionary.apply("id={{ID}}").unwrap(), "id=1");
//! ```

pub mod capture;
pub mod directive;
pub mod loader;
pub mod substitution;

pub use capture::update;
pub use directive::{gibberish, Directive};
pub use loader::load;
pub use substitution::apply;

use crate::query::QueryError;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Key whose value replaces the default abort sentinel.
pub const ABORT_SENTINEL_KEY: &str = "CONNECTION_REFUSED";

/// Key holding the default URL scheme for root-relative endpoints.
pub const SCHEME_KEY: &str = "SCHEME";

/// Key holding the default host for root-relative endpoints.
pub const HOST_KEY: &str = "HOST";

/// Key holding the optional port for root-relative endpoints.
pub const PORT_KEY: &str = "PORT";

/// Key holding the absolute path of the test root.
pub const ROOT_KEY: &str = "ROOT";

/// Errors raised while loading, resolving or updating dictionary values.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// A `$file` directive named a file that could not be read.
    #[error("failed to read file {path}: {source}")]
    FileInclude {
        path: String,
        #[source]
        source: io::Error,
    },

    /// `$file` directives nested deeper than the include limit.
    #[error("file inclusion nested too deeply at {path}")]
    IncludeDepth { path: String },

    /// A dictionary file exists but could not be read.
    #[error("failed to read dictionary {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A dictionary file is not a JSON object of strings.
    #[error("invalid dictionary {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A saved value could not be extracted from the response body.
    #[error("unable to save {{{{{key}}}}} from '{path}': {source}")]
    Extract {
        key: String,
        path: String,
        #[source]
        source: QueryError,
    },
}

/// Process-wide store of substitution values.
///
/// The store is an owned value passed explicitly to whoever needs it. Writes go
/// through `&mut self`; the `$seq` counter is atomic so substitution only needs
/// a shared borrow.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: HashMap<String, String>,
    sequence: AtomicU64,
    root: Option<PathBuf>,
}

impl Dictionary {
    /// Creates an empty dictionary with the sequence counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dictionary pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dictionary = Self::new();
        for (key, value) in entries {
            dictionary.set(key, value);
        }
        dictionary
    }

    /// Looks up the stored (unresolved) value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Creates or overwrites the value of `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns true if `key` has a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over stored entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Advances the `$seq` counter and returns the value it yields.
    ///
    /// The first call in a process returns 0 and every later call returns
    /// exactly one more than the previous one.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    /// Directory that `$file` paths are resolved against during substitution.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Sets the directory used to resolve `$file` paths.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = Some(root.into());
    }

    /// Resolves `path` against the test root, if one is set.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }

    /// Replaces every known `{{KEY}}` marker in `text`.
    pub fn apply(&self, text: &str) -> Result<String, DictionaryError> {
        substitution::apply(self, text)
    }

    /// Merges the contents of a dictionary file into this store.
    pub fn load(&mut self, path: &Path) -> Result<(), DictionaryError> {
        loader::load(self, path)
    }

    /// Stores values extracted from `body` under their target keys.
    pub fn update(
        &mut self,
        body: &str,
        extractions: &IndexMap<String, String>,
    ) -> Result<(), DictionaryError> {
        capture::update(self, body, extractions)
    }
}
