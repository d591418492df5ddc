//! Normalized coin identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider coin id (e.g. `bitcoin`), trimmed and lower-cased
///
/// Normalization happens once, at construction, so every cache key and
/// upstream URL built from a `Symbol` is case-insensitive with respect to the
/// caller's input.
///
/// # Examples
///
/// ```
/// use coinchart::Symbol;
///
/// assert_eq!(Symbol::new(" BTC "), Symbol::new("btc"));
/// assert_eq!(Symbol::new("Ethereum").as_str(), "ethereum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize a raw symbol
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// The normalized id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization left nothing behind
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Upper-cased form used in chart titles
    pub fn display_upper(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
