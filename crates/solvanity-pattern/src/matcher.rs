//! Pattern specification and matching

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base58 character set: digits and letters excluding the ambiguous 0, O, I, l.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Number of distinct symbols in a Base58 address.
pub const ALPHABET_SIZE: usize = 58;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty (a prefix or a suffix is required)")]
    EmptyPattern,
    #[error("Pattern contains invalid character '{0}' (valid: {BASE58_ALPHABET})")]
    InvalidCharacter(char),
}

/// A vanity pattern: a required prefix and/or suffix on the address.
///
/// Immutable once a search starts. Empty prefix or suffix means
/// "no constraint" on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Required address prefix ("" = unconstrained)
    pub prefix: String,
    /// Required address suffix ("" = unconstrained)
    pub suffix: String,
    /// Whether matching distinguishes case
    pub case_sensitive: bool,
}

impl PatternSpec {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            case_sensitive,
        }
    }

    /// Create a case-sensitive prefix-only pattern
    pub fn prefix(value: impl Into<String>) -> Self {
        Self::new(value, "", true)
    }

    /// Create a case-sensitive suffix-only pattern
    pub fn suffix(value: impl Into<String>) -> Self {
        Self::new("", value, true)
    }

    /// Combined length of prefix and suffix
    pub fn len(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    /// Validate the pattern: non-empty, and every character a member of the
    /// Base58 alphabet. Membership is strict regardless of the case flag,
    /// since the excluded glyphs (0, O, I, l) never appear in an address.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.is_empty() {
            return Err(PatternError::EmptyPattern);
        }
        for c in self.prefix.chars().chain(self.suffix.chars()) {
            if !BASE58_ALPHABET.contains(c) {
                return Err(PatternError::InvalidCharacter(c));
            }
        }
        Ok(())
    }

    /// Check whether an address satisfies this pattern.
    ///
    /// Pure predicate: prefix and suffix must both hold, an empty side holds
    /// trivially. Case-insensitive mode lowercases both the address and the
    /// pattern before comparison.
    pub fn matches(&self, address: &str) -> bool {
        if self.case_sensitive {
            Self::check(address, &self.prefix, &self.suffix)
        } else {
            Self::check(
                &address.to_lowercase(),
                &self.prefix.to_lowercase(),
                &self.suffix.to_lowercase(),
            )
        }
    }

    fn check(address: &str, prefix: &str, suffix: &str) -> bool {
        let prefix_ok = prefix.is_empty() || address.starts_with(prefix);
        let suffix_ok = suffix.is_empty() || address.ends_with(suffix);
        prefix_ok && suffix_ok
    }
}
