use crate::domain::model::RawRecord;
use crate::utils::error::{BookError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MISSING_ISBN_MESSAGE: &str = "Document should have either isbn10 or isbn13";

const IDENTIFIER_KEYS: [&str; 2] = ["isbn_10", "isbn_13"];

/// What counts as "present" for the identifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum PresenceMode {
    /// The key exists, whatever its value (`null` included).
    KeyExists,
    /// The key exists and its value is not `null`.
    #[default]
    NonNull,
}

impl PresenceMode {
    fn is_present(self, raw: &RawRecord, key: &str) -> bool {
        match self {
            PresenceMode::KeyExists => raw.contains_key(key),
            PresenceMode::NonNull => raw.get(key).is_some_and(|v| !v.is_null()),
        }
    }
}

impl fmt::Display for PresenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceMode::KeyExists => write!(f, "key-exists"),
            PresenceMode::NonNull => write!(f, "non-null"),
        }
    }
}

/// Checks that a raw record carries `isbn_10` or `isbn_13` before any field
/// is coerced.
pub fn check_presence(raw: &RawRecord, mode: PresenceMode) -> Result<&RawRecord> {
    if IDENTIFIER_KEYS.iter().any(|key| mode.is_present(raw, key)) {
        return Ok(raw);
    }

    Err(BookError::MissingIdentifier {
        title: raw
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        message: MISSING_ISBN_MESSAGE.to_string(),
    })
}
