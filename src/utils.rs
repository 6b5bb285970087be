//! Cell normalization helpers shared by the loaders and the link matcher.

use crate::constants::case_key::{OFFICE_TOKEN, REPORT_LABEL_TOKEN};
use crate::types::{BadgeNumber, CaseKey};

/// Recognized null spellings, applied once at ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullSentinels {
    tokens: Vec<String>,
}

impl NullSentinels {
    /// Build a sentinel set from explicit tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `value` (after trimming) is one of the null spellings.
    pub fn is_null(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.tokens.iter().any(|token| token == trimmed)
    }

    /// Convert a raw cell into `None` when it spells a null, otherwise keep it.
    pub fn normalize(&self, value: &str) -> Option<String> {
        if self.is_null(value) {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Trim a badge number for use as a join key; blank badges never match.
pub fn normalize_badge<T: AsRef<str>>(badge: T) -> Option<BadgeNumber> {
    let trimmed = badge.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Derive the link join key from a report number or case name.
///
/// Strips the leading `"OPA Case "` label once, then removes every remaining
/// `"OPA"` token, and trims the result:
/// - `OPA Case 2021OPA-0100` => `2021-0100`
/// - `OPA Case 0100` => `0100`
/// - `2021OPA-0100` => `2021-0100`
pub fn case_name_key<T: AsRef<str>>(name: T) -> CaseKey {
    let name = name.as_ref().trim();
    let unlabeled = name.strip_prefix(REPORT_LABEL_TOKEN).unwrap_or(name);
    unlabeled.replace(OFFICE_TOKEN, "").trim().to_string()
}

/// Render an optional cell as text, with missing values as the empty string.
pub fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}
