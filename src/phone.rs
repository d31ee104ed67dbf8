//! Phone number sanitizing and formatting.
//!
//! Two representations exist: the draft the user is typing, which is
//! re-formatted on every keystroke, and the canonical `(DDD) DDD-DDDD` form
//! which only ever comes out of exactly ten digits.

use std::fmt;

use crate::error::ValidationError;

/// Number of digits in a valid phone number.
pub const PHONE_DIGITS: usize = 10;

/// Keep only ASCII digits.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Progressive display form for a phone field.
///
/// Digits past the tenth are dropped.
pub fn format_draft(raw: &str) -> String {
    let mut d = digits(raw);
    d.truncate(PHONE_DIGITS);
    match d.len() {
        0..=3 => d,
        4..=6 => format!("({}) {}", &d[..3], &d[3..]),
        _ => format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..]),
    }
}

/// A validated phone number in canonical `(DDD) DDD-DDDD` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a draft: after stripping non-digits exactly ten must remain.
    pub fn parse(draft: &str) -> Result<Self, ValidationError> {
        let d = digits(draft);
        if d.len() != PHONE_DIGITS {
            return Err(ValidationError::DigitCount { found: d.len() });
        }
        Ok(Self(format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..])))
    }

    /// Wrap a value read back from storage. Stored values are trusted as-is.
    pub(crate) fn restored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
