//! Chilean mobile number normalization.
//!
//! Accepted shapes after stripping everything but digits:
//! - `9XXXXXXXX` (9 digits, local mobile) becomes `+569XXXXXXXX`
//! - `569XXXXXXXX` (11 digits) becomes `+569XXXXXXXX`
//!
//! A value already in `+569XXXXXXXX` form (12 chars) passes through unchanged.

use crate::error::NostraError;

/// Result of classifying a raw phone string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneCheck {
    /// Dialable `+569...` number.
    Valid(String),
    /// No accepted shape matched. Carries the digits-only form for recording.
    Invalid(String),
}

impl PhoneCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The normalized number when valid, the digits-only input otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid(s) | Self::Invalid(s) => s,
        }
    }

    /// Convert into a `Result`, failing with [`NostraError::InvalidPhoneFormat`].
    pub fn into_result(self) -> Result<String, NostraError> {
        match self {
            Self::Valid(s) => Ok(s),
            Self::Invalid(s) => Err(NostraError::InvalidPhoneFormat(s)),
        }
    }
}

/// Keep only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Classify and normalize a raw phone string.
pub fn normalize(raw: &str) -> PhoneCheck {
    let trimmed = raw.trim();
    if trimmed.len() == 12
        && trimmed.starts_with("+569")
        && trimmed[1..].bytes().all(|b| b.is_ascii_digit())
    {
        return PhoneCheck::Valid(trimmed.to_string());
    }

    let digits = digits_only(trimmed);
    if digits.len() == 9 && digits.starts_with('9') {
        PhoneCheck::Valid(format!("+56{digits}"))
    } else if digits.len() == 11 && digits.starts_with("569") {
        PhoneCheck::Valid(format!("+{digits}"))
    } else {
        PhoneCheck::Invalid(digits)
    }
}
