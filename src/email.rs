//! Email address validation and normalization.

use crate::error::ConfirmError;
use email_address::EmailAddress;
use std::str::FromStr;

/// Validate and normalize an email address.
///
/// Trims whitespace, checks RFC 5322 compliance, and lowercases the result
/// so lookups against the store are consistent.
pub fn email_normalize(email: &str) -> Result<String, ConfirmError> {
    let trimmed = email.trim();

    let parsed = EmailAddress::from_str(trimmed).map_err(|_| ConfirmError::InvalidEmail)?;

    // Only the domain is case-insensitive per RFC, but most providers treat
    // local parts that way too.
    Ok(parsed.as_str().to_lowercase())
}
