//! Email canonicalization shared by every store backend.

use regex::Regex;

/// Canonical form used as the uniqueness key: trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape check on already-normalized input.
///
/// Stores never call this; it guards the HTTP boundary only.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email_normalized))
}
