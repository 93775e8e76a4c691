//! Input validation helpers for registration

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email regex");
}

/// Check that a string looks like an email address
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check that a string's character count lies within `[min, max]`
pub fn validate_length(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

/// Derive a username candidate from a first and last name: lowercased,
/// non-alphanumerics stripped. Uniqueness is the caller's problem (the
/// auth service retries with random digit suffixes against the store).
pub fn username_candidate(first_name: &str, last_name: &str) -> String {
    format!("{first_name}{last_name}")
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
