//! Field-level predicates shared by the intake checks.
//!
//! Format checks run against the raw value; only the "required" check trims
//! whitespace. A contact number with a leading space is not ten digits.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern is valid"));

static CONTACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("contact pattern is valid"));

// Deliberately permissive: consecutive dots and unknown TLDs pass.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is valid"));

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));

/// True when the value is empty after trimming whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Only ASCII digits, at least one of which is non-zero.
///
/// No width limit: the value is never parsed, so an odometer reading longer
/// than any machine integer is still a positive whole number.
pub fn is_positive_integer(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit()) && value.bytes().any(|b| b != b'0')
}

/// Exactly four digit characters, not all zero.
pub fn is_year(value: &str) -> bool {
    YEAR.is_match(value) && is_positive_integer(value)
}

/// Exactly ten digit characters: no separators, no country code.
pub fn is_contact_number(value: &str) -> bool {
    CONTACT.is_match(value)
}

/// `<local>@<domain>.<tld>`, none of the parts empty or containing `@`.
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// The shape is checked before chrono sees the value, because chrono on its
/// own accepts unpadded months and days.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
