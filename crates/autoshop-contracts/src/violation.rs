//! Validation violation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which rule an intake field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A mandatory field is empty.
    MissingField,
    /// The year is not exactly four digits.
    YearFormat,
    /// A numeric field is not a positive whole number.
    NotPositiveInteger,
    /// The contact number is not exactly ten digits.
    ContactFormat,
    /// The email address does not look like `local@domain.tld`.
    EmailFormat,
    /// A service date is missing.
    DateMissing,
    /// A service date is not a real `YYYY-MM-DD` calendar date.
    DateFormat,
}

/// A single human-readable reason an intake failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The form label of the offending field, e.g. `"Seating Capacity"`.
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
