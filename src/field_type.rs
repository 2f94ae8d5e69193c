//! EURING field types and their character-class checks.
//!
//! The letters accepted by alphabetic and alphanumeric fields are governed
//! by [`TypeRules`], so a caller that needs to accept lower-case or extended
//! letters can swap the predicate without touching the field table.

use crate::error::{EuringError, Result};
use crate::utils::is_all_hyphens;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

lazy_static! {
    static ref NUMERIC: Regex = Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid regex");
    static ref NUMERIC_SIGNED: Regex =
        Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").expect("valid regex");
}

/// Character class of a EURING field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    /// Letters only.
    Alphabetic,
    /// Letters and digits.
    Alphanumeric,
    /// Digits, or an all-hyphen "unknown" placeholder.
    Integer,
    /// Unsigned decimal literal.
    Numeric,
    /// Decimal literal with an optional leading `+` or `-`.
    NumericSigned,
    /// Printable text without the field separator.
    Text,
}

impl FieldType {
    /// Human-readable type name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Alphabetic => "Alphabetic",
            FieldType::Alphanumeric => "Alphanumeric",
            FieldType::Integer => "Integer",
            FieldType::Numeric => "Numeric",
            FieldType::NumericSigned => "Numeric signed",
            FieldType::Text => "Text",
        }
    }

    /// Whether values of this type are zero-padded numbers.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Numeric | FieldType::NumericSigned
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pluggable character-class predicates.
///
/// The default accepts ASCII upper-case letters as "letters".
#[derive(Debug, Clone, Copy)]
pub struct TypeRules {
    /// Predicate for a single letter.
    pub is_letter: fn(char) -> bool,
}

impl Default for TypeRules {
    fn default() -> Self {
        TypeRules {
            is_letter: |c| c.is_ascii_uppercase(),
        }
    }
}

impl TypeRules {
    /// Rules that also accept ASCII lower-case letters.
    #[must_use]
    pub fn case_insensitive() -> Self {
        TypeRules {
            is_letter: |c| c.is_ascii_alphabetic(),
        }
    }

    /// Whether `value` is a well-formed literal of `field_type`.
    ///
    /// The empty string matches no type.
    #[must_use]
    pub fn matches(&self, field_type: FieldType, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match field_type {
            FieldType::Alphabetic => value.chars().all(self.is_letter),
            FieldType::Alphanumeric => value
                .chars()
                .all(|c| (self.is_letter)(c) || c.is_ascii_digit()),
            FieldType::Integer => {
                value.bytes().all(|b| b.is_ascii_digit()) || is_all_hyphens(value)
            }
            FieldType::Numeric => NUMERIC.is_match(value),
            FieldType::NumericSigned => NUMERIC_SIGNED.is_match(value),
            FieldType::Text => value.chars().all(|c| c != '|' && !c.is_control()),
        }
    }

    /// Check `value` against `field_type`.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::InvalidType`] when the value does not match.
    pub fn check(&self, field_type: FieldType, value: &str) -> Result<()> {
        if self.matches(field_type, value) {
            Ok(())
        } else {
            Err(EuringError::InvalidType(format!(
                "Value \"{value}\" is not valid for type {field_type}."
            )))
        }
    }
}
