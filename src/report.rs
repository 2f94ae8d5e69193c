//! Validation reports.
//!
//! Decoding and validation never stop at the first problem. Every
//! structural, field-level and cross-field violation is collected into a
//! [`ValidationReport`], keeping the three namespaces apart so that a
//! structural message can never be confused with a field named the same.

use crate::error::{ErrorKind, EuringError};
use crate::field::FieldDefinition;
use serde::Serialize;
use std::fmt;

/// One field-level or rule-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Display name of the field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
    /// The offending wire text.
    pub value: String,
    /// Machine key of the field.
    pub key: &'static str,
    /// Canonical index of the field.
    pub index: usize,
    /// 1-based character position (EURING2000 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Character width (EURING2000 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Classification of the failure.
    pub kind: ErrorKind,
    /// Whether this is a required field left empty.
    #[serde(skip)]
    pub required_empty: bool,
}

impl FieldError {
    /// Build an error for `field` from a parse or rule failure.
    #[must_use]
    pub fn from_error(
        field: &FieldDefinition,
        index: usize,
        value: &str,
        error: &EuringError,
    ) -> Self {
        FieldError {
            field: field.name,
            message: error.to_string(),
            value: value.to_string(),
            key: field.key,
            index,
            position: None,
            length: None,
            kind: error.kind(),
            required_empty: error.is_required_empty(),
        }
    }

    /// Build a constraint error with a plain message.
    #[must_use]
    pub fn constraint(field: &FieldDefinition, index: usize, value: &str, message: &str) -> Self {
        FieldError::from_error(
            field,
            index,
            value,
            &EuringError::Constraint(message.to_string()),
        )
    }

    /// Attach the fixed-width span; `start` is zero-based.
    #[must_use]
    pub fn at_span(mut self, start: usize, length: usize) -> Self {
        self.position = Some(start + 1);
        self.length = Some(length);
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let (Some(position), Some(length)) = (self.position, self.length) {
            write!(f, " (position {position}, length {length})")?;
        }
        Ok(())
    }
}

/// All problems found in one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Structural problems with the record as a whole.
    pub record: Vec<String>,
    /// Per-field parse failures.
    pub fields: Vec<FieldError>,
    /// Cross-field rule violations.
    pub rules: Vec<FieldError>,
    /// Advisory notes; never errors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ValidationReport {
    /// Whether no errors were found. Notes do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.is_empty() && self.fields.is_empty() && self.rules.is_empty()
    }

    /// Total number of errors across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.record.len() + self.fields.len() + self.rules.len()
    }

    /// Whether the report blocks serialization.
    ///
    /// In strict mode every error is fatal. Otherwise a required field left
    /// empty is tolerated and everything else is fatal.
    #[must_use]
    pub fn has_fatal(&self, strict: bool) -> bool {
        if strict {
            return !self.is_empty();
        }
        !self.record.is_empty()
            || !self.rules.is_empty()
            || self.fields.iter().any(|e| !e.required_empty)
    }

    /// Whether any field or rule error names `field` (display name or key).
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.field_errors(field).next().is_some()
    }

    /// Field and rule errors for `field` (display name or key).
    pub fn field_errors<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.fields
            .iter()
            .chain(&self.rules)
            .filter(move |e| e.field == field || e.key == field)
    }

    /// Drop all errors and notes.
    pub fn clear(&mut self) {
        self.record.clear();
        self.fields.clear();
        self.rules.clear();
        self.notes.clear();
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let messages = self
            .record
            .iter()
            .map(ToString::to_string)
            .chain(self.fields.iter().chain(&self.rules).map(ToString::to_string));
        for message in messages {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(&message)?;
            first = false;
        }
        if first {
            f.write_str("no errors")?;
        }
        Ok(())
    }
}
