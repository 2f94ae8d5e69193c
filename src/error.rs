//! Error types for EURING operations.
//!
//! This module provides the [`EuringError`] type for all library operations,
//! the coarse [`ErrorKind`] classification, and the [`Result`] convenience type.
//!
//! Field-level problems found while decoding are *not* raised as errors; they
//! are collected into a [`ValidationReport`](crate::report::ValidationReport).
//! An `EuringError` is returned only when an operation as a whole cannot
//! complete (serializing an invalid record, a lossy conversion, a programmer
//! error such as an unknown field key).

use crate::report::ValidationReport;
use serde::Serialize;
use thiserror::Error;

/// Error type for all EURING library operations.
#[derive(Error, Debug)]
pub enum EuringError {
    /// A value does not match the character class of its field type.
    #[error("{0}")]
    InvalidType(String),

    /// A value has the right characters but violates a length, range or
    /// format constraint.
    #[error("{0}")]
    Constraint(String),

    /// A required field was given an empty value.
    #[error("Required field, empty value \"\" is not permitted.")]
    RequiredEmpty,

    /// A code could not be resolved by a description lookup.
    #[error("{0}")]
    Lookup(String),

    /// The record text is structurally unusable.
    #[error("Invalid EURING record: {0}")]
    InvalidRecord(String),

    /// A format name could not be resolved.
    #[error("Unknown EURING format: {0}")]
    UnknownFormat(String),

    /// A field key is not part of the canonical field table.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The record failed validation; the full report is attached.
    #[error("Record failed validation: {0}")]
    Validation(Box<ValidationReport>),

    /// Conversion would drop information and was not forced.
    #[error("Cannot convert to {target} without loss: {}", reasons.join("; "))]
    LossyConversion {
        /// Display name of the requested target format.
        target: String,
        /// Every distinct reason the conversion would lose data.
        reasons: Vec<String>,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of an [`EuringError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Character class violation.
    Type,
    /// Length, range or format violation.
    Constraint,
    /// Unresolvable code.
    Lookup,
    /// Structural or conversion failure of a whole record.
    Format,
    /// Caller misuse (unknown key, unknown format name).
    Usage,
    /// Input/output failure.
    Io,
}

impl EuringError {
    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EuringError::InvalidType(_) => ErrorKind::Type,
            EuringError::Constraint(_) | EuringError::RequiredEmpty => ErrorKind::Constraint,
            EuringError::Lookup(_) => ErrorKind::Lookup,
            EuringError::InvalidRecord(_)
            | EuringError::Validation(_)
            | EuringError::LossyConversion { .. }
            | EuringError::Json(_) => ErrorKind::Format,
            EuringError::UnknownFormat(_) | EuringError::UnknownField(_) => ErrorKind::Usage,
            EuringError::IoError(_) => ErrorKind::Io,
        }
    }

    /// Whether this is the "required field is empty" constraint failure.
    #[must_use]
    pub fn is_required_empty(&self) -> bool {
        matches!(self, EuringError::RequiredEmpty)
    }
}

/// Convenience type alias for [`std::result::Result`] with [`EuringError`].
pub type Result<T> = std::result::Result<T, EuringError>;
