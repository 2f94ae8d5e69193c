//! EURING wire formats and output formats.
//!
//! EURING records travel in three co-existing layouts:
//!
//! | Format | Layout | Fields |
//! |--------|--------|--------|
//! | [`EURING2000`](EuringFormat::Euring2000) | 94-character fixed width | 33 |
//! | [`EURING2000+`](EuringFormat::Euring2000Plus) | pipe-delimited | 60 |
//! | [`EURING2020`](EuringFormat::Euring2020) | pipe-delimited | 64 |
//!
//! The field lists nest: EURING2000 uses the first 33 canonical fields,
//! EURING2000+ the first 60, EURING2020 all 64.
//!
//! The [`RecordReader`] and [`RecordWriter`] traits give a uniform streaming
//! interface over record sources and sinks.
//!
//! # Example
//!
//! ```
//! use euring::EuringFormat;
//!
//! let format: EuringFormat = "2000+".parse().unwrap();
//! assert_eq!(format, EuringFormat::Euring2000Plus);
//! assert_eq!(format.to_string(), "EURING2000+");
//! assert_eq!(format.field_count(), 60);
//! ```

mod traits;

pub use traits::{RecordIterator, RecordReader, RecordReaderExt, RecordWriter};

use crate::error::EuringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Total character width of a EURING2000 record.
pub const EURING2000_RECORD_LENGTH: usize = 94;

/// Field separator of the delimited formats.
pub const FIELD_SEPARATOR: char = '|';

/// The three EURING record layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EuringFormat {
    /// Fixed-width 94-character layout with 33 fields.
    Euring2000,
    /// Pipe-delimited layout with 60 fields.
    Euring2000Plus,
    /// Pipe-delimited layout with 64 fields.
    Euring2020,
}

impl EuringFormat {
    /// All formats, oldest first.
    pub const ALL: [EuringFormat; 3] = [
        EuringFormat::Euring2000,
        EuringFormat::Euring2000Plus,
        EuringFormat::Euring2020,
    ];

    /// The display name used on the wire and in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EuringFormat::Euring2000 => "EURING2000",
            EuringFormat::Euring2000Plus => "EURING2000+",
            EuringFormat::Euring2020 => "EURING2020",
        }
    }

    /// Number of canonical fields in this layout.
    #[must_use]
    pub fn field_count(self) -> usize {
        match self {
            EuringFormat::Euring2000 => 33,
            EuringFormat::Euring2000Plus => 60,
            EuringFormat::Euring2020 => 64,
        }
    }

    /// Whether records in this format are fixed-width rather than delimited.
    #[must_use]
    pub fn is_fixed_width(self) -> bool {
        matches!(self, EuringFormat::Euring2000)
    }

    /// Normalize a user-supplied format name.
    ///
    /// Accepts the display names and the common short aliases, ignoring case
    /// and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::UnknownFormat`] for anything else.
    pub fn normalize(name: &str) -> Result<Self, EuringError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euring2000" | "2000" => Ok(EuringFormat::Euring2000),
            "euring2000plus" | "euring2000+" | "euring2000p" | "2000plus" | "2000+"
            | "2000p" => Ok(EuringFormat::Euring2000Plus),
            "euring2020" | "2020" => Ok(EuringFormat::Euring2020),
            _ => Err(EuringError::UnknownFormat(name.to_string())),
        }
    }
}

impl FromStr for EuringFormat {
    type Err = EuringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EuringFormat::normalize(s)
    }
}

impl fmt::Display for EuringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for EuringFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for EuringFormat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        EuringFormat::normalize(&name).map_err(serde::de::Error::custom)
    }
}

/// How a serialized record is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// EURING wire text in the record's own format.
    #[default]
    Euring,
    /// JSON projection produced by [`Record::to_dict`](crate::Record::to_dict).
    Json {
        /// Pretty-print with indentation.
        pretty: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        for alias in ["euring2000", "2000", " EURING2000 "] {
            assert_eq!(EuringFormat::normalize(alias).unwrap(), EuringFormat::Euring2000);
        }
        for alias in [
            "euring2000plus",
            "EURING2000+",
            "euring2000p",
            "2000plus",
            "2000+",
            "2000P",
        ] {
            assert_eq!(
                EuringFormat::normalize(alias).unwrap(),
                EuringFormat::Euring2000Plus
            );
        }
        for alias in ["euring2020", "2020"] {
            assert_eq!(EuringFormat::normalize(alias).unwrap(), EuringFormat::Euring2020);
        }
    }

    #[test]
    fn test_normalize_unknown() {
        let err = EuringFormat::normalize("euring1966").unwrap_err();
        assert!(matches!(err, EuringError::UnknownFormat(_)));
    }

    #[test]
    fn test_display_and_counts() {
        assert_eq!(EuringFormat::Euring2000.to_string(), "EURING2000");
        assert_eq!(EuringFormat::Euring2000Plus.to_string(), "EURING2000+");
        assert_eq!(EuringFormat::Euring2020.to_string(), "EURING2020");
        assert_eq!(EuringFormat::Euring2000.field_count(), 33);
        assert_eq!(EuringFormat::Euring2000Plus.field_count(), 60);
        assert_eq!(EuringFormat::Euring2020.field_count(), 64);
        assert!(EuringFormat::Euring2000.is_fixed_width());
        assert!(!EuringFormat::Euring2020.is_fixed_width());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&EuringFormat::Euring2000Plus).unwrap();
        assert_eq!(json, "\"EURING2000+\"");
        let back: EuringFormat = serde_json::from_str("\"2020\"").unwrap();
        assert_eq!(back, EuringFormat::Euring2020);
    }
}
