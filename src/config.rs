//! Configuration options for decoding and conversion.
//!
//! Both option structs implement `Default` and serde `Deserialize`, so
//! callers can embed them in their own configuration files.
//!
//! # Examples
//!
//! ```
//! use euring::config::{ConvertOptions, DecodeOptions, LookupPolicy};
//! use euring::EuringFormat;
//!
//! let decode = DecodeOptions {
//!     lookup_policy: LookupPolicy::Report,
//!     ..Default::default()
//! };
//! assert_eq!(decode.format, None);
//!
//! let convert: ConvertOptions =
//!     serde_json::from_str(r#"{"target": "2000+", "force": true}"#).unwrap();
//! assert_eq!(convert.target, EuringFormat::Euring2000Plus);
//! assert!(convert.force);
//! ```

use crate::formats::EuringFormat;
use serde::Deserialize;
use std::fmt;

/// What happens when a EURING2000+ record is promoted to EURING2020.
///
/// Promotion only happens when no format was requested and the values
/// need EURING2020 (2020-only fields or an alphabetic accuracy code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionPolicy {
    /// Promote without comment.
    Silent,
    /// Promote and add a note to the report.
    #[default]
    Advisory,
}

/// What happens when a description lookup cannot resolve a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// Leave the description empty and add a note.
    #[default]
    Ignore,
    /// Record a lookup error against the field.
    Report,
}

impl fmt::Display for LookupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Report => write!(f, "report"),
        }
    }
}

/// Options for [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Format to decode as; detected from the text when `None`.
    pub format: Option<EuringFormat>,
    /// Promotion reporting.
    pub promotion: PromotionPolicy,
    /// Lookup miss handling.
    pub lookup_policy: LookupPolicy,
}

/// Options for [`convert_with`](crate::converter::convert_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Source format; detected from the text when `None`.
    pub source: Option<EuringFormat>,
    /// Target format.
    pub target: EuringFormat,
    /// Allow lossy downgrades.
    pub force: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            source: None,
            target: EuringFormat::Euring2020,
            force: false,
        }
    }
}
