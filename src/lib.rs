#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
//! # euring: EURING bird-ringing record codec
//!
//! Decode, validate, build, serialize and convert EURING exchange records
//! in all three layouts: fixed-width EURING2000 and pipe-delimited
//! EURING2000+ and EURING2020.
//!
//! ## Quick Start
//!
//! ### Decoding a record
//!
//! ```
//! use euring::{decode, EuringFormat, FieldValue};
//!
//! let text = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let record = decode(text, None);
//!
//! assert_eq!(record.format(), EuringFormat::Euring2000Plus);
//! assert_eq!(record.value("species_mentioned"), Some(&FieldValue::Integer(10)));
//! assert!(record.errors().is_empty());
//! ```
//!
//! ### Building a record
//!
//! ```
//! use euring::{EuringFormat, Record};
//!
//! let mut record = Record::new(EuringFormat::Euring2020);
//! record.set("ringing_scheme", "GBB").unwrap();
//!
//! // New records are strict: missing required fields block serialization.
//! assert!(record.serialize().is_err());
//! ```
//!
//! ### Converting between formats
//!
//! ```
//! use euring::{convert, EuringFormat};
//!
//! let text = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let fixed = convert(text, None, EuringFormat::Euring2000, false).unwrap();
//! assert_eq!(fixed.len(), 94);
//! ```
//!
//! ## Modules
//!
//! - [`record`] - The record model (`Record`, `FieldSlot`)
//! - [`decoder`] - Format detection and decoding
//! - [`converter`] - Conversion between formats
//! - [`schema`] - The 64-field table
//! - [`field`] - Per-field parse, encode and describe
//! - [`rules`] - Cross-field rules
//! - [`coordinates`] - Degrees/minutes/seconds co-ordinate codec
//! - [`reader`] / [`writer`] - Line-oriented streams
//! - [`parallel`] - Rayon batch decoding and conversion
//! - [`error`] - Error types and result type

pub mod config;
pub mod converter;
pub mod coordinates;
pub mod decoder;
pub mod error;
pub mod field;
pub mod field_type;
/// Format identities and the reader/writer traits.
///
/// See the [`formats`] module documentation for the layouts and how to
/// write transport-agnostic code.
pub mod formats;
pub mod lookup;
pub mod parallel;
pub mod parsers;
pub mod reader;
/// The EURING record model (`Record`, `FieldSlot`)
pub mod record;
pub mod report;
pub mod rules;
pub mod schema;
pub mod utils;
pub mod value;
pub mod writer;

pub use config::{ConvertOptions, DecodeOptions, LookupPolicy, PromotionPolicy};
pub use converter::{convert, convert_with};
pub use coordinates::LatLng;
pub use decoder::{decode, detect_format, Decoder};
pub use error::{ErrorKind, EuringError, Result};
pub use field::FieldDefinition;
pub use field_type::{FieldType, TypeRules};
pub use formats::{EuringFormat, OutputFormat, RecordReader, RecordReaderExt, RecordWriter};
pub use lookup::Lookup;
pub use reader::EuringReader;
pub use record::{FieldSlot, Record};
pub use report::{FieldError, ValidationReport};
pub use schema::Schema;
pub use value::FieldValue;
pub use writer::EuringWriter;
