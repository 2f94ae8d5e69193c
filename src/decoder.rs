//! Record decoding: format detection, splitting and per-field parsing.
//!
//! Decoding is a two-stage pipeline. [`decode_raw`] detects or applies the
//! format and cuts the text into raw wire values, collecting structural
//! problems. [`Decoder::decode`] then parses every field, runs the
//! cross-field rules and returns a [`Record`] whose report lists every
//! problem found. Decoding never fails outright; a broken record is still
//! returned, with its errors.
//!
//! # Example
//!
//! ```
//! use euring::{Decoder, EuringFormat};
//!
//! let text = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let record = Decoder::new().decode(text);
//!
//! assert_eq!(record.format(), EuringFormat::Euring2000Plus);
//! assert!(record.errors().is_empty());
//! ```

use crate::config::{DecodeOptions, LookupPolicy, PromotionPolicy};
use crate::formats::{EuringFormat, EURING2000_RECORD_LENGTH, FIELD_SEPARATOR};
use crate::record::Record;
use crate::rules::{accuracy_is_alphabetic, requires_euring2020, RawValues};
use crate::schema::Schema;
use std::sync::Arc;
use tracing::debug;

/// Index of `accuracy_of_coordinates` among the delimited tokens.
const ACCURACY_OF_COORDINATES_INDEX: usize = 25;

/// Guess the format of a record from its text.
///
/// Text without `|` is EURING2000. Delimited text with more than 60 tokens,
/// or with an alphabetic coordinate accuracy, is EURING2020; otherwise it is
/// EURING2000+.
#[must_use]
pub fn detect_format(text: &str) -> EuringFormat {
    let layout = detect_layout(text);
    if layout != EuringFormat::Euring2000Plus {
        return layout;
    }
    let accuracy = text
        .split(FIELD_SEPARATOR)
        .nth(ACCURACY_OF_COORDINATES_INDEX)
        .unwrap_or("");
    if !accuracy.is_empty() && accuracy.chars().all(char::is_alphabetic) {
        return EuringFormat::Euring2020;
    }
    EuringFormat::Euring2000Plus
}

/// Format implied by the shape of the text alone: separators and token
/// count, ignoring the values.
fn detect_layout(text: &str) -> EuringFormat {
    if !text.contains(FIELD_SEPARATOR) {
        EuringFormat::Euring2000
    } else if text.split(FIELD_SEPARATOR).count() > EuringFormat::Euring2000Plus.field_count() {
        EuringFormat::Euring2020
    } else {
        EuringFormat::Euring2000Plus
    }
}

/// Raw wire values cut from a record, before any field parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Format used to cut the text.
    pub format: EuringFormat,
    /// Wire text by key. Holds every field of `format`; delimited text also
    /// keeps tokens for later canonical fields when present.
    pub values: RawValues,
    /// Structural problems.
    pub errors: Vec<String>,
    /// Whether the text was unusable and no values were cut.
    pub fatal: bool,
}

/// Cut record text into raw wire values.
///
/// A `format` hint is used as given; otherwise the format is detected.
/// Structural conflicts are recorded, not raised. Empty text is fatal and
/// yields no values.
#[must_use]
pub fn decode_raw(text: &str, format: Option<EuringFormat>) -> RawRecord {
    let format = format.unwrap_or_else(|| detect_format(text));
    let mut raw = RawRecord {
        format,
        values: RawValues::new(),
        errors: Vec::new(),
        fatal: false,
    };

    if text.is_empty() {
        raw.errors.push("Record is an empty string.".to_string());
        raw.fatal = true;
        return raw;
    }

    let schema = Schema::standard();
    let has_separator = text.contains(FIELD_SEPARATOR);

    if format.is_fixed_width() {
        if has_separator {
            raw.errors.push(format!(
                "Format \"{format}\" should not contain pipe characters (\"|\")."
            ));
        }
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != EURING2000_RECORD_LENGTH {
            raw.errors.push(format!(
                "Format \"{format}\" should be exactly {EURING2000_RECORD_LENGTH} characters, found {}.",
                chars.len()
            ));
        }
        for (i, field) in schema.fields_for(format).iter().enumerate() {
            let value = schema
                .fixed_width_span(i)
                .map(|(start, length)| {
                    let end = (start + length).min(chars.len());
                    chars.get(start..end).map_or_else(String::new, |s| s.iter().collect())
                })
                .unwrap_or_default();
            raw.values.insert(field.key, value);
        }
        if chars.len() > EURING2000_RECORD_LENGTH {
            let rest: String = chars[EURING2000_RECORD_LENGTH..].iter().collect();
            if !rest.trim().is_empty() {
                raw.errors.push(format!(
                    "Record contains data beyond position {EURING2000_RECORD_LENGTH}."
                ));
            }
        }
    } else {
        if !has_separator {
            raw.errors.push(format!(
                "Format \"{format}\" should contain values separated by pipe characters (\"|\")."
            ));
        }
        let tokens: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        let count = format.field_count();
        let extra = tokens
            .iter()
            .skip(count)
            .filter(|t| !t.trim().is_empty())
            .count();
        if extra > 0 {
            raw.errors.push(format!(
                "Record has {extra} non-empty values beyond the {count} fields of {format}."
            ));
        }
        for (i, field) in schema.fields().iter().enumerate() {
            match tokens.get(i) {
                Some(token) => {
                    raw.values.insert(field.key, (*token).to_string());
                }
                None if i < count => {
                    raw.values.insert(field.key, String::new());
                }
                None => break,
            }
        }
    }
    raw
}

/// Configurable record decoder.
///
/// # Examples
///
/// ```
/// use euring::config::PromotionPolicy;
/// use euring::{Decoder, EuringFormat};
///
/// let decoder = Decoder::new()
///     .with_format(EuringFormat::Euring2020)
///     .with_promotion(PromotionPolicy::Silent);
/// let record = decoder.decode("");
/// assert_eq!(record.errors().record, ["Record is an empty string."]);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    options: DecodeOptions,
    schema: Arc<Schema>,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl Decoder {
    /// Decoder with default options and the standard schema.
    #[must_use]
    pub fn new() -> Self {
        Decoder {
            options: DecodeOptions::default(),
            schema: Schema::standard(),
        }
    }

    /// Replace all options.
    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode as `format` instead of detecting it.
    #[must_use]
    pub fn with_format(mut self, format: EuringFormat) -> Self {
        self.options.format = Some(format);
        self
    }

    /// Set how promotions are reported.
    #[must_use]
    pub fn with_promotion(mut self, promotion: PromotionPolicy) -> Self {
        self.options.promotion = promotion;
        self
    }

    /// Set how lookup misses are handled.
    #[must_use]
    pub fn with_lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.options.lookup_policy = policy;
        self
    }

    /// Use a custom schema (lookups, type rules).
    #[must_use]
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = schema;
        self
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one record.
    ///
    /// The returned record is non-strict and carries every structural,
    /// field and rule error found.
    #[must_use]
    pub fn decode(&self, text: &str) -> Record {
        let hint = self.options.format;
        let raw = decode_raw(text, Some(hint.unwrap_or_else(|| detect_layout(text))));
        let mut format = raw.format;

        if !raw.fatal
            && hint.is_none()
            && format == EuringFormat::Euring2000Plus
            && requires_euring2020(&raw.values)
        {
            format = EuringFormat::Euring2020;
            debug!(
                alphabetic_accuracy = accuracy_is_alphabetic(&raw.values),
                "promoting EURING2000+ record to EURING2020"
            );
        }
        debug!(%format, structural_errors = raw.errors.len(), "decoding record");

        let mut record = Record::with_schema(format, Arc::clone(&self.schema))
            .with_strict(false)
            .with_lookup_policy(self.options.lookup_policy);
        if format != raw.format && self.options.promotion == PromotionPolicy::Advisory {
            record.add_note(format!(
                "Record was promoted from {} to {format} because it uses EURING2020-only values.",
                raw.format
            ));
        }
        record.load_raw(raw.values, raw.errors, raw.fatal);
        record
    }
}

/// Decode one record with default options.
///
/// Shorthand for [`Record::decode`].
#[must_use]
pub fn decode(text: &str, format: Option<EuringFormat>) -> Record {
    Record::decode(text, format)
}
