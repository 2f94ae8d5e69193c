//! Field definitions: per-field parse, encode and describe.
//!
//! A [`FieldDefinition`] is immutable schema data. It knows how wide a field
//! is, which characters it accepts, how to turn wire text into a
//! [`FieldValue`] and how to turn a value back into wire text for a given
//! [`EuringFormat`].
//!
//! # Example
//!
//! ```
//! use euring::{EuringFormat, FieldValue, Schema};
//!
//! let schema = Schema::standard();
//! let species = schema.field("species_mentioned").unwrap();
//!
//! assert_eq!(species.parse("01840").unwrap(), Some(FieldValue::Integer(1840)));
//! assert_eq!(
//!     species
//!         .encode_for_format(Some(&FieldValue::Integer(1840)), EuringFormat::Euring2000Plus)
//!         .unwrap(),
//!     "01840"
//! );
//! ```

use crate::coordinates::validate_combined;
use crate::error::{EuringError, Result};
use crate::field_type::{FieldType, TypeRules};
use crate::formats::EuringFormat;
use crate::lookup::Lookup;
use crate::utils::is_all_hyphens;
use crate::value::FieldValue;

/// Parser hook: turns validated wire text into a typed value.
pub type ParserFn = fn(&str) -> Result<Option<FieldValue>>;

/// Export hook: normalizes a text value before it is written.
pub type ExporterFn = fn(&str) -> String;

/// Schema entry for one EURING field.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Stable machine key, e.g. `"species_mentioned"`.
    pub key: &'static str,
    /// Display name used in reports, e.g. `"Species Mentioned"`.
    pub name: &'static str,
    /// Character class.
    pub field_type: FieldType,
    /// Whether an empty value is a constraint violation.
    pub required: bool,
    /// Exact width, or maximum width when `variable_length` is set.
    pub length: Option<usize>,
    /// Whether shorter values are allowed in the delimited formats.
    pub variable_length: bool,
    /// Placeholder written when the value is absent.
    pub empty_value: Option<&'static str>,
    /// Whether an all-hyphen value is accepted as "unknown".
    pub allow_unknown: bool,
    /// Custom parser replacing the default type coercion.
    pub parser: Option<ParserFn>,
    /// Normalization applied to text values on encode.
    pub exporter: Option<ExporterFn>,
    /// Description source.
    pub lookup: Option<Lookup>,
}

impl FieldDefinition {
    /// Create a required, fixed-length definition with no hooks.
    #[must_use]
    pub fn new(key: &'static str, name: &'static str, field_type: FieldType) -> Self {
        FieldDefinition {
            key,
            name,
            field_type,
            required: true,
            length: None,
            variable_length: false,
            empty_value: None,
            allow_unknown: true,
            parser: None,
            exporter: None,
            lookup: None,
        }
    }

    /// Set the exact width.
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the maximum width and mark the field variable-length.
    #[must_use]
    pub fn max_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self.variable_length = true;
        self
    }

    /// Mark the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Reject the all-hyphen "unknown" placeholder.
    #[must_use]
    pub fn known_only(mut self) -> Self {
        self.allow_unknown = false;
        self
    }

    /// Set the absent-value placeholder.
    #[must_use]
    pub fn empty_value(mut self, placeholder: &'static str) -> Self {
        self.empty_value = Some(placeholder);
        self
    }

    /// Attach a parser hook.
    #[must_use]
    pub fn parser(mut self, parser: ParserFn) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Attach an export hook.
    #[must_use]
    pub fn exporter(mut self, exporter: ExporterFn) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Attach a description lookup.
    #[must_use]
    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Parse wire text with the default [`TypeRules`].
    ///
    /// # Errors
    ///
    /// See [`parse_with`](Self::parse_with).
    pub fn parse(&self, raw: &str) -> Result<Option<FieldValue>> {
        self.parse_with(raw, &TypeRules::default())
    }

    /// Parse wire text into a typed value.
    ///
    /// Empty text is absent for optional fields. An all-hyphen placeholder is
    /// absent when the field allows unknown values.
    ///
    /// # Errors
    ///
    /// - [`EuringError::RequiredEmpty`] for empty text in a required field
    /// - [`EuringError::Constraint`] for a length violation or a parser
    ///   rejection
    /// - [`EuringError::InvalidType`] when the text does not match the field
    ///   type
    pub fn parse_with(&self, raw: &str, rules: &TypeRules) -> Result<Option<FieldValue>> {
        if raw.is_empty() {
            return if self.required {
                Err(EuringError::RequiredEmpty)
            } else {
                Ok(None)
            };
        }
        self.check_length(raw, false)?;
        if self.allow_unknown && is_all_hyphens(raw) {
            return Ok(None);
        }
        rules.check(self.field_type, raw)?;

        match self.parser {
            Some(parser) => parser(raw),
            None => self.coerce(raw).map(Some),
        }
    }

    fn coerce(&self, raw: &str) -> Result<FieldValue> {
        let invalid = || {
            EuringError::InvalidType(format!(
                "Value \"{raw}\" is not valid for type {}.",
                self.field_type
            ))
        };
        match self.field_type {
            FieldType::Integer => raw.parse().map(FieldValue::Integer).map_err(|_| invalid()),
            FieldType::Numeric | FieldType::NumericSigned => {
                raw.parse().map(FieldValue::Decimal).map_err(|_| invalid())
            }
            FieldType::Alphabetic | FieldType::Alphanumeric | FieldType::Text => {
                Ok(FieldValue::Text(raw.to_string()))
            }
        }
    }

    fn check_length(&self, value: &str, exact: bool) -> Result<()> {
        let Some(length) = self.length else {
            return Ok(());
        };
        let actual = value.chars().count();
        if self.variable_length && !exact {
            if actual > length {
                return Err(EuringError::Constraint(format!(
                    "Value \"{value}\" is length {actual}, should be at most {length}."
                )));
            }
        } else if actual != length {
            return Err(EuringError::Constraint(format!(
                "Value \"{value}\" is length {actual} instead of {length}."
            )));
        }
        Ok(())
    }

    /// Text written for an absent value.
    #[must_use]
    pub fn absent_text(&self, format: EuringFormat) -> String {
        if let Some(placeholder) = self.empty_value {
            return placeholder.to_string();
        }
        match self.length {
            Some(length)
                if format.is_fixed_width()
                    || (self.required && self.field_type == FieldType::Integer) =>
            {
                "-".repeat(length)
            }
            _ => String::new(),
        }
    }

    /// Encode with the default [`TypeRules`].
    ///
    /// # Errors
    ///
    /// See [`encode_for_format_with`](Self::encode_for_format_with).
    pub fn encode_for_format(
        &self,
        value: Option<&FieldValue>,
        format: EuringFormat,
    ) -> Result<String> {
        self.encode_for_format_with(value, format, &TypeRules::default())
    }

    /// Encode a value as wire text for `format`.
    ///
    /// Numbers are zero-padded to the field width (sign-aware); decimals lose
    /// trailing zeros; variable-length fields lose leading zeros again in the
    /// delimited formats. The result is re-checked for length (exactly, for
    /// fixed-width output) and type.
    ///
    /// # Errors
    ///
    /// Returns a constraint or type error when the encoded text does not fit
    /// the field.
    pub fn encode_for_format_with(
        &self,
        value: Option<&FieldValue>,
        format: EuringFormat,
        rules: &TypeRules,
    ) -> Result<String> {
        let Some(value) = value else {
            return Ok(self.absent_text(format));
        };

        let mut text = match value {
            FieldValue::Coordinates(position) => {
                if !(position.lat.abs() <= 90.0 && position.lng.abs() <= 180.0) {
                    return Err(EuringError::Constraint(format!(
                        "Position \"{position}\" is out of range."
                    )));
                }
                let text = position.to_euring();
                self.check_length(&text, true)?;
                validate_combined(&text)?;
                return Ok(text);
            }
            FieldValue::Text(s) if s.is_empty() => return Ok(self.absent_text(format)),
            FieldValue::Text(s) if self.field_type == FieldType::Integer && is_all_hyphens(s) => {
                return Ok(self.absent_text(format));
            }
            FieldValue::Text(s) if self.allow_unknown && is_all_hyphens(s) => {
                return Ok(self.length.map_or_else(|| s.clone(), |length| "-".repeat(length)));
            }
            FieldValue::Text(s) => match self.exporter {
                Some(exporter) => exporter(s),
                None => s.clone(),
            },
            FieldValue::Date(date) => date.format("%d%m%Y").to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
        };

        if matches!(
            self.field_type,
            FieldType::Numeric | FieldType::NumericSigned
        ) && text.contains('.')
        {
            text = text.trim_end_matches('0').trim_end_matches('.').to_string();
        }

        if let Some(length) = self.length {
            if self.field_type.is_numeric() && !is_all_hyphens(&text) {
                text = zero_pad(&text, length);
            }
        }
        let fixed = format.is_fixed_width();
        if self.variable_length && !fixed {
            text = strip_leading_zeros(&text);
        }

        self.check_length(&text, fixed)?;
        rules.check(self.field_type, &text)?;
        Ok(text)
    }

    /// Describe a value through the attached lookup.
    ///
    /// Geographical co-ordinates describe themselves when no lookup is set.
    ///
    /// # Errors
    ///
    /// Returns the lookup's error when it cannot resolve the value.
    pub fn describe(&self, value: Option<&FieldValue>) -> Result<Option<String>> {
        let Some(value) = value else {
            return Ok(None);
        };
        match &self.lookup {
            Some(lookup) => lookup.describe(&self.lookup_key(value)).map(Some),
            None => Ok(match value {
                FieldValue::Coordinates(position) => Some(position.to_string()),
                _ => None,
            }),
        }
    }

    fn lookup_key(&self, value: &FieldValue) -> String {
        match (value, self.length) {
            (FieldValue::Integer(n), Some(width)) if !self.variable_length => {
                format!("{n:0width$}")
            }
            _ => value.to_string(),
        }
    }
}

/// Left-pad with zeros after any sign, like Python's `str.zfill`.
fn zero_pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let padding = "0".repeat(width - len);
    match text.strip_prefix(['+', '-']) {
        Some(rest) => format!("{}{padding}{rest}", &text[..1]),
        None => format!("{padding}{text}"),
    }
}

/// Drop leading zeros that precede another digit, keeping any sign.
fn strip_leading_zeros(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix(['+', '-']) {
        Some(rest) => (&text[..1], rest),
        None => ("", text),
    };
    let mut rest = digits;
    while rest.len() > 1 && rest.starts_with('0') && rest.as_bytes()[1].is_ascii_digit() {
        rest = &rest[1..];
    }
    format!("{sign}{rest}")
}
