//! The EURING record model.
//!
//! A [`Record`] holds one [`FieldSlot`] per canonical field. Each slot keeps
//! the wire text it was decoded from (when there was one), the typed value
//! and a description. Records built in code are strict by default: every
//! error blocks serialization. Decoded records are non-strict and tolerate
//! required fields left empty.
//!
//! # Examples
//!
//! ```
//! use euring::{EuringFormat, Record};
//!
//! let text = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let mut record = Record::decode(text, None);
//! assert!(record.errors().is_empty());
//!
//! record.set("wing_length", 72.5).unwrap();
//! let out = record.serialize().unwrap();
//! assert!(out.starts_with("GBB|A0|1234567890|"));
//! assert!(out.contains("|72.5|"));
//! ```

use crate::config::LookupPolicy;
use crate::converter::convert;
use crate::decoder::Decoder;
use crate::error::{EuringError, Result};
use crate::field::FieldDefinition;
use crate::formats::{EuringFormat, OutputFormat, EURING2000_RECORD_LENGTH, FIELD_SEPARATOR};
use crate::report::{FieldError, ValidationReport};
use crate::rules::{record_rule_errors, RawValues};
use crate::schema::Schema;
use crate::value::FieldValue;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// State of one field in a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldSlot {
    /// Wire text as decoded or set with [`Record::set_raw`].
    pub raw_value: Option<String>,
    /// Typed value.
    pub value: Option<FieldValue>,
    /// Lookup description of the value.
    pub description: Option<String>,
    /// Canonical index of the field.
    pub order: usize,
}

impl FieldSlot {
    /// Whether the slot carries any data.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some() || self.raw_value.as_deref().is_some_and(|raw| !raw.is_empty())
    }
}

/// Result of checking a record without touching it.
#[derive(Debug, Default)]
struct Evaluation {
    report: ValidationReport,
    /// Re-parsed values for slots holding wire text.
    parsed: Vec<(usize, Option<FieldValue>)>,
    descriptions: Vec<(usize, Option<String>)>,
}

/// One EURING record.
#[derive(Debug, Clone)]
pub struct Record {
    format: EuringFormat,
    strict: bool,
    schema: Arc<Schema>,
    slots: Vec<FieldSlot>,
    errors: ValidationReport,
    lookup_policy: LookupPolicy,
    structural: Vec<String>,
    unusable: bool,
    notes: Vec<String>,
}

impl Record {
    /// Create an empty strict record using the standard schema.
    #[must_use]
    pub fn new(format: EuringFormat) -> Self {
        Record::with_schema(format, Schema::standard())
    }

    /// Create an empty strict record using `schema`.
    #[must_use]
    pub fn with_schema(format: EuringFormat, schema: Arc<Schema>) -> Self {
        let slots = (0..schema.fields().len())
            .map(|order| FieldSlot {
                order,
                ..FieldSlot::default()
            })
            .collect();
        Record {
            format,
            strict: true,
            schema,
            slots,
            errors: ValidationReport::default(),
            lookup_policy: LookupPolicy::default(),
            structural: Vec::new(),
            unusable: false,
            notes: Vec::new(),
        }
    }

    /// Set strictness.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set how lookup misses are handled during validation.
    #[must_use]
    pub fn with_lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Decode record text into a non-strict record.
    ///
    /// The format is detected when `format` is `None`. Problems are
    /// collected in [`errors`](Self::errors) rather than returned.
    #[must_use]
    pub fn decode(text: &str, format: Option<EuringFormat>) -> Self {
        let decoder = match format {
            Some(format) => Decoder::new().with_format(format),
            None => Decoder::new(),
        };
        decoder.decode(text)
    }

    pub(crate) fn add_note(&mut self, note: String) {
        self.notes.push(note);
    }

    /// Load decoded wire text and structural errors, then validate.
    pub(crate) fn load_raw(&mut self, values: RawValues, structural: Vec<String>, unusable: bool) {
        let count = self.format.field_count();
        for (key, text) in values {
            if let Some(index) = self.schema.index_of(key).filter(|&i| i < count) {
                self.slots[index].raw_value = Some(text);
            }
        }
        self.structural = structural;
        self.unusable = unusable;
        self.validate();
    }

    /// Record format.
    #[must_use]
    pub fn format(&self) -> EuringFormat {
        self.format
    }

    /// Display name of the record format.
    #[must_use]
    pub fn display_format(&self) -> &'static str {
        self.format.name()
    }

    /// Whether every error blocks serialization.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Schema in use.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Errors from the last decode or [`validate`](Self::validate).
    #[must_use]
    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    /// Slot for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldSlot> {
        self.schema.index_of(key).map(|i| &self.slots[i])
    }

    /// Typed value of `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).and_then(|slot| slot.value.as_ref())
    }

    /// Wire text of `key`, if it came from text.
    #[must_use]
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|slot| slot.raw_value.as_deref())
    }

    /// Description of `key`'s value.
    #[must_use]
    pub fn description(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|slot| slot.description.as_deref())
    }

    /// Definitions and slots of the fields in this record's format.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDefinition, &FieldSlot)> {
        self.schema
            .fields_for(self.format)
            .iter()
            .zip(&self.slots)
    }

    /// Set a typed value, discarding any wire text.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::UnknownField`] for keys outside the schema.
    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<&mut Self> {
        let index = self.schema.require(key)?;
        let slot = &mut self.slots[index];
        slot.value = Some(value.into());
        slot.raw_value = None;
        slot.description = None;
        self.touch();
        Ok(self)
    }

    /// Set wire text; it is parsed on the next validation.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::UnknownField`] for keys outside the schema.
    pub fn set_raw(&mut self, key: &str, text: impl Into<String>) -> Result<&mut Self> {
        let index = self.schema.require(key)?;
        let slot = &mut self.slots[index];
        slot.raw_value = Some(text.into());
        slot.value = None;
        slot.description = None;
        self.touch();
        Ok(self)
    }

    /// Set several typed values.
    ///
    /// # Errors
    ///
    /// Stops at the first unknown key; earlier values stay set.
    pub fn update<I, K, V>(&mut self, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        for (key, value) in pairs {
            self.set(key.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Clear a field.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::UnknownField`] for keys outside the schema.
    pub fn clear(&mut self, key: &str) -> Result<&mut Self> {
        let index = self.schema.require(key)?;
        let order = self.slots[index].order;
        self.slots[index] = FieldSlot {
            order,
            ..FieldSlot::default()
        };
        self.touch();
        Ok(self)
    }

    /// Once edited, the record no longer reflects the decoded text.
    fn touch(&mut self) {
        self.structural.clear();
        self.unusable = false;
    }

    /// Re-check every field and rule, store the report and return it.
    ///
    /// Wire text is re-parsed so values and descriptions stay in sync.
    pub fn validate(&mut self) -> &ValidationReport {
        let evaluation = self.evaluate();
        for (index, value) in evaluation.parsed {
            self.slots[index].value = value;
        }
        for slot in &mut self.slots {
            slot.description = None;
        }
        for (index, description) in evaluation.descriptions {
            self.slots[index].description = description;
        }
        self.errors = evaluation.report;
        &self.errors
    }

    /// Check the record without changing it.
    #[must_use]
    pub fn check(&self) -> ValidationReport {
        self.evaluate().report
    }

    fn evaluate(&self) -> Evaluation {
        let mut evaluation = Evaluation::default();
        evaluation.report.record = self.structural.clone();
        evaluation.report.notes = self.notes.clone();
        if self.unusable {
            return evaluation;
        }

        let rules = self.schema.type_rules();
        let count = self.format.field_count();
        let mut values = RawValues::new();

        for (index, (field, slot)) in self.schema.fields().iter().zip(&self.slots).enumerate() {
            let in_format = index < count;
            if !in_format && !slot.is_set() {
                continue;
            }
            let text = match self.wire_text(field, slot) {
                Ok(text) => text,
                Err(error) => {
                    let shown = slot.value.as_ref().map(ToString::to_string).unwrap_or_default();
                    if in_format {
                        evaluation
                            .report
                            .fields
                            .push(self.positioned(FieldError::from_error(field, index, &shown, &error)));
                    }
                    values.insert(field.key, shown);
                    continue;
                }
            };

            if in_format {
                match field.parse_with(&text, rules) {
                    Ok(parsed) => {
                        let value = if slot.raw_value.is_some() {
                            evaluation.parsed.push((index, parsed.clone()));
                            parsed
                        } else {
                            slot.value.clone()
                        };
                        match field.describe(value.as_ref()) {
                            Ok(description) => evaluation.descriptions.push((index, description)),
                            Err(error) => match self.lookup_policy {
                                LookupPolicy::Ignore => evaluation
                                    .report
                                    .notes
                                    .push(format!("{}: {error}", field.name)),
                                LookupPolicy::Report => evaluation.report.fields.push(
                                    self.positioned(FieldError::from_error(field, index, &text, &error)),
                                ),
                            },
                        }
                    }
                    Err(error) => {
                        if slot.raw_value.is_some() {
                            evaluation.parsed.push((index, None));
                        }
                        evaluation
                            .report
                            .fields
                            .push(self.positioned(FieldError::from_error(field, index, &text, &error)));
                    }
                }
            }
            values.insert(field.key, text);
        }

        evaluation.report.rules = record_rule_errors(self.format, &values)
            .into_iter()
            .map(|error| self.positioned(error))
            .collect();
        evaluation
    }

    /// Attach the fixed-width span to errors of EURING2000 records.
    fn positioned(&self, error: FieldError) -> FieldError {
        if !self.format.is_fixed_width() {
            return error;
        }
        match self.schema.fixed_width_span(error.index) {
            Some((start, length)) => error.at_span(start, length),
            None => error,
        }
    }

    /// Text validated for a slot; unset slots validate as empty.
    fn wire_text(&self, field: &FieldDefinition, slot: &FieldSlot) -> Result<String> {
        match (&slot.raw_value, &slot.value) {
            (Some(raw), _) => Ok(raw.clone()),
            (None, Some(value)) => {
                field.encode_for_format_with(Some(value), self.format, self.schema.type_rules())
            }
            (None, None) => Ok(String::new()),
        }
    }

    /// Text written for a slot; unset slots get their placeholder.
    fn output_text(&self, field: &FieldDefinition, slot: &FieldSlot) -> Result<String> {
        match (&slot.raw_value, &slot.value) {
            (Some(raw), _) if !raw.is_empty() => Ok(raw.clone()),
            (_, Some(value)) => {
                field.encode_for_format_with(Some(value), self.format, self.schema.type_rules())
            }
            _ => Ok(field.absent_text(self.format)),
        }
    }

    /// Serialize to EURING text in the record's format.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::Validation`] with the full report when the
    /// record has errors that block serialization: any error when strict,
    /// anything but required-empty fields otherwise.
    pub fn serialize(&self) -> Result<String> {
        let report = self.check();
        if report.has_fatal(self.strict) {
            return Err(EuringError::Validation(Box::new(report)));
        }

        let fields = self.schema.fields_for(self.format);
        let mut parts = Vec::with_capacity(fields.len());
        for (field, slot) in fields.iter().zip(&self.slots) {
            parts.push(self.output_text(field, slot)?);
        }

        if self.format.is_fixed_width() {
            let mut out = String::with_capacity(EURING2000_RECORD_LENGTH);
            for (field, part) in fields.iter().zip(&parts) {
                out.push_str(part);
                let width = field.length.unwrap_or(0);
                for _ in part.chars().count()..width {
                    out.push('-');
                }
            }
            let length = out.chars().count();
            if length != EURING2000_RECORD_LENGTH {
                return Err(EuringError::InvalidRecord(format!(
                    "serialized EURING2000 record is {length} characters instead of {EURING2000_RECORD_LENGTH}"
                )));
            }
            Ok(out)
        } else {
            Ok(parts.join(&FIELD_SEPARATOR.to_string()))
        }
    }

    /// Serialize as EURING text or as the JSON form of [`to_dict`](Self::to_dict).
    ///
    /// # Errors
    ///
    /// See [`serialize`](Self::serialize); JSON output only fails on JSON
    /// encoding errors.
    pub fn serialize_as(&self, output: OutputFormat) -> Result<String> {
        match output {
            OutputFormat::Euring => self.serialize(),
            OutputFormat::Json { pretty: false } => Ok(serde_json::to_string(&self.to_dict())?),
            OutputFormat::Json { pretty: true } => {
                Ok(serde_json::to_string_pretty(&self.to_dict())?)
            }
        }
    }

    /// Structured view: format, fields by key and the stored errors.
    ///
    /// Fields outside the record's format are included only when set.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Value {
        let count = self.format.field_count();
        let mut fields = serde_json::Map::new();
        for (field, slot) in self.schema.fields().iter().zip(&self.slots) {
            if slot.order >= count && !slot.is_set() {
                continue;
            }
            fields.insert(
                field.key.to_string(),
                json!({
                    "name": field.name,
                    "value": slot.value,
                    "raw_value": slot.raw_value,
                    "description": slot.description,
                    "order": slot.order,
                }),
            );
        }
        json!({
            "record": { "format": self.display_format() },
            "fields": fields,
            "errors": self.errors,
        })
    }

    /// Serialize and convert to `target`.
    ///
    /// A lossy downgrade is refused unless `force` is set, in which case it
    /// is retried with forced conversion and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns serialization errors, and conversion errors such as
    /// [`EuringError::LossyConversion`] when `force` is not set.
    pub fn export(&self, target: EuringFormat, force: bool) -> Result<String> {
        let text = self.serialize()?;
        match convert(&text, Some(self.format), target, false) {
            Err(EuringError::LossyConversion { reasons, .. }) if force => {
                warn!(
                    source = %self.format,
                    %target,
                    reasons = %reasons.join("; "),
                    "forcing lossy export"
                );
                convert(&text, Some(self.format), target, true)
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::LatLng;
    use crate::error::ErrorKind;
    use crate::lookup::Lookup;
    use chrono::NaiveDate;

    const PLUS: &str = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";

    #[test]
    fn test_decode_round_trip_pads_missing_optional_tokens() {
        let record = Record::decode(PLUS, None);
        assert!(!record.is_strict());
        assert!(record.errors().is_empty(), "{}", record.errors());

        // The 33 tokens are kept verbatim; the remaining optional fields of
        // EURING2000+ come back as empty tokens.
        let given = PLUS.split('|').count();
        let missing = EuringFormat::Euring2000Plus.field_count() - given;
        let out = record.serialize().unwrap();
        assert_eq!(out, format!("{PLUS}{}", "|".repeat(missing)));
    }

    #[test]
    fn test_decoded_values_and_descriptions() {
        let record = Record::decode(PLUS, None);
        assert_eq!(record.value("species_mentioned"), Some(&FieldValue::Integer(10)));
        assert_eq!(record.raw_value("species_mentioned"), Some("00010"));
        assert_eq!(
            record.value("date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        );
        assert_eq!(
            record.description("geographical_coordinates"),
            Some("lat: 0 lng: 0")
        );
        assert_eq!(record.value("wing_length"), None);
    }

    #[test]
    fn test_new_record_is_strict() {
        let mut record = Record::new(EuringFormat::Euring2000Plus);
        record.set("ringing_scheme", "GBB").unwrap();
        let err = record.serialize().unwrap_err();
        match err {
            EuringError::Validation(report) => {
                assert!(report.contains_field("species_mentioned"));
                assert!(!report.contains_field("ringing_scheme"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_strict_tolerates_required_empty() {
        let mut record = Record::new(EuringFormat::Euring2000Plus).with_strict(false);
        record.set("ringing_scheme", "GBB").unwrap();
        let out = record.serialize().unwrap();
        let tokens: Vec<&str> = out.split('|').collect();
        assert_eq!(tokens.len(), 60);
        assert_eq!(tokens[0], "GBB");
        assert_eq!(tokens[6], "-----");
        assert_eq!(tokens[24], "...............");
        assert_eq!(tokens[33], "");
    }

    #[test]
    fn test_set_unknown_key() {
        let mut record = Record::new(EuringFormat::Euring2020);
        let err = record.set("wingspan", 1).unwrap_err();
        assert!(matches!(err, EuringError::UnknownField(ref k) if k == "wingspan"));
        assert!(record.set_raw("nope", "x").is_err());
        assert!(record.clear("nope").is_err());
    }

    #[test]
    fn test_set_typed_values_encode() {
        let mut record = Record::decode(PLUS, None);
        record
            .set("identification_number", "CD52065")
            .unwrap()
            .set("species_mentioned", 1840)
            .unwrap()
            .set("tail_difference", -1.5)
            .unwrap();
        let out = record.serialize().unwrap();
        let tokens: Vec<&str> = out.split('|').collect();
        assert_eq!(tokens[2], "CD...52065");
        assert_eq!(tokens[6], "01840");
        assert_eq!(tokens[46], "-1.5");
    }

    #[test]
    fn test_fixed_width_positions_in_errors() {
        let mut record = Record::new(EuringFormat::Euring2000).with_strict(false);
        record.set_raw("species_mentioned", "12AB5").unwrap();
        let report = record.validate().clone();
        let error = report.field_errors("species_mentioned").next().unwrap();
        assert_eq!(error.position, Some(20));
        assert_eq!(error.length, Some(5));
        assert_eq!(error.kind, ErrorKind::Type);
        assert!(record.serialize().is_err());
    }

    #[test]
    fn test_fields_outside_format_break_rules() {
        let mut record = Record::decode(PLUS, Some(EuringFormat::Euring2000Plus));
        record.set("current_place_code", "GB00").unwrap();
        let report = record.validate();
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.rules[0].key, "current_place_code");
    }

    #[test]
    fn test_editing_clears_structural_errors() {
        let short = &PLUS[..PLUS.len() - 6];
        let mut record = Record::decode(&format!("{short}|"), Some(EuringFormat::Euring2000));
        assert!(!record.errors().record.is_empty());
        record.set("ringing_scheme", "GBB").unwrap();
        assert!(record.check().record.is_empty());
    }

    #[test]
    fn test_lookup_policy() {
        let schema = Schema::default()
            .with_lookup("circumstances", Lookup::table([("01", "Found dead")]))
            .unwrap();
        let mut record = Record::with_schema(EuringFormat::Euring2000Plus, Arc::new(schema))
            .with_strict(false);
        record.set("circumstances", 99).unwrap();
        let report = record.validate();
        assert!(!report.contains_field("circumstances"));
        assert!(report.notes.iter().any(|n| n.starts_with("Circumstances: ")));

        let mut record = record.with_lookup_policy(LookupPolicy::Report);
        let report = record.validate();
        let error = report.field_errors("circumstances").next().unwrap();
        assert_eq!(error.kind, ErrorKind::Lookup);

        record.set("circumstances", 1).unwrap();
        record.validate();
        assert_eq!(record.description("circumstances"), Some("Found dead"));
    }

    #[test]
    fn test_to_dict_and_json_output() {
        let mut record = Record::decode(PLUS, None);
        record
            .set("geographical_coordinates", LatLng::new(1.5, -2.25))
            .unwrap();
        record.validate();
        let dict = record.to_dict();
        assert_eq!(dict["record"]["format"], "EURING2000+");
        assert_eq!(dict["fields"]["ringing_scheme"]["raw_value"], "GBB");
        assert_eq!(dict["fields"]["ringing_scheme"]["order"], 0);
        assert!(dict["fields"].get("latitude").is_none());
        assert_eq!(dict["errors"]["record"].as_array().unwrap().len(), 0);

        let json = record
            .serialize_as(OutputFormat::Json { pretty: false })
            .unwrap();
        assert!(json.contains("\"format\":\"EURING2000+\""));
    }

    #[test]
    fn test_clear_restores_placeholder() {
        let mut record = Record::decode(PLUS, None);
        record.clear("geographical_coordinates").unwrap();
        let report = record.validate();
        assert!(report.contains_field("geographical_coordinates"));
        assert!(!report.has_fatal(false));
        let out = record.serialize().unwrap();
        assert!(out.contains("|AB00|...............|1|"));
    }
}
