//! Cross-field rules and format requirements.
//!
//! The rules look at raw wire text keyed by field key. They decide which
//! format a set of values needs and report the cross-field invariants each
//! format imposes.

use crate::formats::EuringFormat;
use crate::parsers::EMPTY_COORDINATES;
use crate::report::FieldError;
use crate::schema::{Schema, EURING2020_ONLY_KEYS};
use indexmap::IndexMap;

/// Raw wire text by field key.
pub type RawValues = IndexMap<&'static str, String>;

fn value<'a>(values: &'a RawValues, key: &str) -> &'a str {
    values.get(key).map_or("", String::as_str)
}

/// Whether the coordinate accuracy is an alphabetic (EURING2020) code.
#[must_use]
pub fn accuracy_is_alphabetic(values: &RawValues) -> bool {
    let accuracy = value(values, "accuracy_of_coordinates");
    !accuracy.is_empty() && accuracy.chars().all(char::is_alphabetic)
}

/// Whether every non-empty value fits in the 33 EURING2000 fields.
#[must_use]
pub fn matches_euring2000(values: &RawValues) -> bool {
    let schema = Schema::standard();
    schema.fields()[EuringFormat::Euring2000.field_count()..]
        .iter()
        .all(|field| value(values, field.key).is_empty())
}

/// Whether some value lies outside the EURING2000 layout.
#[must_use]
pub fn requires_euring2000plus(values: &RawValues) -> bool {
    !matches_euring2000(values)
}

/// Whether the values can only be expressed in EURING2020.
#[must_use]
pub fn requires_euring2020(values: &RawValues) -> bool {
    accuracy_is_alphabetic(values)
        || EURING2020_ONLY_KEYS
            .iter()
            .any(|key| !value(values, key).is_empty())
}

/// Cross-field violations of `values` under `format`.
#[must_use]
pub fn record_rule_errors(format: EuringFormat, values: &RawValues) -> Vec<FieldError> {
    let schema = Schema::standard();
    let mut errors = Vec::new();
    let mut error = |key: &str, message: &str| {
        if let Some(index) = schema.index_of(key) {
            let field = &schema.fields()[index];
            errors.push(FieldError::constraint(field, index, value(values, key), message));
        }
    };

    match format {
        EuringFormat::Euring2020 => {
            let geo = value(values, "geographical_coordinates");
            let latitude = value(values, "latitude");
            let longitude = value(values, "longitude");
            if (!latitude.is_empty() || !longitude.is_empty())
                && !geo.is_empty()
                && geo != EMPTY_COORDINATES
            {
                error(
                    "geographical_coordinates",
                    "When Latitude/Longitude are provided, Geographical Co-ordinates must be 15 dots.",
                );
            }
            if !latitude.is_empty() && longitude.is_empty() {
                error("longitude", "Longitude is required when Latitude is provided.");
            }
            if !longitude.is_empty() && latitude.is_empty() {
                error("latitude", "Latitude is required when Longitude is provided.");
            }
        }
        EuringFormat::Euring2000 | EuringFormat::Euring2000Plus => {
            if accuracy_is_alphabetic(values) {
                error(
                    "accuracy_of_coordinates",
                    "Alphabetic accuracy codes are only valid in EURING2020.",
                );
            }
            if format == EuringFormat::Euring2000 {
                for field in &schema.fields()[EuringFormat::Euring2000.field_count()..] {
                    if !value(values, field.key).is_empty() {
                        error(
                            field.key,
                            "Fields beyond the EURING2000 fixed-width layout are not allowed.",
                        );
                    }
                }
            } else {
                for key in EURING2020_ONLY_KEYS {
                    if !value(values, key).is_empty() {
                        error(key, "EURING2020-only fields require EURING2020 format.");
                    }
                }
            }
        }
    }
    errors
}
