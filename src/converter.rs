//! Conversion between the EURING formats.
//!
//! Every field is re-parsed and re-encoded for the target format, so
//! padding, placeholders and ring-number dots follow the target's rules.
//! Upgrades never lose information. Downgrades that would drop data are
//! refused unless forced; a forced downgrade maps alphabetic coordinate
//! accuracy to its numeric equivalent and rebuilds the geographical
//! co-ordinates from latitude and longitude when they are missing.
//!
//! # Examples
//!
//! ```
//! use euring::{convert, EuringFormat};
//!
//! let plus = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let fixed = convert(plus, None, EuringFormat::Euring2000, false).unwrap();
//! assert_eq!(fixed.len(), 94);
//!
//! let back = convert(&fixed, None, EuringFormat::Euring2000Plus, false).unwrap();
//! assert!(back.starts_with("GBB|A0|1234567890|0|1|ZZ|00010|00010|"));
//! ```

use crate::config::ConvertOptions;
use crate::coordinates::lat_lng_to_combined;
use crate::decoder::{decode_raw, detect_format};
use crate::error::{EuringError, Result};
use crate::field::FieldDefinition;
use crate::formats::{EuringFormat, EURING2000_RECORD_LENGTH, FIELD_SEPARATOR};
use crate::parsers::EMPTY_COORDINATES;
use crate::rules::{accuracy_is_alphabetic, RawValues};
use crate::schema::{Schema, EURING2020_ONLY_KEYS};
use crate::utils::is_all_hyphens;
use tracing::debug;

/// Numeric accuracy code for an alphabetic EURING2020 accuracy code.
#[must_use]
pub fn numeric_accuracy(code: &str) -> Option<&'static str> {
    match code {
        "A" | "B" | "C" | "D" | "E" | "F" | "G" => Some("0"),
        "H" => Some("1"),
        "I" => Some("2"),
        "J" => Some("4"),
        "K" => Some("5"),
        "L" => Some("6"),
        "M" => Some("7"),
        "Z" => Some("9"),
        _ => None,
    }
}

/// Convert record text between formats.
///
/// The source format is detected when `source` is `None`.
///
/// # Errors
///
/// - [`EuringError::InvalidRecord`] for text that does not fit the source
///   layout
/// - [`EuringError::LossyConversion`] for a downgrade that would drop data
///   when `force` is not set
/// - [`EuringError::Constraint`] for a value that cannot be re-encoded
pub fn convert(
    text: &str,
    source: Option<EuringFormat>,
    target: EuringFormat,
    force: bool,
) -> Result<String> {
    let source = source.unwrap_or_else(|| detect_format(text));
    let raw = decode_raw(text, Some(source));
    if !raw.errors.is_empty() {
        return Err(EuringError::InvalidRecord(raw.errors.join("; ")));
    }
    let mut values = raw.values;

    let reasons = loss_reasons(&values, target);
    if !reasons.is_empty() {
        if !force {
            return Err(EuringError::LossyConversion {
                target: target.name().to_string(),
                reasons,
            });
        }
        debug!(%source, %target, reasons = %reasons.join("; "), "forcing lossy conversion");
        downgrade(&mut values)?;
    }

    let schema = Schema::standard();
    let fields = schema.fields_for(target);
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        let token = values.get(field.key).map_or("", String::as_str);
        parts.push(convert_token(&schema, field, token, target)?);
    }

    debug!(%source, %target, "converted record");
    if target.is_fixed_width() {
        let out = parts.concat();
        if out.chars().count() != EURING2000_RECORD_LENGTH {
            return Err(EuringError::InvalidRecord(format!(
                "converted EURING2000 record is {} characters instead of {EURING2000_RECORD_LENGTH}",
                out.chars().count()
            )));
        }
        Ok(out)
    } else {
        Ok(parts.join(&FIELD_SEPARATOR.to_string()))
    }
}

/// Convert with options.
///
/// # Errors
///
/// See [`convert`].
pub fn convert_with(text: &str, options: &ConvertOptions) -> Result<String> {
    convert(text, options.source, options.target, options.force)
}

/// What would be lost converting `values` to `target`.
fn loss_reasons(values: &RawValues, target: EuringFormat) -> Vec<String> {
    let mut reasons = Vec::new();
    if target == EuringFormat::Euring2020 {
        return reasons;
    }
    let has_value = |key: &str| values.get(key).is_some_and(|v| !v.is_empty());
    if EURING2020_ONLY_KEYS.iter().any(|key| has_value(key)) {
        reasons.push("EURING2020-only fields are set".to_string());
    }
    if accuracy_is_alphabetic(values) {
        reasons.push("alphabetic coordinate accuracy".to_string());
    }
    if target == EuringFormat::Euring2000 {
        let schema = Schema::standard();
        let beyond = schema.fields()[EuringFormat::Euring2000.field_count()..]
            .iter()
            .any(|field| !EURING2020_ONLY_KEYS.contains(&field.key) && has_value(field.key));
        if beyond {
            reasons.push("fields beyond the EURING2000 layout are set".to_string());
        }
    }
    reasons
}

/// Rewrite values so they fit an older format.
fn downgrade(values: &mut RawValues) -> Result<()> {
    if accuracy_is_alphabetic(values) {
        let code = values
            .get("accuracy_of_coordinates")
            .cloned()
            .unwrap_or_default();
        let numeric = numeric_accuracy(&code).ok_or_else(|| {
            EuringError::Constraint(format!(
                "Accuracy of Co-ordinates: alphabetic code \"{code}\" has no numeric equivalent."
            ))
        })?;
        values.insert("accuracy_of_coordinates", numeric.to_string());
    }

    let geo = values
        .get("geographical_coordinates")
        .map_or("", String::as_str);
    if geo.is_empty() || geo == EMPTY_COORDINATES {
        let parse = |key: &str| {
            values
                .get(key)
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<f64>())
        };
        if let (Some(lat), Some(lng)) = (parse("latitude"), parse("longitude")) {
            let invalid =
                |_| EuringError::Constraint("Latitude/Longitude are not valid numbers.".to_string());
            let combined = lat_lng_to_combined(lat.map_err(invalid)?, lng.map_err(invalid)?);
            values.insert("geographical_coordinates", combined);
        }
    }
    Ok(())
}

/// Re-encode one wire token for `target`.
fn convert_token(
    schema: &Schema,
    field: &FieldDefinition,
    token: &str,
    target: EuringFormat,
) -> Result<String> {
    if token.is_empty() {
        return Ok(field.absent_text(target));
    }
    if field.allow_unknown && is_all_hyphens(token) {
        return Ok(field.length.map_or_else(|| token.to_string(), |n| "-".repeat(n)));
    }
    let named = |error: EuringError| EuringError::Constraint(format!("{}: {error}", field.name));
    let value = field
        .parse_with(token, schema.type_rules())
        .map_err(named)?;
    field
        .encode_for_format_with(value.as_ref(), target, schema.type_rules())
        .map_err(named)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS: &str = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";

    fn euring2020(accuracy: &str, geo: &str, lat: &str, lng: &str) -> String {
        let mut tokens: Vec<String> = PLUS.split('|').map(str::to_string).collect();
        tokens[24] = geo.to_string();
        tokens[25] = accuracy.to_string();
        tokens.resize(64, String::new());
        tokens[60] = lat.to_string();
        tokens[61] = lng.to_string();
        tokens.join("|")
    }

    #[test]
    fn test_numeric_accuracy() {
        assert_eq!(numeric_accuracy("A"), Some("0"));
        assert_eq!(numeric_accuracy("J"), Some("4"));
        assert_eq!(numeric_accuracy("Z"), Some("9"));
        assert_eq!(numeric_accuracy("N"), None);
    }

    #[test]
    fn test_upgrade_to_2020() {
        let out = convert(PLUS, None, EuringFormat::Euring2020, false).unwrap();
        let tokens: Vec<&str> = out.split('|').collect();
        let source: Vec<&str> = PLUS.split('|').collect();
        assert_eq!(tokens.len(), 64);
        assert_eq!(tokens[..30], source[..30]);
        // Variable-length derived data loses its zero padding.
        assert_eq!(tokens[30..33], ["0", "000", "0"]);
        assert!(tokens[33..].iter().all(|t| t.is_empty()));
    }

    #[test]
    fn test_downgrade_refused_without_force() {
        let text = euring2020("A", EMPTY_COORDINATES, "52.5", "-1.25");
        let err = convert(&text, None, EuringFormat::Euring2000Plus, false).unwrap_err();
        match err {
            EuringError::LossyConversion { target, reasons } => {
                assert_eq!(target, "EURING2000+");
                assert_eq!(reasons.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_forced_downgrade_maps_accuracy_and_rebuilds_geo() {
        let text = euring2020("A", EMPTY_COORDINATES, "52.5", "-1.25");
        let out = convert(&text, None, EuringFormat::Euring2000Plus, true).unwrap();
        let tokens: Vec<&str> = out.split('|').collect();
        assert_eq!(tokens.len(), 60);
        assert_eq!(tokens[24], "+523000-0011500");
        assert_eq!(tokens[25], "0");
    }

    #[test]
    fn test_forced_downgrade_unmapped_accuracy() {
        let text = euring2020("N", "+000000+0000000", "", "");
        let err = convert(&text, None, EuringFormat::Euring2000Plus, true).unwrap_err();
        assert!(err.to_string().contains("no numeric equivalent"));
    }

    #[test]
    fn test_structural_errors_are_invalid_records() {
        let err = convert("GBB|A0", Some(EuringFormat::Euring2000), EuringFormat::Euring2020, false)
            .unwrap_err();
        assert!(matches!(err, EuringError::InvalidRecord(_)));
    }

    #[test]
    fn test_bad_value_names_field() {
        let text = PLUS.replace("|00010|00010|", "|0001X|00010|");
        let err = convert(&text, None, EuringFormat::Euring2020, false).unwrap_err();
        assert!(err.to_string().starts_with("Species Mentioned: "));
    }
}
