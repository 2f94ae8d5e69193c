//! Decoding tests across the three EURING formats.

mod common;

use chrono::NaiveDate;
use common::{delimited_with, euring2020_with_lat_lng, EURING2000, EURING2000_PLUS};
use euring::config::{DecodeOptions, PromotionPolicy};
use euring::{decode, detect_format, Decoder, ErrorKind, EuringFormat, FieldValue};

#[test]
fn test_decode_euring2000_fixture() {
    let record = decode(EURING2000, None);
    assert_eq!(record.format(), EuringFormat::Euring2000);
    assert!(record.errors().is_empty(), "{}", record.errors());

    assert_eq!(record.raw_value("identification_number"), Some("CD...52065"));
    assert_eq!(
        record.value("identification_number"),
        Some(&FieldValue::Text("CD...52065".to_string()))
    );
    assert_eq!(record.value("species_mentioned"), Some(&FieldValue::Integer(18770)));
    assert_eq!(
        record.value("date"),
        Some(&FieldValue::Date(NaiveDate::from_ymd_opt(1976, 7, 12).unwrap()))
    );
    assert_eq!(record.value("distance"), Some(&FieldValue::Integer(1002)));
    assert_eq!(record.value("direction"), Some(&FieldValue::Integer(23)));

    // Hyphen placeholders decode as absent.
    assert_eq!(record.raw_value("brood_size"), Some("--"));
    assert_eq!(record.value("brood_size"), None);
    assert_eq!(record.value("time"), None);

    let position = record
        .value("geographical_coordinates")
        .and_then(FieldValue::as_coordinates)
        .unwrap();
    assert!((position.lat - 58.7).abs() < 1e-9);
    assert!((position.lng - 13.8).abs() < 1e-9);
}

#[test]
fn test_decode_euring2000_plus() {
    let record = decode(EURING2000_PLUS, None);
    assert_eq!(record.format(), EuringFormat::Euring2000Plus);
    assert_eq!(record.display_format(), "EURING2000+");
    assert!(record.errors().is_empty(), "{}", record.errors());
    assert_eq!(record.fields().count(), 60);
}

#[test]
fn test_decode_euring2020_lat_lng() {
    let text = euring2020_with_lat_lng("52.5", "-1.25");
    let record = decode(&text, None);
    assert_eq!(record.format(), EuringFormat::Euring2020);
    assert!(record.errors().is_empty(), "{}", record.errors());
    assert_eq!(record.value("latitude"), Some(&FieldValue::Decimal(52.5)));
    assert_eq!(record.value("geographical_coordinates"), None);
}

#[test]
fn test_detection() {
    assert_eq!(detect_format(EURING2000), EuringFormat::Euring2000);
    assert_eq!(detect_format(EURING2000_PLUS), EuringFormat::Euring2000Plus);
    let sixty = delimited_with(EuringFormat::Euring2000Plus, &[]);
    assert_eq!(detect_format(&sixty), EuringFormat::Euring2000Plus);
    let sixty_four = delimited_with(EuringFormat::Euring2020, &[]);
    assert_eq!(detect_format(&sixty_four), EuringFormat::Euring2020);
    let alpha = delimited_with(EuringFormat::Euring2000Plus, &[(25, "A")]);
    assert_eq!(detect_format(&alpha), EuringFormat::Euring2020);
}

#[test]
fn test_promotion_note_is_advisory() {
    let alpha = delimited_with(EuringFormat::Euring2000Plus, &[(25, "A")]);

    let record = decode(&alpha, None);
    assert_eq!(record.format(), EuringFormat::Euring2020);
    assert!(record.errors().is_empty(), "{}", record.errors());
    assert_eq!(record.errors().notes.len(), 1);
    assert!(record.errors().notes[0].contains("promoted from EURING2000+ to EURING2020"));

    let silent = Decoder::new()
        .with_promotion(PromotionPolicy::Silent)
        .decode(&alpha);
    assert_eq!(silent.format(), EuringFormat::Euring2020);
    assert!(silent.errors().notes.is_empty());
}

#[test]
fn test_pinned_format_is_not_promoted() {
    let alpha = delimited_with(EuringFormat::Euring2000Plus, &[(25, "A")]);
    let record = decode(&alpha, Some(EuringFormat::Euring2000Plus));
    assert_eq!(record.format(), EuringFormat::Euring2000Plus);
    let error = record
        .errors()
        .field_errors("accuracy_of_coordinates")
        .next()
        .unwrap();
    assert_eq!(
        error.message,
        "Alphabetic accuracy codes are only valid in EURING2020."
    );
}

#[test]
fn test_empty_record() {
    let record = decode("", None);
    assert_eq!(record.errors().record, ["Record is an empty string."]);
    assert!(record.errors().fields.is_empty());
    assert!(record.serialize().is_err());
}

#[test]
fn test_hint_conflicts_are_structural() {
    let record = decode(EURING2000_PLUS, Some(EuringFormat::Euring2000));
    let messages = &record.errors().record;
    assert!(messages
        .iter()
        .any(|m| m == "Format \"EURING2000\" should not contain pipe characters (\"|\")."));
    assert!(messages.iter().any(|m| m.starts_with(
        "Format \"EURING2000\" should be exactly 94 characters, found "
    )));

    let record = decode(EURING2000, Some(EuringFormat::Euring2020));
    assert_eq!(
        record.errors().record,
        ["Format \"EURING2020\" should contain values separated by pipe characters (\"|\")."]
    );
}

#[test]
fn test_all_field_errors_are_collected() {
    let text = delimited_with(
        EuringFormat::Euring2000Plus,
        &[(6, "1X"), (20, "32132024"), (23, "ab00"), (31, "400")],
    );
    let record = decode(&text, None);
    let report = record.errors();
    assert!(report.record.is_empty());
    assert_eq!(report.fields.len(), 4, "{report}");
    for key in ["species_mentioned", "date", "place_code", "direction"] {
        assert!(report.contains_field(key), "missing {key}");
    }
    let species = report.field_errors("Species Mentioned").next().unwrap();
    assert_eq!(species.value, "1X");
    assert_eq!(species.position, None);
}

#[test]
fn test_fixed_width_errors_carry_positions() {
    let mut text = EURING2000.to_string();
    text.replace_range(19..24, "1877X");
    let record = decode(&text, None);
    let error = record
        .errors()
        .field_errors("species_mentioned")
        .next()
        .unwrap();
    assert_eq!(error.kind, ErrorKind::Type);
    assert_eq!(error.position, Some(20));
    assert_eq!(error.length, Some(5));
}

#[test]
fn test_required_empty_is_soft() {
    let text = delimited_with(EuringFormat::Euring2000Plus, &[(12, "")]);
    let record = decode(&text, None);
    let report = record.errors();
    assert_eq!(report.fields.len(), 1);
    assert!(report.fields[0].required_empty);
    assert_eq!(
        report.fields[0].message,
        "Required field, empty value \"\" is not permitted."
    );
    assert!(!report.has_fatal(record.is_strict()));
    assert!(record.serialize().is_ok());
}

#[test]
fn test_coordinate_rules_in_2020() {
    let text = delimited_with(EuringFormat::Euring2020, &[(60, "52.5")]);
    let record = decode(&text, None);
    let rules = &record.errors().rules;
    let keys: Vec<&str> = rules.iter().map(|e| e.key).collect();
    assert!(keys.contains(&"geographical_coordinates"));
    assert!(keys.contains(&"longitude"));
}

#[test]
fn test_options_from_config() {
    let options: DecodeOptions = serde_json::from_str(r#"{"format": "2000"}"#).unwrap();
    let record = Decoder::new().with_options(options).decode(EURING2000);
    assert_eq!(record.format(), EuringFormat::Euring2000);
    assert!(record.errors().is_empty());
}
