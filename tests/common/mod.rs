//! Common test fixtures and helpers shared across the test suite.

#![allow(dead_code)]

use euring::{EuringFormat, Record};

/// A valid fixed-width EURING2000 recovery record.
pub const EURING2000: &str =
    "DERA0CD...5206514ZZ1877018770N0ZUPF02U-----120719760----SV55+584200+01348000101030100202301739";

/// A valid EURING2000+ ringing record with only the first 33 fields present.
pub const EURING2000_PLUS: &str = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";

/// Tokens of [`EURING2000_PLUS`] padded with empty values to `format`'s
/// field count.
pub fn tokens(format: EuringFormat) -> Vec<String> {
    let mut tokens: Vec<String> = EURING2000_PLUS.split('|').map(str::to_string).collect();
    tokens.resize(format.field_count(), String::new());
    tokens
}

/// A delimited record for `format` with some fields overridden by index.
pub fn delimited_with(format: EuringFormat, overrides: &[(usize, &str)]) -> String {
    let mut tokens = tokens(format);
    for (index, value) in overrides {
        tokens[*index] = (*value).to_string();
    }
    tokens.join("|")
}

/// A EURING2020 record using decimal latitude/longitude with dotted
/// geographical co-ordinates.
pub fn euring2020_with_lat_lng(lat: &str, lng: &str) -> String {
    delimited_with(
        EuringFormat::Euring2020,
        &[(24, "..............."), (60, lat), (61, lng)],
    )
}

/// A strict EURING2020 record with every required field set.
pub fn build_complete_record() -> Record {
    let mut record = Record::new(EuringFormat::Euring2020);
    let values: [(&str, &str); 30] = [
        ("ringing_scheme", "GBB"),
        ("primary_identification_method", "A0"),
        ("identification_number", "1234567890"),
        ("verification_of_the_metal_ring", "0"),
        ("metal_ring_information", "1"),
        ("other_marks_information", "ZZ"),
        ("species_mentioned", "00010"),
        ("species_concluded", "00010"),
        ("manipulated", "N"),
        ("moved_before_recovery", "0"),
        ("catching_method", "M"),
        ("catching_lures", "U"),
        ("sex_mentioned", "U"),
        ("sex_concluded", "U"),
        ("age_mentioned", "2"),
        ("age_concluded", "2"),
        ("status", "U"),
        ("brood_size", "99"),
        ("pullus_age", "99"),
        ("accuracy_of_pullus_age", "0"),
        ("date", "01012024"),
        ("accuracy_of_date", "0"),
        ("time", "0000"),
        ("place_code", "AB00"),
        ("geographical_coordinates", "+000000+0000000"),
        ("accuracy_of_coordinates", "1"),
        ("condition", "9"),
        ("circumstances", "99"),
        ("circumstances_presumed", "0"),
        ("euring_code_identifier", "4"),
    ];
    for (key, value) in values {
        record.set_raw(key, value).expect("known key");
    }
    record
}
