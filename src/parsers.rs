//! Parser hooks for fields whose wire text needs more than a type check.
//!
//! Each parser receives text that already passed the length and type
//! checks of its field and returns the typed value, or a constraint error.

use crate::coordinates::{combined_to_lat_lng, COMBINED_LENGTH};
use crate::error::{EuringError, Result};
use crate::utils::is_all_hyphens;
use crate::value::FieldValue;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACE_CODE: Regex =
        Regex::new(r"^[A-Z]{2}([A-Z]{2}|[0-9]{2}|--)$").expect("valid regex");
}

/// Placeholder for absent geographical co-ordinates.
pub const EMPTY_COORDINATES: &str = "...............";

/// Validate ring-number padding and return the number as written.
///
/// Padding dots form one block immediately left of the rightmost run of
/// digits, or lead the number when it has no digits.
///
/// # Errors
///
/// Returns a constraint error for misplaced dots or characters other than
/// letters, digits and dots.
pub fn ring_number(value: &str) -> Result<Option<FieldValue>> {
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
        return Err(EuringError::Constraint(format!(
            "Value \"{value}\" is not a valid identification number."
        )));
    }
    if value.contains('.') {
        match value.rfind(|c: char| c.is_ascii_digit()) {
            Some(last_digit) => {
                let run = value[..=last_digit]
                    .bytes()
                    .rev()
                    .take_while(u8::is_ascii_digit)
                    .count();
                let start = last_digit + 1 - run;
                let prefix = &value[..start];
                let suffix = &value[last_digit + 1..];
                if prefix.trim_end_matches('.').contains('.') || suffix.contains('.') {
                    return Err(EuringError::Constraint(
                        "Identification number (ring) padding dots must be immediately before the rightmost digits."
                            .to_string(),
                    ));
                }
            }
            None => {
                if value.trim_start_matches('.').contains('.') {
                    return Err(EuringError::Constraint(
                        "Identification number (ring) padding dots must be leading when no digits are present."
                            .to_string(),
                    ));
                }
            }
        }
    }
    Ok(Some(FieldValue::Text(value.to_string())))
}

/// Parse a `ddmmyyyy` date.
///
/// # Errors
///
/// Returns a constraint error for the all-hyphen placeholder or a value
/// that is not a real calendar date.
pub fn date(value: &str) -> Result<Option<FieldValue>> {
    if is_all_hyphens(value) {
        return Err(EuringError::Constraint(
            "Date cannot be all dashes; provide an estimated real date instead.".to_string(),
        ));
    }
    let invalid =
        || EuringError::Constraint(format!("Value \"{value}\" is not a valid ddmmyyyy date."));
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let day = value[0..2].parse().map_err(|_| invalid())?;
    let month = value[2..4].parse().map_err(|_| invalid())?;
    let year = value[4..8].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| Some(FieldValue::Date(d)))
        .ok_or_else(invalid)
}

/// Validate an `hhmm` time where unknown digits may be hyphens.
///
/// # Errors
///
/// Returns a constraint error for other characters or out-of-range hours
/// and minutes.
pub fn time(value: &str) -> Result<Option<FieldValue>> {
    let invalid = || EuringError::Constraint(format!("Value \"{value}\" is not a valid time."));
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return Err(invalid());
    }
    let hours = &value[0..2];
    let minutes = &value[2..4];
    if let Ok(h) = hours.parse::<u8>() {
        if h > 23 {
            return Err(invalid());
        }
    }
    if let Ok(m) = minutes.parse::<u8>() {
        if m > 59 {
            return Err(invalid());
        }
    }
    Ok(Some(FieldValue::Text(value.to_string())))
}

/// Validate a place code: `AA##`, `AAAA` or `AA--`.
///
/// # Errors
///
/// Returns a constraint error for any other shape.
pub fn place_code(value: &str) -> Result<Option<FieldValue>> {
    if PLACE_CODE.is_match(value) {
        Ok(Some(FieldValue::Text(value.to_string())))
    } else {
        Err(EuringError::Constraint(format!(
            "Value \"{value}\" is not a valid place code format."
        )))
    }
}

/// Decode geographical co-ordinates; the 15-dot placeholder is absent.
///
/// # Errors
///
/// Returns a constraint error when the co-ordinates are malformed.
pub fn geographical_coordinates(value: &str) -> Result<Option<FieldValue>> {
    if value == EMPTY_COORDINATES {
        return Ok(None);
    }
    if value.len() != COMBINED_LENGTH {
        return Err(EuringError::Constraint(format!(
            "Value \"{value}\" is not a valid set of coordinates."
        )));
    }
    combined_to_lat_lng(value).map(|position| Some(FieldValue::Coordinates(position)))
}

/// Parse a direction in degrees, 0 to 359.
///
/// # Errors
///
/// Returns a constraint error for negative or out-of-range directions.
pub fn direction(value: &str) -> Result<Option<FieldValue>> {
    let degrees: u16 = value.parse().map_err(|_| {
        EuringError::Constraint(format!("Value \"{value}\" is not a valid direction."))
    })?;
    if degrees > 359 {
        return Err(EuringError::Constraint(
            "Direction must be between 0 and 359 degrees.".to_string(),
        ));
    }
    Ok(Some(FieldValue::Integer(i64::from(degrees))))
}

fn decimal_coordinate(value: &str, max_abs: f64, field_name: &str) -> Result<Option<FieldValue>> {
    let parsed: f64 = value.parse().map_err(|_| {
        EuringError::Constraint(format!("Value \"{value}\" is not a valid {field_name}."))
    })?;
    if parsed.abs() > max_abs {
        return Err(EuringError::Constraint(format!(
            "{field_name} must be between -{max_abs} and {max_abs}."
        )));
    }
    if let Some((_, decimals)) = value.split_once('.') {
        if decimals.len() > 4 {
            return Err(EuringError::Constraint(format!(
                "{field_name} must have at most 4 decimal places."
            )));
        }
    }
    Ok(Some(FieldValue::Decimal(parsed)))
}

/// Parse a decimal latitude: at most 90 degrees, 4 decimal places.
///
/// # Errors
///
/// Returns a constraint error when out of range or too precise.
pub fn latitude(value: &str) -> Result<Option<FieldValue>> {
    decimal_coordinate(value, 90.0, "Latitude")
}

/// Parse a decimal longitude: at most 180 degrees, 4 decimal places.
///
/// # Errors
///
/// Returns a constraint error when out of range or too precise.
pub fn longitude(value: &str) -> Result<Option<FieldValue>> {
    decimal_coordinate(value, 180.0, "Longitude")
}

/// Validate an old greater coverts code: `0`-`9` or `A`.
///
/// # Errors
///
/// Returns a constraint error for any other code.
pub fn old_greater_coverts(value: &str) -> Result<Option<FieldValue>> {
    match value.as_bytes() {
        [b'0'..=b'9' | b'A'] => Ok(Some(FieldValue::Text(value.to_string()))),
        _ => Err(EuringError::Constraint(format!(
            "Value \"{value}\" is not a valid Old Greater Coverts code."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_number_padding() {
        assert_eq!(
            ring_number("CD...52065").unwrap(),
            Some(FieldValue::from("CD...52065"))
        );
        assert_eq!(
            ring_number("1234567890").unwrap(),
            Some(FieldValue::from("1234567890"))
        );
        assert_eq!(
            ring_number(".......ABC").unwrap(),
            Some(FieldValue::from(".......ABC"))
        );
        assert_eq!(
            ring_number("AB1.....23").unwrap(),
            Some(FieldValue::from("AB1.....23"))
        );
        assert!(ring_number("C.D..52065").is_err());
        assert!(ring_number("CD52065...").is_err());
        assert!(ring_number("AB...C").is_err());
        assert!(ring_number("AB 1234567").is_err());
        assert!(ring_number("123.......").is_err());
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date("12071976").unwrap(),
            Some(FieldValue::Date(NaiveDate::from_ymd_opt(1976, 7, 12).unwrap()))
        );
        let err = date("--------").unwrap_err();
        assert!(err.to_string().contains("all dashes"));
        assert!(date("31022024").is_err());
    }

    #[test]
    fn test_time() {
        assert!(time("2359").is_ok());
        assert!(time("----").is_ok());
        assert!(time("12--").is_ok());
        assert!(time("2400").is_err());
        assert!(time("1260").is_err());
        assert!(time("12:0").is_err());
    }

    #[test]
    fn test_place_code() {
        assert!(place_code("SV55").is_ok());
        assert!(place_code("DECK").is_ok());
        assert!(place_code("GB--").is_ok());
        assert!(place_code("G155").is_err());
        assert!(place_code("GB5-").is_err());
    }

    #[test]
    fn test_geographical_coordinates() {
        assert_eq!(geographical_coordinates(EMPTY_COORDINATES).unwrap(), None);
        let value = geographical_coordinates("+584200+0134800").unwrap().unwrap();
        let position = value.as_coordinates().unwrap();
        assert!((position.lat - 58.7).abs() < 1e-9);
        assert!((position.lng - 13.8).abs() < 1e-9);
        assert!(geographical_coordinates("invalidcoords").is_err());
    }

    #[test]
    fn test_direction() {
        assert_eq!(direction("023").unwrap(), Some(FieldValue::Integer(23)));
        assert!(direction("360").is_err());
    }

    #[test]
    fn test_latitude_longitude() {
        assert_eq!(latitude("1.0000").unwrap(), Some(FieldValue::Decimal(1.0)));
        assert!(latitude("90.0001").is_err());
        assert!(latitude("10.00001").is_err());
        assert!(longitude("-180.0000").is_ok());
        assert!(longitude("180.0001").is_err());
    }

    #[test]
    fn test_old_greater_coverts() {
        assert!(old_greater_coverts("7").is_ok());
        assert!(old_greater_coverts("A").is_ok());
        assert!(old_greater_coverts("B").is_err());
    }
}
