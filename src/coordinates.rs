//! Geographical co-ordinate codec.
//!
//! EURING stores a position as a 15-character string: a 7-character latitude
//! (`±DDMMSS`) followed by an 8-character longitude (`±DDDMMSS`). This module
//! converts between that representation and decimal degrees.
//!
//! # Example
//!
//! ```
//! use euring::coordinates::{combined_to_lat_lng, lat_lng_to_combined};
//!
//! let position = combined_to_lat_lng("+420500-0100203").unwrap();
//! assert!((position.lat - 42.0833).abs() < 1e-4);
//! assert!((position.lng + 10.0342).abs() < 1e-4);
//! assert_eq!(lat_lng_to_combined(position.lat, position.lng), "+420500-0100203");
//! ```

use crate::error::{EuringError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the combined latitude + longitude string.
pub const COMBINED_LENGTH: usize = 15;

/// Degree digits in the latitude component.
pub const LATITUDE_DEGREE_DIGITS: usize = 2;

/// Degree digits in the longitude component.
pub const LONGITUDE_DEGREE_DIGITS: usize = 3;

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude, positive north.
    pub lat: f64,
    /// Longitude, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Create a new position.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Encode as the 15-character EURING string.
    #[must_use]
    pub fn to_euring(&self) -> String {
        lat_lng_to_combined(self.lat, self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat: {} lng: {}", self.lat, self.lng)
    }
}

/// Convert decimal degrees to `±D…DMMSS` text.
///
/// Seconds are rounded; a rounded value of 60 carries into minutes, and 60
/// minutes carry into the degrees. The sign is taken from the value itself,
/// so `-0.5` encodes as `-003000` with three degree digits.
#[must_use]
pub fn decimal_to_dms(value: f64, degree_digits: usize) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    let magnitude = value.abs();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (mut degrees, mut minutes, mut seconds) = {
        let degrees = magnitude.trunc();
        let sub_minutes = (magnitude - degrees) * 60.0;
        let minutes = sub_minutes.trunc();
        let seconds = ((sub_minutes - minutes) * 60.0).round();
        (degrees as u32, minutes as u32, seconds as u32)
    };

    if seconds == 60 {
        seconds = 0;
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        degrees += 1;
    }

    format!("{sign}{degrees:0degree_digits$}{minutes:02}{seconds:02}")
}

/// Convert a single `±D…DMMSS` component to decimal degrees.
///
/// # Errors
///
/// Returns a constraint error if the text is too short or its parts are not
/// numbers.
pub fn dms_to_decimal(text: &str) -> Result<f64> {
    let unparsable =
        || EuringError::Constraint(format!("Could not parse coordinate \"{text}\" to decimal."));

    if !text.is_ascii() || text.len() < 5 {
        return Err(unparsable());
    }
    let (sign, digits) = match text.as_bytes()[0] {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if digits.len() <= 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unparsable());
    }

    let split = digits.len() - 4;
    let degrees: f64 = digits[..split].parse().map_err(|_| unparsable())?;
    let minutes: f64 = digits[split..split + 2].parse().map_err(|_| unparsable())?;
    let seconds: f64 = digits[split + 2..].parse().map_err(|_| unparsable())?;

    Ok(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Check one component of a combined co-ordinate string.
fn validate_component(text: &str, degree_digits: usize, max_degrees: u32) -> Result<()> {
    let invalid =
        || EuringError::Constraint(format!("Value \"{text}\" is not a valid set of coordinates."));

    if text.len() != 1 + degree_digits + 4 || !text.is_ascii() {
        return Err(invalid());
    }
    if !matches!(text.as_bytes()[0], b'+' | b'-') {
        return Err(invalid());
    }
    let digits = &text[1..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let degrees: u32 = digits[..degree_digits].parse().map_err(|_| invalid())?;
    let minutes: u32 = digits[degree_digits..degree_digits + 2]
        .parse()
        .map_err(|_| invalid())?;
    let seconds: u32 = digits[degree_digits + 2..].parse().map_err(|_| invalid())?;
    if degrees > max_degrees || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }
    Ok(())
}

/// Validate a 15-character combined co-ordinate string.
///
/// # Errors
///
/// Returns a constraint error if the length is not 15, a sign is missing,
/// a part is not numeric, or a part is out of range (degrees above 90/180,
/// minutes or seconds above 59).
pub fn validate_combined(text: &str) -> Result<()> {
    if text.len() != COMBINED_LENGTH || !text.is_ascii() {
        return Err(EuringError::Constraint(format!(
            "Value \"{text}\" is not a valid set of coordinates."
        )));
    }
    let (lat, lng) = text.split_at(1 + LATITUDE_DEGREE_DIGITS + 4);
    validate_component(lat, LATITUDE_DEGREE_DIGITS, 90)?;
    validate_component(lng, LONGITUDE_DEGREE_DIGITS, 180)
}

/// Decode a 15-character combined string into a position.
///
/// # Errors
///
/// Returns a constraint error if [`validate_combined`] rejects the text.
pub fn combined_to_lat_lng(text: &str) -> Result<LatLng> {
    validate_combined(text)?;
    let (lat, lng) = text.split_at(1 + LATITUDE_DEGREE_DIGITS + 4);
    Ok(LatLng {
        lat: dms_to_decimal(lat)?,
        lng: dms_to_decimal(lng)?,
    })
}

/// Encode a position as the 15-character combined string.
#[must_use]
pub fn lat_lng_to_combined(lat: f64, lng: f64) -> String {
    let mut combined = decimal_to_dms(lat, LATITUDE_DEGREE_DIGITS);
    combined.push_str(&decimal_to_dms(lng, LONGITUDE_DEGREE_DIGITS));
    combined
}
