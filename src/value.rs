//! Typed field values.

use crate::coordinates::LatLng;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// A decoded EURING field value.
///
/// Absence is modelled with `Option<FieldValue>`; there is no "empty" variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Codes and free text.
    Text(String),
    /// Whole numbers (species codes, distances, counts).
    Integer(i64),
    /// Measurements and decimal co-ordinates.
    Decimal(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// Decoded geographical co-ordinates.
    Coordinates(LatLng),
}

impl FieldValue {
    /// Borrow the text of a [`FieldValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer of a [`FieldValue::Integer`].
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The number of an integer or decimal value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// The date of a [`FieldValue::Date`].
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// The position of a [`FieldValue::Coordinates`].
    #[must_use]
    pub fn as_coordinates(&self) -> Option<LatLng> {
        match self {
            FieldValue::Coordinates(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Coordinates(c) => write!(f, "{c}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(n) => serializer.serialize_i64(*n),
            FieldValue::Decimal(d) => serializer.serialize_f64(*d),
            FieldValue::Date(_) | FieldValue::Coordinates(_) => {
                serializer.serialize_str(&self.to_string())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<LatLng> for FieldValue {
    fn from(value: LatLng) -> Self {
        FieldValue::Coordinates(value)
    }
}
