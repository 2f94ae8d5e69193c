//! Formatting helpers for identification numbers, scheme codes and species
//! codes.

use crate::error::{EuringError, Result};

/// Width of the identification number field.
pub const IDENTIFICATION_LENGTH: usize = 10;

/// Whether `value` is non-empty and consists only of hyphens.
#[must_use]
pub fn is_all_hyphens(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b == b'-')
}

/// Upper-case an identification number and drop everything that is not an
/// ASCII letter or digit.
///
/// ```
/// use euring::utils::identification_display_format;
///
/// assert_eq!(identification_display_format("ab.12-3"), "AB123");
/// ```
#[must_use]
pub fn identification_display_format(number: &str) -> String {
    number
        .to_ascii_uppercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Normalise an identification number and pad it to 10 characters for
/// export.
///
/// Padding dots go immediately to the left of the rightmost run of digits;
/// without digits they lead. Numbers of 10 or more characters are returned
/// unchanged so that the field length check rejects them.
///
/// ```
/// use euring::utils::identification_export_format;
///
/// assert_eq!(identification_export_format("AB123"), "AB.....123");
/// assert_eq!(identification_export_format("ABC"), ".......ABC");
/// ```
#[must_use]
pub fn identification_export_format(number: &str) -> String {
    pad_identification_number(&identification_display_format(number))
}

/// Pad an undotted identification number to 10 characters.
///
/// Text that already carries padding dots, or is at least 10 characters
/// long, is returned as written.
///
/// ```
/// use euring::utils::pad_identification_number;
///
/// assert_eq!(pad_identification_number("CD52065"), "CD...52065");
/// assert_eq!(pad_identification_number("AB1.....23"), "AB1.....23");
/// assert_eq!(pad_identification_number("AB123456789XYZ"), "AB123456789XYZ");
/// ```
#[must_use]
pub fn pad_identification_number(number: &str) -> String {
    let len = number.chars().count();
    if len >= IDENTIFICATION_LENGTH || number.contains('.') || !number.is_ascii() {
        return number.to_string();
    }

    let dots = ".".repeat(IDENTIFICATION_LENGTH - len);
    let insert_at = match number.rfind(|c: char| c.is_ascii_digit()) {
        Some(last_digit) => {
            let run = number[..=last_digit]
                .bytes()
                .rev()
                .take_while(u8::is_ascii_digit)
                .count();
            last_digit + 1 - run
        }
        None => 0,
    };

    let mut result = String::with_capacity(IDENTIFICATION_LENGTH);
    result.push_str(&number[..insert_at]);
    result.push_str(&dots);
    result.push_str(&number[insert_at..]);
    result
}

/// Format a ringing scheme code: upper-case, at most three characters,
/// right-aligned.
///
/// ```
/// use euring::utils::scheme_export_format;
///
/// assert_eq!(scheme_export_format("GB"), " GB");
/// assert_eq!(scheme_export_format("abcde"), "ABC");
/// ```
#[must_use]
pub fn scheme_export_format(code: &str) -> String {
    let upper: String = code.to_uppercase().chars().take(3).collect();
    format!("{upper:>3}")
}

/// Zero-pad a species code to five digits. An empty code exports as
/// `00000`.
///
/// # Errors
///
/// Returns a constraint error if the code is not a number or has more than
/// five characters.
pub fn species_export_format(code: &str) -> Result<String> {
    if code.is_empty() {
        return Ok("00000".to_string());
    }
    if code.parse::<i64>().is_err() {
        return Err(EuringError::Constraint(format!(
            "Value \"{code}\" is not a valid EURING species code."
        )));
    }
    if code.len() > 5 {
        return Err(EuringError::Constraint(format!(
            "EURING species code \"{code}\" is too long."
        )));
    }
    Ok(format!("{code:0>5}"))
}
