// crates/dust-core/src/runtime/fnr.rs
// ============================================================================
// Module: DUST National Identity Numbers
// Description: Norwegian national identity number validation.
// Purpose: Verify identity numbers stored in directory attributes.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A Norwegian national identity number has eleven digits: a six-digit birth
//! date, a three-digit individual number, and two mod-11 check digits.
//! D-numbers add 4 to the first digit; H-numbers add 4 to the third.
//!
//! [`validate_national_id`] never fails; the outcome records the reason when
//! a number is rejected so it can be attached to test evidence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Weights for the first check digit.
const FIRST_WEIGHTS: [u32; 9] = [3, 7, 6, 1, 8, 9, 4, 5, 2];
/// Weights for the second check digit.
const SECOND_WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Kind of national identity number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NationalIdKind {
    /// Ordinary birth number.
    #[serde(rename = "fødselsnummer")]
    BirthNumber,
    /// Number issued to people without permanent residence.
    #[serde(rename = "D-number")]
    DNumber,
    /// Temporary number issued by health services.
    #[serde(rename = "H-number")]
    HNumber,
}

impl NationalIdKind {
    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BirthNumber => "fødselsnummer",
            Self::DNumber => "D-number",
            Self::HNumber => "H-number",
        }
    }
}

impl fmt::Display for NationalIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a national identity number.
///
/// # Invariants
/// - `valid` implies `kind` is set and `error` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationalIdCheck {
    /// Whether the number passed every check.
    pub valid: bool,
    /// Detected kind, when the layout was recognised.
    #[serde(rename = "type")]
    pub kind: Option<NationalIdKind>,
    /// Rejection reason.
    pub error: Option<String>,
}

impl NationalIdCheck {
    /// Builds a rejected outcome.
    fn rejected(kind: Option<NationalIdKind>, error: &str) -> Self {
        Self {
            valid: false,
            kind,
            error: Some(error.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a national identity number.
#[must_use]
pub fn validate_national_id(value: &str) -> NationalIdCheck {
    let value = value.trim();
    let digits: Vec<u32> = value.chars().filter_map(|ch| ch.to_digit(10)).collect();
    if digits.len() != 11 || value.chars().count() != 11 {
        return NationalIdCheck::rejected(None, "National identity number must be 11 digits");
    }

    let (kind, day, month) = if digits[0] >= 4 {
        (NationalIdKind::DNumber, (digits[0] - 4) * 10 + digits[1], digits[2] * 10 + digits[3])
    } else if digits[2] >= 4 {
        (NationalIdKind::HNumber, digits[0] * 10 + digits[1], (digits[2] - 4) * 10 + digits[3])
    } else {
        (NationalIdKind::BirthNumber, digits[0] * 10 + digits[1], digits[2] * 10 + digits[3])
    };
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return NationalIdCheck::rejected(Some(kind), "Invalid birth date in national identity number");
    }

    let first = check_digit(&digits[..9], &FIRST_WEIGHTS);
    let second = check_digit(&digits[..10], &SECOND_WEIGHTS);
    if first != Some(digits[9]) || second != Some(digits[10]) {
        return NationalIdCheck::rejected(Some(kind), "Invalid check digits in national identity number");
    }

    NationalIdCheck {
        valid: true,
        kind: Some(kind),
        error: None,
    }
}

/// Computes a mod-11 check digit, `None` when the remainder makes it 10.
fn check_digit(digits: &[u32], weights: &[u32]) -> Option<u32> {
    let sum: u32 = digits.iter().zip(weights).map(|(digit, weight)| digit * weight).sum();
    match 11 - sum % 11 {
        11 => Some(0),
        10 => None,
        digit => Some(digit),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_birth_number() {
        let check = validate_national_id("01010012356");
        assert!(check.valid);
        assert_eq!(check.kind, Some(NationalIdKind::BirthNumber));
    }

    #[test]
    fn detects_d_and_h_numbers() {
        assert_eq!(validate_national_id("41010012420").kind, Some(NationalIdKind::DNumber));
        assert_eq!(validate_national_id("01410012339").kind, Some(NationalIdKind::HNumber));
    }

    #[test]
    fn rejects_bad_checksum() {
        let check = validate_national_id("01010012357");
        assert!(!check.valid);
        assert!(check.error.is_some());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!validate_national_id("0101001235").valid);
        assert!(!validate_national_id("0101001235a").valid);
        assert!(!validate_national_id("").valid);
    }
}
