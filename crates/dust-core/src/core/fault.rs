// crates/dust-core/src/core/fault.rs
// ============================================================================
// Module: DUST Predicate Faults
// Description: Faults raised by test predicates on unexpected data shapes.
// Purpose: Give predicates a typed failure path that the registration
//          boundary converts into an `error` outcome.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A predicate that cannot make sense of its input (a required field is
//! absent or has the wrong JSON type) returns a [`CheckFault`]. Faults never
//! escape a single test; see [`crate::runtime::registration`].

use thiserror::Error;

/// Fault raised inside a single test predicate.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages name the offending field but never its value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFault {
    /// A field the predicate relies on is absent or null.
    #[error("missing field: {0}")]
    MissingField(String),
    /// A field has an unexpected JSON type.
    #[error("field {field} has unexpected type (expected {expected})")]
    WrongType {
        /// Field name.
        field: String,
        /// Expected JSON type label.
        expected: &'static str,
    },
    /// The predicate could not complete for another reason.
    #[error("{0}")]
    Other(String),
}

impl CheckFault {
    /// Creates a missing-field fault.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Creates a wrong-type fault.
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }
}
