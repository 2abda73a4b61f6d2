// crates/dust-core/src/core/identifiers.rs
// ============================================================================
// Module: DUST Identifiers
// Description: Opaque identifiers for audit runs.
// Purpose: Keep run keys typed across persistence and logging.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are caller-assigned strings wrapped in newtypes so they
//! cannot be confused with other text fields.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Identifier of one audit run for one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Creates a new run identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
