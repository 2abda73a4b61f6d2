// crates/dust-core/src/core/severity.rs
// ============================================================================
// Module: DUST Severity Model
// Description: Severity vocabulary and result builders for audit tests.
// Purpose: Provide the four verdict kinds and their pure constructors.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every audit test resolves to one of four severities. Result builders
//! produce a [`CheckResult`] stub carrying the severity, a human-readable
//! message, and optional evidence; the registration primitive later merges
//! the stub with the test identity.
//!
//! `no-data` is a first-class non-judgment and is never treated as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message used when a `no-data` result is built without one.
pub const DEFAULT_NO_DATA_MESSAGE: &str = "Waiting for data...";

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Verdict severity for a single audit test.
///
/// # Invariants
/// - Wire labels are stable: `success`, `warning`, `error`, `no-data`.
/// - Ordering ranks `NoData < Success < Warning < Error` and is used only for
///   summaries ("worst severity").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Nothing to report, or the test cannot be evaluated yet.
    #[serde(rename = "no-data")]
    NoData,
    /// The checked property holds.
    #[serde(rename = "success")]
    Success,
    /// Unexpected but explainable state.
    #[serde(rename = "warning")]
    Warning,
    /// The checked property is violated.
    #[serde(rename = "error")]
    Error,
}

impl Severity {
    /// All severities in ascending rank order.
    pub const ALL: [Self; 4] = [Self::NoData, Self::Success, Self::Warning, Self::Error];

    /// Returns the stable wire label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "no-data",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Check Result
// ============================================================================

/// Result stub returned by a test predicate.
///
/// # Invariants
/// - Identity fields (`id`, `title`, `description`) are absent; they are
///   merged in by the registration primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Verdict severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Optional diagnostic evidence copied from the snapshots used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
}

impl CheckResult {
    /// Builds a result with an explicit severity.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            evidence: None,
        }
    }

    /// Builds a `success` result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Builds a `warning` result.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Builds an `error` result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Builds a `no-data` result with the default message.
    #[must_use]
    pub fn no_data() -> Self {
        Self::new(Severity::NoData, DEFAULT_NO_DATA_MESSAGE)
    }

    /// Builds a `no-data` result with a custom message.
    #[must_use]
    pub fn no_data_with(message: impl Into<String>) -> Self {
        Self::new(Severity::NoData, message)
    }

    /// Attaches evidence to the result.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Value) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use serde_json::json;

    use super::*;

    #[test]
    fn severity_labels_are_verbatim() {
        let labels: Vec<String> = Severity::ALL
            .iter()
            .map(|severity| serde_json::to_value(severity).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(labels, ["no-data", "success", "warning", "error"]);
    }

    #[test]
    fn no_data_uses_default_message() {
        let result = CheckResult::no_data();
        assert_eq!(result.severity, Severity::NoData);
        assert_eq!(result.message, DEFAULT_NO_DATA_MESSAGE);
        assert!(result.evidence.is_none());
    }

    #[test]
    fn evidence_is_attached() {
        let result = CheckResult::error("broken").with_evidence(json!({"a": 1}));
        assert_eq!(result.evidence, Some(json!({"a": 1})));
    }

    #[test]
    fn worst_severity_is_error() {
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Error));
    }
}
