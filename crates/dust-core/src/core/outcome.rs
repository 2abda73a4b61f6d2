// crates/dust-core/src/core/outcome.rs
// ============================================================================
// Module: DUST Test Outcomes
// Description: Atomic verdict records produced by audit tests.
// Purpose: Define the persisted shape of one test's result and its id format.
// Dependencies: crate::core::severity, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`TestOutcome`] is one test's verdict merged with the test identity.
//! Test ids take the form `<system-slug>-<two-digit-sequence>` and are the
//! primary key used for historical comparison, so they never change once
//! released.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::severity::CheckResult;
use crate::core::severity::Severity;

// ============================================================================
// SECTION: Test Outcome
// ============================================================================

/// Verdict of one audit test.
///
/// # Invariants
/// - `id` matches `^[a-z]+-\d{2}$` for catalogue tests.
/// - `evidence` is diagnostic only and has no required structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Stable test identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description of what is checked.
    pub description: String,
    /// Verdict severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Optional evidence copied from the snapshots used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
}

impl TestOutcome {
    /// Merges a result stub with the test identity.
    #[must_use]
    pub fn from_result(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        result: CheckResult,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            severity: result.severity,
            message: result.message,
            evidence: result.evidence,
        }
    }
}

// ============================================================================
// SECTION: Test Id Format
// ============================================================================

/// Returns true when `id` has the `<system-slug>-<two-digit-sequence>` form.
#[must_use]
pub fn is_valid_test_id(id: &str) -> bool {
    let Some((slug, sequence)) = id.split_once('-') else {
        return false;
    };
    !slug.is_empty()
        && slug.bytes().all(|byte| byte.is_ascii_lowercase())
        && sequence.len() == 2
        && sequence.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::is_valid_test_id;

    #[test]
    fn test_id_format() {
        assert!(is_valid_test_id("ad-01"));
        assert!(is_valid_test_id("feide-17"));
        assert!(!is_valid_test_id("ad-1"));
        assert!(!is_valid_test_id("ad-001"));
        assert!(!is_valid_test_id("AD-01"));
        assert!(!is_valid_test_id("-01"));
        assert!(!is_valid_test_id("ad01"));
        assert!(!is_valid_test_id("a-d-01"));
    }
}
