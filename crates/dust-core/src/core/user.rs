// crates/dust-core/src/core/user.rs
// ============================================================================
// Module: DUST User Context
// Description: Subject identity and expected classification for an audit run.
// Purpose: Provide the immutable caller-supplied input shared by every test.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The user context identifies whose accounts are audited and how they are
//! expected to be classified. Validators only read it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Expected Type
// ============================================================================

/// Expected classification of the audited user.
///
/// # Invariants
/// - Wire labels are `employee` and `student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    /// Staff member sourced from the HR roster.
    Employee,
    /// Pupil sourced from the student roster.
    Student,
}

impl ExpectedType {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Student => "student",
        }
    }

    /// Returns the other classification.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Employee => Self::Student,
            Self::Student => Self::Employee,
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: User Context
// ============================================================================

/// Caller-supplied description of the audited user.
///
/// # Invariants
/// - Never mutated by validators.
/// - Optional attributes are `None` when the caller did not supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// Expected classification.
    pub expected_type: ExpectedType,
    /// Short department code (used for license lookups).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_short: Option<String>,
    /// Company attribute (school name for students).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Display name, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// User principal name used to fetch snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    /// Account name used to fetch snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sam_account_name: Option<String>,
}

impl UserContext {
    /// Creates a context with only the expected classification set.
    #[must_use]
    pub const fn new(expected_type: ExpectedType) -> Self {
        Self {
            expected_type,
            department_short: None,
            company: None,
            display_name: None,
            user_principal_name: None,
            sam_account_name: None,
        }
    }

    /// Returns true when the user is expected to be an employee.
    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.expected_type == ExpectedType::Employee
    }

    /// Returns a short identity label for logs (never the national id).
    #[must_use]
    pub fn identity_label(&self) -> &str {
        self.user_principal_name
            .as_deref()
            .or(self.sam_account_name.as_deref())
            .unwrap_or("unknown")
    }
}
