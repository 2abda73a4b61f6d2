// crates/dust-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared fixtures and result helpers for audit engine tests.
// ============================================================================
//! ## Overview
//! Fixture snapshots describe one consistent employee and one consistent
//! student across AD, Azure AD, FEIDE, and the rosters. Tests mutate copies
//! of them to provoke individual failures.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;

use dust_core::AuditSettings;
use dust_core::ExpectedType;
use dust_core::Severity;
use dust_core::Snapshot;
use dust_core::SnapshotBundle;
use dust_core::SystemName;
use dust_core::TestOutcome;
use dust_core::UserContext;
use serde_json::Value;
use serde_json::json;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across audit integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Users
// ========================================================================

/// Employee in a department entitled to faculty licenses.
pub fn employee() -> UserContext {
    UserContext {
        department_short: Some("BDK-TEK".to_string()),
        display_name: Some("Ola Nordmann".to_string()),
        user_principal_name: Some("ola.nordmann@vtfk.no".to_string()),
        sam_account_name: Some("ola0101".to_string()),
        ..UserContext::new(ExpectedType::Employee)
    }
}

/// Student at an upper secondary school.
pub fn student() -> UserContext {
    UserContext {
        department_short: Some("ELEV".to_string()),
        company: Some("Skien videregående skole".to_string()),
        display_name: Some("Kari Nordmann".to_string()),
        user_principal_name: Some("kari.nordmann@skole.vtfk.no".to_string()),
        sam_account_name: Some("kar0101".to_string()),
        ..UserContext::new(ExpectedType::Student)
    }
}

// ========================================================================
// Snapshots
// ========================================================================

/// Consistent AD snapshot for [`employee`].
pub fn ad_employee() -> Value {
    json!({
        "enabled": true,
        "lockedOut": false,
        "samAccountName": "ola0101",
        "givenName": "Ola",
        "sn": "Nordmann",
        "displayName": "Ola Nordmann",
        "employeeNumber": "01010012356",
        "userPrincipalName": "ola.nordmann@vtfk.no",
        "mail": "Ola.Nordmann@vtfk.no",
        "distinguishedName": "CN=Ola Nordmann,OU=AUTO USERS,OU=USERS,OU=VTFK,DC=login,DC=top,DC=no",
        "extensionAttribute6": "4242",
        "proxyAddresses": ["SMTP:ola.nordmann@vtfk.no", "smtp:ola0101@vtfk.onmicrosoft.com"],
        "state": "A3",
        "pwdLastSet": "2024-03-01T10:00:00Z"
    })
}

/// Consistent AD snapshot for [`student`].
pub fn ad_student() -> Value {
    json!({
        "enabled": true,
        "lockedOut": false,
        "samAccountName": "kar0101",
        "givenName": "Kari",
        "sn": "Nordmann",
        "displayName": "Kari Nordmann",
        "employeeNumber": "01010012437",
        "userPrincipalName": "kari.nordmann@skole.vtfk.no",
        "mail": "kari.nordmann@skole.vtfk.no",
        "distinguishedName": "CN=Kari Nordmann,OU=AUTO USERS,OU=USERS,OU=VTFK,DC=skole,DC=top,DC=no",
        "proxyAddresses": [],
        "pwdLastSet": "2024-03-01T10:00:00Z"
    })
}

/// Consistent Azure AD snapshot for [`employee`].
pub fn aad_employee() -> Value {
    json!({
        "accountEnabled": true,
        "userPrincipalName": "ola.nordmann@vtfk.no",
        "mail": "ola.nordmann@vtfk.no",
        "lastPasswordChangeDateTime": "2024-03-01T10:00:05Z",
        "onPremisesSyncEnabled": true,
        "onPremisesProvisioningErrors": [],
        "assignedLicenses": [
            {"skuId": "4b590615-0888-425a-a965-b3bf7789848d"},
            {"skuId": "f30db892-07e9-47e9-837c-80727f46fd3d"}
        ]
    })
}

/// Consistent FEIDE snapshot for [`employee`].
pub fn feide_employee() -> Value {
    json!({
        "enabled": true,
        "lockedOut": false,
        "norEduPersonNIN": "01010012356",
        "passwordLastSet": "2024-03-01T10:00:10Z",
        "name": "ola0101",
        "uid": ["ola0101"],
        "eduPersonPrincipalName": "ola0101@vtfk.no",
        "mail": "ola.nordmann@vtfk.no",
        "eduPersonOrgUnitDN": ["ou=BDK,ou=units,dc=vtfk,dc=no"],
        "norEduPersonAuthnMethod": ["urn:mace:feide.no:auth:method:sms +4799999999 label=mobile"],
        "eduPersonOrgDN": "o=Vestfold og Telemark fylkeskommune,dc=vtfk,dc=no",
        "eduPersonAffiliation": ["member", "employee"],
        "eduPersonEntitlement": ["urn:mace:feide.no:go:group:u:employees"]
    })
}

/// HR roster with one active employment.
pub fn visma_active() -> Value {
    json!([{"active": true, "startDate": "2020-08-01", "position": "Adviser"}])
}

/// HR roster whose only employment has ended.
pub fn visma_inactive() -> Value {
    json!([{"active": false, "startDate": "2015-08-01", "position": "Adviser"}])
}

/// Student roster with one active membership.
pub fn pifu_active() -> Value {
    json!({"memberships": [{"active": true, "school": "Skien videregående skole"}]})
}

/// Returns a copy of `value` with `field` replaced.
pub fn with(mut value: Value, field: &str, replacement: Value) -> Value {
    value[field] = replacement;
    value
}

/// Returns a copy of `value` with `field` removed.
pub fn without(mut value: Value, field: &str) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.remove(field);
    }
    value
}

/// Builds a snapshot, panicking on unsupported shapes.
pub fn snapshot(system: SystemName, value: Value) -> Snapshot {
    Snapshot::from_value(system, value).expect("fixture snapshot")
}

/// Builds a bundle from raw fixtures.
pub fn bundle(entries: Vec<(SystemName, Value)>) -> SnapshotBundle {
    entries.into_iter().map(|(system, value)| (system, snapshot(system, value))).collect()
}

/// Runs a system's catalogue with default settings.
pub fn run(
    system: SystemName,
    value: Value,
    user: &UserContext,
    bundle: Option<&SnapshotBundle>,
) -> Vec<TestOutcome> {
    dust_core::validate(system, &snapshot(system, value), user, bundle, &AuditSettings::default())
}

/// Returns the outcome with the given id.
pub fn outcome<'a>(outcomes: &'a [TestOutcome], id: &str) -> &'a TestOutcome {
    outcomes.iter().find(|outcome| outcome.id == id).unwrap_or_else(|| panic!("missing {id}"))
}

/// Returns the severity of the outcome with the given id.
pub fn severity(outcomes: &[TestOutcome], id: &str) -> Severity {
    outcome(outcomes, id).severity
}
