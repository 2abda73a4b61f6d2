// crates/dust-core/tests/feide_validator.rs
// ============================================================================
// Module: FEIDE Catalogue Tests
// Description: Validate the FEIDE rule table.
// Purpose: Pin cross-system comparisons, MFA, and affiliation handling.
// ============================================================================

//! FEIDE catalogue tests.

#![allow(
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

mod support;

use dust_core::Severity;
use dust_core::SnapshotBundle;
use dust_core::SystemName;
use dust_core::TestOutcome;
use serde_json::Value;
use serde_json::json;
use support::ad_employee;
use support::bundle;
use support::employee;
use support::feide_employee;
use support::outcome;
use support::run;
use support::severity;
use support::student;
use support::with;
use support::without;

fn ad_bundle() -> SnapshotBundle {
    bundle(vec![(SystemName::Ad, ad_employee()), (SystemName::Feide, feide_employee())])
}

fn run_with_ad(feide: Value) -> Vec<TestOutcome> {
    let bundle = ad_bundle();
    run(SystemName::Feide, feide, &employee(), Some(&bundle))
}

// ============================================================================
// SECTION: Consistent User
// ============================================================================

#[test]
fn consistent_employee_passes_every_test() {
    let outcomes = run_with_ad(feide_employee());
    assert_eq!(outcomes.len(), 17);
    for outcome in &outcomes {
        assert_eq!(outcome.severity, Severity::Success, "{outcome:?}");
    }
}

#[test]
fn cross_system_tests_need_a_bundle() {
    let outcomes = run(SystemName::Feide, feide_employee(), &employee(), None);
    for id in ["feide-04", "feide-05", "feide-07", "feide-12"] {
        assert_eq!(severity(&outcomes, id), Severity::NoData, "{id}");
    }
    assert_eq!(severity(&outcomes, "feide-03"), Severity::Success);
}

// ============================================================================
// SECTION: Comparisons With AD
// ============================================================================

#[test]
fn identity_number_mismatch_is_an_error() {
    let outcomes = run_with_ad(with(feide_employee(), "norEduPersonNIN", json!("15058512343")));
    let matches = outcome(&outcomes, "feide-04");
    assert_eq!(matches.severity, Severity::Error);
    assert_eq!(matches.message, "National identity number differs from AD");
    assert_eq!(severity(&outcomes, "feide-03"), Severity::Success);
}

#[test]
fn missing_username_fails_comparison() {
    let outcomes = run_with_ad(without(feide_employee(), "name"));
    assert_eq!(severity(&outcomes, "feide-06"), Severity::Error);
    let matches = outcome(&outcomes, "feide-07");
    assert_eq!(matches.severity, Severity::Error);
    assert_eq!(matches.message, "Username is missing");
}

#[test]
fn mail_must_equal_ad_principal_name() {
    let outcomes = run_with_ad(with(feide_employee(), "mail", json!("Ola.Nordmann@vtfk.no")));
    assert_eq!(severity(&outcomes, "feide-12"), Severity::Error);
}

#[test]
fn slow_password_propagation_is_an_error() {
    let outcomes = run_with_ad(with(feide_employee(), "passwordLastSet", json!("2024-03-01T09:59:00Z")));
    let password = outcome(&outcomes, "feide-05");
    assert_eq!(password.severity, Severity::Error);
    assert_eq!(password.evidence.as_ref().unwrap()["seconds"], json!(-60.0));
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

#[test]
fn uid_must_hold_exactly_one_username() {
    let outcomes = run_with_ad(with(feide_employee(), "uid", json!(["ola0101", "ola0102"])));
    assert_eq!(severity(&outcomes, "feide-08"), Severity::Error);
    assert_eq!(outcome(&outcomes, "feide-09").message, "UID must hold exactly one username");

    let outcomes = run_with_ad(with(feide_employee(), "uid", json!(["kar0101"])));
    assert_eq!(severity(&outcomes, "feide-08"), Severity::Success);
    assert_eq!(outcome(&outcomes, "feide-09").message, "UID does not equal the username");
}

#[test]
fn non_array_uid_is_contained_as_a_fault() {
    let outcomes = run_with_ad(with(feide_employee(), "uid", json!("ola0101")));
    let uid = outcome(&outcomes, "feide-08");
    assert_eq!(uid.severity, Severity::Error);
    assert!(uid.message.starts_with("Test failed to evaluate"));
    assert_eq!(outcomes.len(), 17);
}

#[test]
fn principal_name_uses_configured_suffix() {
    let outcomes = run_with_ad(with(feide_employee(), "eduPersonPrincipalName", json!("ola@vtfk.no")));
    let principal = outcome(&outcomes, "feide-11");
    assert_eq!(principal.severity, Severity::Error);
    assert_eq!(
        principal.evidence.as_ref().unwrap()["expectedPersonPrincipalName"],
        json!("ola0101@vtfk.no")
    );
    assert_eq!(severity(&outcomes, "feide-10"), Severity::Success);
}

// ============================================================================
// SECTION: Organisation
// ============================================================================

#[test]
fn school_link_shapes() {
    let outcomes = run_with_ad(without(feide_employee(), "eduPersonOrgUnitDN"));
    assert_eq!(severity(&outcomes, "feide-13"), Severity::Error);

    let outcomes = run_with_ad(with(feide_employee(), "eduPersonOrgUnitDN", json!("ou=BDK")));
    assert_eq!(severity(&outcomes, "feide-13"), Severity::Success);

    let outcomes = run_with_ad(with(feide_employee(), "eduPersonOrgUnitDN", json!(7)));
    assert_eq!(severity(&outcomes, "feide-13"), Severity::Warning);
}

#[test]
fn wrong_organisation_is_an_error() {
    let outcomes = run_with_ad(with(feide_employee(), "eduPersonOrgDN", json!("o=Other,dc=no")));
    assert_eq!(severity(&outcomes, "feide-15"), Severity::Error);
}

#[test]
fn missing_entitlements_is_an_error() {
    let outcomes = run_with_ad(with(feide_employee(), "eduPersonEntitlement", json!([])));
    assert_eq!(severity(&outcomes, "feide-17"), Severity::Error);
}

// ============================================================================
// SECTION: MFA
// ============================================================================

#[test]
fn missing_mfa_depends_on_classification() {
    let outcomes = run_with_ad(without(feide_employee(), "norEduPersonAuthnMethod"));
    assert_eq!(severity(&outcomes, "feide-14"), Severity::Error);

    let feide = with(feide_employee(), "norEduPersonAuthnMethod", json!([]));
    let outcomes = run(SystemName::Feide, feide, &student(), None);
    assert_eq!(severity(&outcomes, "feide-14"), Severity::Success);
}

#[test]
fn mfa_methods_are_classified() {
    let outcomes = run_with_ad(with(
        feide_employee(),
        "norEduPersonAuthnMethod",
        json!(["urn:mace:feide.no:auth:method:ga secret label=phone"]),
    ));
    let mfa = outcome(&outcomes, "feide-14");
    assert_eq!(mfa.severity, Severity::Success);
    assert_eq!(mfa.message, "MFA for authenticator app is set up");
    assert_eq!(
        mfa.evidence.as_ref().unwrap()["norEduPersonAuthnMethod"],
        json!(["urn:mace:feide.no:auth:method:ga"])
    );

    let outcomes = run_with_ad(with(
        feide_employee(),
        "norEduPersonAuthnMethod",
        json!(["urn:mace:feide.no:auth:method:sms +4799999999", "urn:mace:feide.no:auth:method:ga x"]),
    ));
    assert_eq!(outcome(&outcomes, "feide-14").message, "MFA for SMS and authenticator app is set up");

    let outcomes = run_with_ad(with(
        feide_employee(),
        "norEduPersonAuthnMethod",
        json!(["urn:mace:feide.no:auth:method:webauthn key"]),
    ));
    assert_eq!(severity(&outcomes, "feide-14"), Severity::Warning);
}

// ============================================================================
// SECTION: Affiliation
// ============================================================================

#[test]
fn affiliation_of_the_other_classification_is_a_warning() {
    let outcomes = run_with_ad(with(feide_employee(), "eduPersonAffiliation", json!(["member", "student"])));
    let affiliation = outcome(&outcomes, "feide-16");
    assert_eq!(affiliation.severity, Severity::Warning);
    assert_eq!(affiliation.message, "Affiliation is set as a student although this is an employee");
}

#[test]
fn affiliation_without_member_is_an_error() {
    let outcomes = run_with_ad(with(feide_employee(), "eduPersonAffiliation", json!("employee")));
    assert_eq!(severity(&outcomes, "feide-16"), Severity::Error);

    let outcomes = run_with_ad(without(feide_employee(), "eduPersonAffiliation"));
    assert_eq!(outcome(&outcomes, "feide-16").message, "Affiliation is missing");
}
