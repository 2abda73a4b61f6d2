// crates/dust-core/tests/catalogue_properties.rs
// ============================================================================
// Module: Catalogue Property Tests
// Description: Structural and property checks across every catalogue.
// Purpose: Ensure catalogues are complete, deterministic, and total.
// ============================================================================

//! Catalogue property tests.

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

use std::collections::BTreeSet;

use dust_core::AuditSettings;
use dust_core::Severity;
use dust_core::SystemName;
use dust_core::catalogue;
use dust_core::catalogues;
use dust_core::is_valid_test_id;
use dust_core::runtime::validate_national_id;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use support::aad_employee;
use support::ad_employee;
use support::bundle;
use support::employee;
use support::feide_employee;
use support::run;
use support::snapshot;
use support::student;

// ============================================================================
// SECTION: Structure
// ============================================================================

#[test]
fn catalogue_sizes_are_fixed() {
    assert_eq!(catalogue(SystemName::Ad).unwrap().len(), 14);
    assert_eq!(catalogue(SystemName::Aad).unwrap().len(), 7);
    assert_eq!(catalogue(SystemName::Feide).unwrap().len(), 17);
    assert_eq!(catalogues().count(), 3);
    for system in [SystemName::Visma, SystemName::Pifu, SystemName::P360] {
        assert!(catalogue(system).is_none());
    }
}

#[test]
fn test_ids_are_well_formed_and_unique() {
    let mut seen = BTreeSet::new();
    for catalogue in catalogues() {
        for (index, spec) in catalogue.tests.iter().enumerate() {
            assert!(is_valid_test_id(spec.id), "{}", spec.id);
            assert_eq!(spec.id, format!("{}-{:02}", catalogue.system, index + 1));
            assert!(!spec.title.is_empty());
            assert!(!spec.description.is_empty());
            assert!(seen.insert(spec.id), "duplicate {}", spec.id);
        }
    }
}

#[test]
fn evaluation_without_bundle_never_errors_on_cross_checks() {
    let feide = run(SystemName::Feide, feide_employee(), &employee(), None);
    let aad = run(SystemName::Aad, aad_employee(), &employee(), None);
    for outcome in feide.iter().chain(aad.iter()) {
        if ["feide-04", "feide-05", "feide-07", "feide-12", "aad-04"].contains(&outcome.id.as_str()) {
            assert_eq!(outcome.severity, Severity::NoData, "{}", outcome.id);
        }
    }
}

#[test]
fn concurrent_evaluations_are_independent() {
    let bundle = bundle(vec![
        (SystemName::Ad, ad_employee()),
        (SystemName::Aad, aad_employee()),
        (SystemName::Feide, feide_employee()),
    ]);
    let settings = AuditSettings::default();
    let ad = snapshot(SystemName::Ad, ad_employee());
    let user = employee();
    let expected = dust_core::validate(SystemName::Ad, &ad, &user, Some(&bundle), &settings);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| dust_core::validate(SystemName::Ad, &ad, &user, Some(&bundle), &settings))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// ============================================================================
// SECTION: Properties
// ============================================================================

fn attribute_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[A-Za-z0-9@. ]{0,16}".prop_map(Value::String),
        prop::collection::vec("[a-z:. +]{0,24}", 0..3).prop_map(|items| json!(items)),
    ]
}

fn arbitrary_snapshot() -> impl Strategy<Value = Value> {
    let fields = prop::sample::select(vec![
        "enabled",
        "lockedOut",
        "samAccountName",
        "givenName",
        "displayName",
        "employeeNumber",
        "userPrincipalName",
        "mail",
        "distinguishedName",
        "proxyAddresses",
        "uid",
        "name",
        "norEduPersonNIN",
        "norEduPersonAuthnMethod",
        "eduPersonAffiliation",
        "assignedLicenses",
        "pwdLastSet",
        "passwordLastSet",
    ]);
    prop::collection::vec((fields, attribute_value()), 0..12).prop_map(|entries| {
        let map: Map<String, Value> =
            entries.into_iter().map(|(field, value)| (field.to_string(), value)).collect();
        Value::Object(map)
    })
}

proptest! {
    #[test]
    fn every_catalogue_is_total_and_deterministic(raw in arbitrary_snapshot(), is_student in any::<bool>()) {
        let user = if is_student { student() } else { employee() };
        let bundle = bundle(vec![(SystemName::Ad, raw.clone())]);
        for system in [SystemName::Ad, SystemName::Aad, SystemName::Feide] {
            let first = run(system, raw.clone(), &user, Some(&bundle));
            let second = run(system, raw.clone(), &user, Some(&bundle));
            prop_assert_eq!(first.len(), catalogue(system).unwrap().len());
            prop_assert_eq!(&first, &second);
            prop_assert!(first.iter().all(|outcome| !outcome.message.is_empty()));
        }
    }

    #[test]
    fn national_id_validation_never_panics(value in "\\PC{0,14}") {
        let check = validate_national_id(&value);
        prop_assert_eq!(check.valid, check.error.is_none());
    }

    #[test]
    fn eleven_digit_numbers_are_classified_or_rejected(value in "[0-9]{11}") {
        let check = validate_national_id(&value);
        if check.valid {
            prop_assert!(check.kind.is_some());
        } else {
            prop_assert!(check.error.is_some());
        }
    }
}
