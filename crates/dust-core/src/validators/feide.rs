// crates/dust-core/src/validators/feide.rs
// ============================================================================
// Module: DUST FEIDE Catalogue
// Description: Rule table for federated education identities.
// Purpose: Audit FEIDE account state, identifiers, affiliation, and MFA.
// Dependencies: crate::{core, runtime, validators::shared}, serde_json
// ============================================================================

//! ## Overview
//! Seventeen tests, `feide-01` through `feide-17`. The catalogue is ungated.
//! Tests comparing FEIDE with Active Directory report `no-data` until a
//! bundle is supplied and `error` when the bundle lacks AD data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::core::CheckResult;
use crate::core::ExpectedType;
use crate::core::SystemName;
use crate::runtime::registration::Catalogue;
use crate::runtime::registration::CheckContext;
use crate::runtime::registration::CheckOutcome;
use crate::runtime::registration::DataGate;
use crate::runtime::registration::TestSpec;
use crate::validators::shared;

// ============================================================================
// SECTION: Catalogue
// ============================================================================

/// FEIDE test catalogue.
pub static CATALOGUE: Catalogue = Catalogue {
    system: SystemName::Feide,
    gate: DataGate::None,
    tests: &TESTS,
};

/// Ordered FEIDE tests.
const TESTS: [TestSpec; 17] = [
    TestSpec::ungated(
        "feide-01",
        "Account is enabled",
        "Checks that the account is enabled in FEIDE",
        account_enabled,
    ),
    TestSpec::ungated(
        "feide-02",
        "Account is unlocked",
        "Checks that the account is not locked out in FEIDE",
        account_unlocked,
    ),
    TestSpec::ungated(
        "feide-03",
        "Has valid national identity number",
        "Checks that norEduPersonNIN holds a valid national identity number",
        national_id,
    ),
    TestSpec::ungated(
        "feide-04",
        "National identity number matches AD",
        "Checks that the national identity number is equal in AD and FEIDE",
        national_id_matches_ad,
    ),
    TestSpec::ungated(
        "feide-05",
        "Password synchronised to FEIDE",
        "Checks that the AD password reached FEIDE within the propagation tolerance",
        password_synchronised,
    ),
    TestSpec::ungated("feide-06", "Username is set", "Checks that the username is set", username_set),
    TestSpec::ungated(
        "feide-07",
        "Username matches AD",
        "Checks that the username is equal in AD and FEIDE",
        username_matches_ad,
    ),
    TestSpec::ungated("feide-08", "UID is set", "Checks that UID holds one username", uid_set),
    TestSpec::ungated(
        "feide-09",
        "UID equals username",
        "Checks that UID equals the username",
        uid_matches_username,
    ),
    TestSpec::ungated(
        "feide-10",
        "Principal name is set",
        "Checks that eduPersonPrincipalName is set",
        principal_name_set,
    ),
    TestSpec::ungated(
        "feide-11",
        "Principal name is correct",
        "Checks that eduPersonPrincipalName is the username followed by the principal-name suffix",
        principal_name_correct,
    ),
    TestSpec::ungated(
        "feide-12",
        "Mail equals UPN",
        "Checks that the FEIDE mail address equals the AD UPN",
        mail_matches_upn,
    ),
    TestSpec::ungated(
        "feide-13",
        "Linked to a school",
        "Checks that the account is linked to at least one school",
        org_unit,
    ),
    TestSpec::ungated("feide-14", "MFA is set up", "Checks that MFA is set up", mfa),
    TestSpec::ungated(
        "feide-15",
        "Organisation is correct",
        "Checks that the organisation is correct",
        organisation,
    ),
    TestSpec::ungated(
        "feide-16",
        "Has the correct affiliation",
        "Checks that the affiliation matches the expected classification",
        affiliation,
    ),
    TestSpec::ungated(
        "feide-17",
        "Has group entitlements",
        "Checks that group entitlements are set",
        entitlements,
    ),
];

// ============================================================================
// SECTION: Tests
// ============================================================================

/// feide-01: `enabled` is truthy.
fn account_enabled(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "enabled": ctx.snapshot.value_or_null("enabled") });
    let result = if ctx.snapshot.is_truthy("enabled") {
        CheckResult::success("Account is enabled")
    } else {
        CheckResult::error("Account is disabled")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-02: `lockedOut` is falsy.
fn account_unlocked(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "lockedOut": ctx.snapshot.value_or_null("lockedOut") });
    let result = if ctx.snapshot.is_truthy("lockedOut") {
        CheckResult::error("Account is locked out")
    } else {
        CheckResult::success("Account is not locked out")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-03: `norEduPersonNIN` holds a valid national identity number.
fn national_id(ctx: &CheckContext<'_>) -> CheckOutcome {
    shared::national_id(ctx.snapshot, "norEduPersonNIN")
}

/// feide-04: `norEduPersonNIN` equals AD `employeeNumber`.
fn national_id_matches_ad(ctx: &CheckContext<'_>) -> CheckOutcome {
    shared::equals_ad(ctx, "norEduPersonNIN", "employeeNumber", "feide", "National identity number")
}

/// feide-05: AD `pwdLastSet` reached `passwordLastSet`.
fn password_synchronised(ctx: &CheckContext<'_>) -> CheckOutcome {
    shared::password_propagated(ctx, "passwordLastSet", "feide")
}

/// feide-06: `name` is set.
fn username_set(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "name": ctx.snapshot.data_or_null("name") });
    let result = if ctx.snapshot.text("name").is_some() {
        CheckResult::success("Username is set")
    } else {
        CheckResult::error("Username is missing")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-07: `name` equals AD `samAccountName`.
fn username_matches_ad(ctx: &CheckContext<'_>) -> CheckOutcome {
    if let Err(result) = shared::ad_reference(ctx) {
        return Ok(result);
    }
    if ctx.snapshot.text("name").is_none() {
        return Ok(CheckResult::error("Username is missing").with_evidence(ctx.snapshot.to_evidence()));
    }
    shared::equals_ad(ctx, "name", "samAccountName", "feide", "Username")
}

/// feide-08: `uid` holds exactly one entry.
fn uid_set(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "uid": ctx.snapshot.data_or_null("uid") });
    if !ctx.snapshot.has("uid") {
        return Ok(CheckResult::error("UID is missing").with_evidence(evidence));
    }
    let uid = ctx.snapshot.require_array("uid")?;
    let result = if uid.len() == 1 {
        CheckResult::success("UID is set")
    } else {
        CheckResult::error("UID must hold exactly one username")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-09: the single `uid` entry equals `name`.
fn uid_matches_username(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({
        "uid": ctx.snapshot.data_or_null("uid"),
        "name": ctx.snapshot.data_or_null("name"),
    });
    if !ctx.snapshot.has("uid") {
        return Ok(CheckResult::error("UID is missing").with_evidence(evidence));
    }
    let uid = ctx.snapshot.require_array("uid")?;
    let name = ctx.snapshot.get("name");
    let result = match uid {
        [only] if Some(only) == name => CheckResult::success("UID equals the username"),
        [_] => CheckResult::error("UID does not equal the username"),
        _ => CheckResult::error("UID must hold exactly one username"),
    };
    Ok(result.with_evidence(evidence))
}

/// feide-10: `eduPersonPrincipalName` is set.
fn principal_name_set(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence =
        json!({ "eduPersonPrincipalName": ctx.snapshot.data_or_null("eduPersonPrincipalName") });
    let result = if ctx.snapshot.text("eduPersonPrincipalName").is_some() {
        CheckResult::success("Principal name is set")
    } else {
        CheckResult::error("Principal name is missing")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-11: `eduPersonPrincipalName` is `name` plus the configured suffix.
fn principal_name_correct(ctx: &CheckContext<'_>) -> CheckOutcome {
    let name = ctx.snapshot.text("name").unwrap_or_default();
    let expected = format!("{name}{}", ctx.settings.feide.principal_name_suffix);
    let actual = ctx.snapshot.text("eduPersonPrincipalName");
    let evidence = json!({
        "eduPersonPrincipalName": ctx.snapshot.value_or_null("eduPersonPrincipalName"),
        "expectedPersonPrincipalName": expected,
    });
    let result = if actual == Some(expected.as_str()) {
        CheckResult::success("Principal name is correct")
    } else {
        CheckResult::error("Principal name is wrong")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-12: `mail` equals AD `userPrincipalName`.
fn mail_matches_upn(ctx: &CheckContext<'_>) -> CheckOutcome {
    shared::equals_ad(ctx, "mail", shared::UPN_FIELD, "feide", "Mail address")
}

/// feide-13: `eduPersonOrgUnitDN` links the account to a school.
fn org_unit(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "eduPersonOrgUnitDN": ctx.snapshot.value_or_null("eduPersonOrgUnitDN") });
    if !ctx.snapshot.has("eduPersonOrgUnitDN") {
        return Ok(CheckResult::error("School link is missing").with_evidence(evidence));
    }
    let result = match ctx.snapshot.get("eduPersonOrgUnitDN") {
        Some(Value::Array(_) | Value::String(_)) => CheckResult::success("School link found"),
        _ => CheckResult::warning(
            "No school link found. This is correct for manually created FEIDE users and \
             administrative staff",
        ),
    };
    Ok(result.with_evidence(evidence))
}

/// feide-14: MFA methods in `norEduPersonAuthnMethod`.
fn mfa(ctx: &CheckContext<'_>) -> CheckOutcome {
    let methods = if ctx.snapshot.has("norEduPersonAuthnMethod") {
        ctx.snapshot.require_strings("norEduPersonAuthnMethod")?
    } else {
        Vec::new()
    };
    let kinds: Vec<&str> =
        methods.iter().map(|method| method.split(' ').next().unwrap_or_default()).collect();
    let evidence = json!({ "norEduPersonAuthnMethod": kinds });

    if methods.is_empty() {
        return Ok(match ctx.user.expected_type {
            ExpectedType::Employee => CheckResult::error("MFA is not set up").with_evidence(evidence),
            ExpectedType::Student => {
                CheckResult::success("MFA is not set up, and is not required for students")
            }
        });
    }
    let feide = &ctx.settings.feide;
    let sms = methods.iter().any(|method| method.contains(feide.mfa_sms.as_str()));
    let app = methods.iter().any(|method| method.contains(feide.mfa_ga.as_str()));
    let result = match (sms, app) {
        (true, true) => CheckResult::success("MFA for SMS and authenticator app is set up"),
        (true, false) => CheckResult::success("MFA for SMS is set up"),
        (false, true) => CheckResult::success("MFA for authenticator app is set up"),
        (false, false) => {
            CheckResult::warning("MFA is set up with a method other than SMS or authenticator app")
        }
    };
    Ok(result.with_evidence(evidence))
}

/// feide-15: `eduPersonOrgDN` equals the configured organisation.
fn organisation(ctx: &CheckContext<'_>) -> CheckOutcome {
    let expected = ctx.settings.feide.organization_dn.as_str();
    let evidence = json!({
        "eduPersonOrgDN": ctx.snapshot.data_or_null("eduPersonOrgDN"),
        "expectedOrgDN": expected,
    });
    let result = match ctx.snapshot.text("eduPersonOrgDN") {
        None => CheckResult::error("Organisation is missing"),
        Some(actual) if actual == expected => CheckResult::success("Organisation is correct"),
        Some(_) => CheckResult::error("Organisation is not correct"),
    };
    Ok(result.with_evidence(evidence))
}

/// feide-16: `eduPersonAffiliation` holds `member` and the expected type.
fn affiliation(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "eduPersonAffiliation": ctx.snapshot.data_or_null("eduPersonAffiliation") });
    if !ctx.snapshot.has("eduPersonAffiliation") {
        return Ok(CheckResult::error("Affiliation is missing").with_evidence(evidence));
    }
    let affiliations = affiliation_entries(ctx.snapshot.get("eduPersonAffiliation"));
    let holds = |label: &str| affiliations.iter().any(|entry| *entry == label);
    let expected = ctx.user.expected_type;
    let result = if holds("member") && holds(expected.as_str()) {
        CheckResult::success("Affiliation is correct")
    } else if holds("member") && holds(expected.other().as_str()) {
        CheckResult::warning(format!(
            "Affiliation is set as {} although this is {}",
            article(expected.other()),
            article(expected)
        ))
    } else {
        CheckResult::error("Affiliation is wrong")
    };
    Ok(result.with_evidence(evidence))
}

/// feide-17: `eduPersonEntitlement` has data.
fn entitlements(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "eduPersonEntitlement": ctx.snapshot.data_or_null("eduPersonEntitlement") });
    let result = if ctx.snapshot.has("eduPersonEntitlement") {
        CheckResult::success("Group entitlements are set")
    } else {
        CheckResult::error("Group entitlements are missing")
    };
    Ok(result.with_evidence(evidence))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Affiliation labels from an array of strings or a single string.
fn affiliation_entries(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(text)) => vec![text.as_str()],
        _ => Vec::new(),
    }
}

/// Classification with its indefinite article.
const fn article(expected_type: ExpectedType) -> &'static str {
    match expected_type {
        ExpectedType::Employee => "an employee",
        ExpectedType::Student => "a student",
    }
}
