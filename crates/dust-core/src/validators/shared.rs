// crates/dust-core/src/validators/shared.rs
// ============================================================================
// Module: DUST Shared Rules
// Description: Rule fragments reused by more than one catalogue.
// Purpose: Keep principal-name, identity-number, and cross-system checks
//          identical across directories.
// Dependencies: crate::{core, runtime}, serde_json
// ============================================================================

//! ## Overview
//! Several directories expose the same attributes under the same names
//! (`userPrincipalName`, `mail`) or are compared against the same Active
//! Directory reference. The helpers here implement those rules once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use crate::core::CheckResult;
use crate::core::ExpectedType;
use crate::core::Snapshot;
use crate::core::SystemName;
use crate::runtime::fnr::validate_national_id;
use crate::runtime::registration::CheckContext;
use crate::runtime::registration::CheckOutcome;
use crate::runtime::resolver::ActiveRecord;
use crate::runtime::resolver::active_record;
use crate::runtime::resolver::time_delta;

// ============================================================================
// SECTION: Principal Names
// ============================================================================

/// Field holding the user principal name.
pub const UPN_FIELD: &str = "userPrincipalName";

/// `userPrincipalName` equals `mail`, ignoring case.
pub fn upn_equals_mail(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({
        "mail": ctx.snapshot.data_or_null("mail"),
        "userPrincipalName": ctx.snapshot.data_or_null(UPN_FIELD),
    });
    let Some(upn) = ctx.snapshot.text(UPN_FIELD) else {
        return Ok(CheckResult::error("UPN is missing").with_evidence(evidence));
    };
    let matches = ctx.snapshot.text("mail").is_some_and(|mail| mail.to_lowercase() == upn.to_lowercase());
    let result = if matches {
        CheckResult::success("UPN equals the mail address")
    } else {
        CheckResult::error("UPN does not equal the mail address")
    };
    Ok(result.with_evidence(evidence))
}

/// `userPrincipalName` carries the domain of the expected classification.
pub fn upn_domain(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "userPrincipalName": ctx.snapshot.data_or_null(UPN_FIELD) });
    let Some(upn) = ctx.snapshot.text(UPN_FIELD) else {
        return Ok(CheckResult::error("UPN is missing").with_evidence(evidence));
    };
    let domain = ctx.settings.domains.for_type(ctx.user.expected_type);
    let result = if upn.contains(domain) {
        CheckResult::success("UPN is correct")
    } else {
        CheckResult::error(format!("UPN is not correct (expected {domain})"))
    };
    Ok(result.with_evidence(evidence))
}

// ============================================================================
// SECTION: Identity Numbers
// ============================================================================

/// Validates the national identity number held in `field`.
pub fn national_id(snapshot: &Snapshot, field: &str) -> CheckOutcome {
    let Some(number) = snapshot.text(field) else {
        return Ok(CheckResult::error("National identity number is missing")
            .with_evidence(json!({ field: snapshot.data_or_null(field) })));
    };
    let check = validate_national_id(number);
    let result = match (check.valid, check.kind, check.error.as_deref()) {
        (true, Some(kind), _) => CheckResult::success(format!("Has valid {kind}")),
        (_, _, Some(error)) => CheckResult::error(error),
        _ => CheckResult::error("National identity number is not valid"),
    };
    Ok(result.with_evidence(json!({ field: number, "fnr": check })))
}

// ============================================================================
// SECTION: Cross-System References
// ============================================================================

/// Returns the AD snapshot for a cross-system comparison.
///
/// # Errors
///
/// Returns the short-circuit result when no bundle was supplied (`no-data`)
/// or when the bundle has no AD data (`error`).
pub fn ad_reference<'a>(ctx: &CheckContext<'a>) -> Result<&'a Snapshot, CheckResult> {
    let Some(bundle) = ctx.bundle else {
        return Err(CheckResult::no_data());
    };
    bundle
        .with_data(SystemName::Ad)
        .ok_or_else(|| CheckResult::error("Missing AD data").with_evidence(bundle.to_evidence()))
}

/// Compares AD `pwdLastSet` with `field` in the snapshot under test.
pub fn password_propagated(ctx: &CheckContext<'_>, field: &str, target: &str) -> CheckOutcome {
    let ad = match ad_reference(ctx) {
        Ok(ad) => ad,
        Err(result) => return Ok(result),
    };
    let delta = time_delta(
        ad.get("pwdLastSet"),
        ctx.snapshot.get(field),
        ctx.settings.propagation_tolerance_seconds,
    );
    let evidence = json!({
        target: { field: ctx.snapshot.value_or_null(field) },
        "ad": { "pwdLastSet": ad.value_or_null("pwdLastSet") },
        "seconds": delta.seconds,
    });
    let result = if delta.result {
        CheckResult::success(format!("Password synchronised to {}", display_name(target)))
    } else {
        CheckResult::error("Password not synchronised")
    };
    Ok(result.with_evidence(evidence))
}

/// Compares `field` in the snapshot under test with `ad_field` in AD.
pub fn equals_ad(
    ctx: &CheckContext<'_>,
    field: &str,
    ad_field: &str,
    target: &str,
    label: &str,
) -> CheckOutcome {
    let ad = match ad_reference(ctx) {
        Ok(ad) => ad,
        Err(result) => return Ok(result),
    };
    let own = ctx.snapshot.value_or_null(field);
    let reference = ad.value_or_null(ad_field);
    let equal = own == reference && !own.is_null();
    let evidence = json!({
        target: { field: own },
        "ad": { ad_field: reference },
    });
    let result = if equal {
        CheckResult::success(format!("{label} matches AD"))
    } else {
        CheckResult::error(format!("{label} differs from AD"))
    };
    Ok(result.with_evidence(evidence))
}

/// Returns the roster system that sources a classification.
pub const fn roster_for(expected_type: ExpectedType) -> SystemName {
    match expected_type {
        ExpectedType::Employee => SystemName::Visma,
        ExpectedType::Student => SystemName::Pifu,
    }
}

/// Returns the active roster record for the user, when the roster is present.
pub fn roster_record(ctx: &CheckContext<'_>) -> Option<(SystemName, ActiveRecord)> {
    let roster = roster_for(ctx.user.expected_type);
    let snapshot = ctx.bundle?.get(roster)?;
    Some((roster, active_record(roster, snapshot)))
}

/// Returns the display label used for a system key in messages.
fn display_name(target: &str) -> &str {
    match target {
        "aad" => "Azure AD",
        "feide" => "FEIDE",
        other => other,
    }
}
