// crates/dust-core/src/validators/aad.rs
// ============================================================================
// Module: DUST Azure AD Catalogue
// Description: Rule table for cloud directory accounts.
// Purpose: Audit account state, synchronisation, and license assignment.
// Dependencies: crate::{core, runtime, validators::shared}, serde_json
// ============================================================================

//! ## Overview
//! Seven tests, `aad-01` through `aad-07`. The catalogue is ungated; each
//! test handles missing attributes itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use crate::core::CheckResult;
use crate::core::ExpectedType;
use crate::core::LicenseDepartment;
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

/// Azure AD test catalogue.
pub static CATALOGUE: Catalogue = Catalogue {
    system: SystemName::Aad,
    gate: DataGate::None,
    tests: &TESTS,
};

/// Ordered Azure AD tests.
const TESTS: [TestSpec; 7] = [
    TestSpec::ungated(
        "aad-01",
        "Account is enabled",
        "Checks that the account is enabled in Azure AD",
        account_enabled,
    ),
    TestSpec::ungated(
        "aad-02",
        "UPN equals mail",
        "Checks that the UPN equals the mail address in Azure AD",
        shared::upn_equals_mail,
    ),
    TestSpec::ungated(
        "aad-03",
        "UPN is correct",
        "Checks that the UPN uses the domain of the expected classification",
        shared::upn_domain,
    ),
    TestSpec::ungated(
        "aad-04",
        "Password synchronised to Azure AD",
        "Checks that the AD password reached Azure AD within the propagation tolerance",
        password_synchronised,
    ),
    TestSpec::ungated(
        "aad-05",
        "Synchronised from on-premises AD",
        "Checks that synchronisation from on-premises AD is enabled",
        sync_enabled,
    ),
    TestSpec::ungated(
        "aad-06",
        "No synchronisation errors",
        "Checks that synchronisation from on-premises AD reports no errors",
        provisioning_errors,
    ),
    TestSpec::ungated(
        "aad-07",
        "Has the correct licenses",
        "Checks that the expected licenses are assigned",
        licenses,
    ),
];

// ============================================================================
// SECTION: Tests
// ============================================================================

/// aad-01: `accountEnabled` is truthy.
fn account_enabled(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "accountEnabled": ctx.snapshot.value_or_null("accountEnabled") });
    let result = if ctx.snapshot.is_truthy("accountEnabled") {
        CheckResult::success("Account is enabled")
    } else {
        CheckResult::error("Account is disabled")
    };
    Ok(result.with_evidence(evidence))
}

/// aad-04: AD `pwdLastSet` reached `lastPasswordChangeDateTime`.
fn password_synchronised(ctx: &CheckContext<'_>) -> CheckOutcome {
    shared::password_propagated(ctx, "lastPasswordChangeDateTime", "aad")
}

/// aad-05: `onPremisesSyncEnabled` is set; cloud-only accounts warn.
fn sync_enabled(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "onPremisesSyncEnabled": ctx.snapshot.data_or_null("onPremisesSyncEnabled") });
    if !ctx.snapshot.has("onPremisesSyncEnabled") {
        return Ok(CheckResult::error("onPremisesSyncEnabled is missing").with_evidence(evidence));
    }
    let result = if ctx.snapshot.is_truthy("onPremisesSyncEnabled") {
        CheckResult::success("Synchronisation from on-premises AD is enabled")
    } else {
        CheckResult::warning(
            "Synchronisation from on-premises AD is not enabled. This is correct if the user only \
             exists in Azure AD",
        )
    };
    Ok(result.with_evidence(evidence))
}

/// aad-06: `onPremisesProvisioningErrors` is empty.
fn provisioning_errors(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({
        "onPremisesProvisioningErrors": ctx.snapshot.data_or_null("onPremisesProvisioningErrors"),
    });
    let result = if ctx.snapshot.has("onPremisesProvisioningErrors") {
        CheckResult::error("Synchronisation errors found")
    } else {
        CheckResult::success("No synchronisation errors found")
    };
    Ok(result.with_evidence(evidence))
}

/// aad-07: every license expected for the user's department is assigned.
fn licenses(ctx: &CheckContext<'_>) -> CheckOutcome {
    if !ctx.snapshot.has("assignedLicenses") {
        return Ok(CheckResult::error("Has no Azure AD licenses")
            .with_evidence(ctx.snapshot.value_or_null("assignedLicenses")));
    }
    let Some(department_short) = ctx.user.department_short.as_deref().filter(|dep| !dep.is_empty())
    else {
        return Ok(CheckResult::warning("Not enough information to run the test")
            .with_evidence(json!(ctx.user)));
    };
    let expected_type = ctx.user.expected_type;
    let Some(table) = ctx.settings.license_table(expected_type) else {
        return Ok(CheckResult::error(format!("No license table for '{expected_type}'")));
    };

    let department: Option<&LicenseDepartment> = match expected_type {
        ExpectedType::Employee => table.departments.iter().find(|group| group.matches(department_short)),
        ExpectedType::Student => table.departments.first(),
    };
    let Some(department) = department else {
        return Ok(CheckResult::error(format!("No license table for '{department_short}'"))
            .with_evidence(json!(table)));
    };

    let assigned = ctx.snapshot.require_array("assignedLicenses")?;
    let missing: Vec<_> = department
        .licenses
        .iter()
        .filter(|license| {
            !assigned
                .iter()
                .any(|item| item.get("skuId").and_then(|sku| sku.as_str()) == Some(license.sku.as_str()))
        })
        .collect();

    let evidence = json!({
        "licenseDepartment": department.department,
        "assignedLicenses": assigned,
        "expectedLicenses": department.licenses,
        "missingLicenses": missing,
    });
    let result = if missing.is_empty() {
        CheckResult::success("Licenses are correct")
    } else {
        CheckResult::error(format!("Missing {} license(s)", missing.len()))
    };
    Ok(result.with_evidence(evidence))
}
