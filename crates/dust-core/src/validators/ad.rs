// crates/dust-core/src/validators/ad.rs
// ============================================================================
// Module: DUST Active Directory Catalogue
// Description: Rule table for on-premises Active Directory accounts.
// Purpose: Audit account state, naming, placement, and identity attributes.
// Dependencies: crate::{core, runtime, validators::shared}, regex, serde_json
// ============================================================================

//! ## Overview
//! Fourteen tests, `ad-01` through `ad-14`. The catalogue is gated on the
//! snapshot carrying data: when it is empty, `ad-01` reports the gap and every
//! other test reports `no-data` without running.
//!
//! Account activity is cross-referenced with the HR roster (`visma`) for
//! employees and the student roster (`pifu`) for students.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::core::CheckFault;
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

/// Active Directory test catalogue.
pub static CATALOGUE: Catalogue = Catalogue {
    system: SystemName::Ad,
    gate: DataGate::SnapshotHasData,
    tests: &TESTS,
};

/// Ordered AD tests.
const TESTS: [TestSpec; 14] = [
    TestSpec::ungated("ad-01", "Has data", "Checks that the directory returned data", has_data),
    TestSpec::gated(
        "ad-02",
        "Account is enabled",
        "Checks that the account is enabled in AD",
        account_enabled,
    ),
    TestSpec::gated(
        "ad-03",
        "Account is unlocked",
        "Checks that the account is not locked out in AD",
        account_unlocked,
    ),
    TestSpec::gated(
        "ad-04",
        "Username follows the algorithm",
        "Checks that the username matches the given name and birth date",
        username_algorithm,
    ),
    TestSpec::gated(
        "ad-05",
        "UPN equals mail",
        "Checks that the UPN equals the mail address in AD",
        shared::upn_equals_mail,
    ),
    TestSpec::gated(
        "ad-06",
        "UPN is correct",
        "Checks that the UPN uses the domain of the expected classification",
        shared::upn_domain,
    ),
    TestSpec::gated(
        "ad-07",
        "OU is correct",
        "Checks that the account is placed in the correct OU",
        ou_placement,
    ),
    TestSpec::gated(
        "ad-08",
        "Has valid national identity number",
        "Checks that employeeNumber holds a valid national identity number",
        national_id,
    ),
    TestSpec::gated(
        "ad-09",
        "extensionAttribute6 is set",
        "Checks that extensionAttribute6 is set for employees",
        extension_attribute6,
    ),
    TestSpec::gated(
        "ad-10",
        "Has one primary mail address",
        "Checks the number of primary addresses in proxyAddresses",
        primary_addresses,
    ),
    TestSpec::gated(
        "ad-11",
        "State is set for employee",
        "Checks that the license field is set for employees",
        employee_state,
    ),
    TestSpec::gated(
        "ad-12",
        "Name is in capital letters",
        "Checks whether the display name is written in capital letters",
        capitalised_name,
    ),
    TestSpec::gated(
        "ad-13",
        "Given name has a period",
        "Checks whether the given name contains a period",
        given_name_period,
    ),
    TestSpec::gated(
        "ad-14",
        "Correct company",
        "Checks that students carry a school name in company",
        company,
    ),
];

// ============================================================================
// SECTION: Constants
// ============================================================================

/// School names accepted in a student's `company` attribute.
const SCHOOL_COMPANY_PATTERN: &str = concat!(
    r"([A-Za-z0-9_].+ [vV]id.+ [sS]k.+)",
    r"|([Ff]agskolen [Vv]estfold og [Tt]elemark)",
    r"|([Kk]ompetansebyggeren)"
);

/// Compiled school-name pattern.
static SCHOOL_COMPANY: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(SCHOOL_COMPANY_PATTERN));

/// Prefix marking the primary address in `proxyAddresses`.
const PRIMARY_ADDRESS_PREFIX: &str = "SMTP:";

// ============================================================================
// SECTION: Tests
// ============================================================================

/// ad-01: the snapshot carries data.
fn has_data(ctx: &CheckContext<'_>) -> CheckOutcome {
    Ok(if ctx.data_present {
        CheckResult::success("Has data")
    } else {
        CheckResult::error("Missing data")
    })
}

/// ad-02: the account is enabled, cross-checked with the roster.
fn account_enabled(ctx: &CheckContext<'_>) -> CheckOutcome {
    let enabled = ctx.snapshot.is_truthy("enabled");
    let mut evidence = Map::new();
    evidence.insert("enabled".to_string(), ctx.snapshot.value_or_null("enabled"));

    let Some((roster, record)) = shared::roster_record(ctx) else {
        let result = if enabled {
            CheckResult::success("Account is enabled")
        } else {
            CheckResult::error("Account is disabled")
        };
        return Ok(result.with_evidence(Value::Object(evidence)));
    };

    let person = ctx.user.expected_type.as_str();
    let result = match (enabled, record.active) {
        (true, true) => CheckResult::success("Account is enabled"),
        (true, false) => {
            CheckResult::error(format!("Account is enabled although the {person} has left"))
        }
        (false, true) => {
            CheckResult::warning(format!("Account is disabled. The {person} must activate the account"))
        }
        (false, false) => CheckResult::warning("Account is disabled"),
    };
    evidence.insert(roster.as_str().to_string(), json!(record));
    Ok(result.with_evidence(Value::Object(evidence)))
}

/// ad-03: the account is not locked out.
fn account_unlocked(ctx: &CheckContext<'_>) -> CheckOutcome {
    let evidence = json!({ "lockedOut": ctx.snapshot.value_or_null("lockedOut") });
    let result = if ctx.snapshot.is_truthy("lockedOut") {
        CheckResult::error("Account is locked out")
    } else {
        CheckResult::success("Account is not locked out")
    };
    Ok(result.with_evidence(evidence))
}

/// ad-04: username is the first three letters of the given name followed by
/// the first four digits of the identity number.
fn username_algorithm(ctx: &CheckContext<'_>) -> CheckOutcome {
    let Some(sam) = ctx.snapshot.text("samAccountName") else {
        return Ok(
            CheckResult::error("Username is missing").with_evidence(ctx.snapshot.to_evidence())
        );
    };
    let given_name = ctx.snapshot.require_text("givenName")?;
    let employee_number = ctx.snapshot.require_text("employeeNumber")?;

    let sam_name = char_range(sam, 0, 3).to_lowercase();
    let transliterated =
        given_name.to_lowercase().replacen('å', "aa", 1).replacen('ø', "o", 1).replacen('æ', "e", 1);
    let first_name = char_range(&transliterated, 0, 3);
    let sam_date = char_range(sam, 3, 7);
    let employee_date = char_range(employee_number, 0, 4);

    Ok(if sam_name == first_name && sam_date == employee_date {
        CheckResult::success("Username matches the name")
            .with_evidence(json!({ "samAccountName": sam }))
    } else {
        CheckResult::error("Username does not match the name").with_evidence(json!({
            "samAccountName": sam,
            "firstName": given_name,
            "employeeNumber": employee_number,
        }))
    })
}

/// ad-07: the account is placed in the OU matching its state.
///
/// Employee placement depends on HR activity, so it waits for the roster.
fn ou_placement(ctx: &CheckContext<'_>) -> CheckOutcome {
    let dn = ctx.snapshot.require_text("distinguishedName")?;
    let enabled = ctx.snapshot.is_truthy("enabled");
    let current = dn.split_once(',').map_or(dn, |(_, parent)| parent);
    let ou = &ctx.settings.ad;
    let roster = shared::roster_record(ctx);

    let (expected, correct) = match ctx.user.expected_type {
        ExpectedType::Employee => {
            let Some((_, record)) = roster.as_ref() else {
                return Ok(CheckResult::no_data().with_evidence(json!({
                    "distinguishedName": dn,
                    "enabled": ctx.snapshot.value_or_null("enabled"),
                })));
            };
            match (enabled, record.active) {
                (_, true) => (&ou.employee_enabled_ou, dn.contains(ou.employee_enabled_ou.as_str())),
                (true, false) => {
                    (&ou.employee_disabled_ou, !dn.contains(ou.employee_enabled_ou.as_str()))
                }
                (false, false) => {
                    (&ou.employee_disabled_ou, dn.contains(ou.employee_disabled_ou.as_str()))
                }
            }
        }
        ExpectedType::Student => {
            if enabled {
                (&ou.student_enabled_ou, dn.contains(ou.student_enabled_ou.as_str()))
            } else {
                (&ou.student_disabled_ou, dn.contains(ou.student_disabled_ou.as_str()))
            }
        }
    };

    let mut evidence = Map::new();
    evidence.insert("distinguishedName".to_string(), json!(dn));
    evidence.insert("ou".to_string(), json!({ "expected": expected, "current": current }));
    evidence.insert("enabled".to_string(), ctx.snapshot.value_or_null("enabled"));
    if let Some((system, record)) = roster {
        evidence.insert(system.as_str().to_string(), json!(record));
    }
    let result = if correct {
        CheckResult::success("OU is correct")
    } else {
        CheckResult::error("OU is not correct")
    };
    Ok(result.with_evidence(Value::Object(evidence)))
}

/// ad-08: `employeeNumber` holds a valid national identity number.
fn national_id(ctx: &CheckContext<'_>) -> CheckOutcome {
    shared::national_id(ctx.snapshot, "employeeNumber")
}

/// ad-09: `extensionAttribute6` is required for employees only.
fn extension_attribute6(ctx: &CheckContext<'_>) -> CheckOutcome {
    let set = ctx.snapshot.has("extensionAttribute6");
    let evidence = json!({ "extensionAttribute6": ctx.snapshot.value_or_null("extensionAttribute6") });
    let result = match (ctx.user.expected_type, set) {
        (ExpectedType::Employee, true) => CheckResult::success("extensionAttribute6 is set"),
        (ExpectedType::Employee, false) => CheckResult::error("extensionAttribute6 is missing"),
        (ExpectedType::Student, true) => {
            CheckResult::warning("extensionAttribute6 is set on a student. Students do not need it")
        }
        (ExpectedType::Student, false) => {
            CheckResult::success("extensionAttribute6 is not set, which is expected for a student")
        }
    };
    Ok(result.with_evidence(evidence))
}

/// ad-10: number of `SMTP:` primary addresses by classification.
fn primary_addresses(ctx: &CheckContext<'_>) -> CheckOutcome {
    let addresses = if ctx.snapshot.has("proxyAddresses") {
        ctx.snapshot.require_strings("proxyAddresses")?
    } else {
        Vec::new()
    };
    let primary: Vec<&str> =
        addresses.iter().copied().filter(|address| address.starts_with(PRIMARY_ADDRESS_PREFIX)).collect();
    let count = primary.len();
    let evidence = json!({
        "proxyAddresses": ctx.snapshot.value_or_null("proxyAddresses"),
        "primary": primary,
    });
    let result = match (ctx.user.expected_type, count) {
        (ExpectedType::Employee, 1) => CheckResult::success("Has exactly 1 primary address"),
        (ExpectedType::Student, 0) => {
            let evidence = json!({
                "proxyAddresses": ctx.snapshot.value_or_null("proxyAddresses"),
                "primary": primary,
                "mail": ctx.snapshot.value_or_null("mail"),
            });
            return Ok(CheckResult::success(
                "Has no primary address, which is correct for a student. The mail attribute applies",
            )
            .with_evidence(evidence));
        }
        (ExpectedType::Student, 1) => {
            CheckResult::success("Has 1 primary address, which is also correct for a student")
        }
        (_, count) => CheckResult::error(format!("Has {count} primary addresses")),
    };
    Ok(result.with_evidence(evidence))
}

/// ad-11: employees carry the license field `state`.
fn employee_state(ctx: &CheckContext<'_>) -> CheckOutcome {
    if ctx.user.expected_type == ExpectedType::Student {
        return Ok(CheckResult::no_data());
    }
    Ok(if ctx.snapshot.has("state") {
        CheckResult::success("License field is set")
            .with_evidence(json!({ "state": ctx.snapshot.value_or_null("state") }))
    } else {
        CheckResult::error("License field is missing").with_evidence(ctx.snapshot.to_evidence())
    })
}

/// ad-12: display names written entirely in capitals are flagged.
fn capitalised_name(ctx: &CheckContext<'_>) -> CheckOutcome {
    let display_name = ctx.snapshot.require_text("displayName")?;
    Ok(if display_name == display_name.to_uppercase() {
        CheckResult::warning("Name is written in capital letters").with_evidence(name_evidence(ctx))
    } else {
        CheckResult::no_data()
    })
}

/// ad-13: given names containing a period are flagged.
fn given_name_period(ctx: &CheckContext<'_>) -> CheckOutcome {
    let given_name = ctx.snapshot.require_text("givenName")?;
    Ok(if given_name.contains('.') {
        CheckResult::warning("Name contains a period").with_evidence(name_evidence(ctx))
    } else {
        CheckResult::no_data()
    })
}

/// ad-14: students carry a school name in `company`.
fn company(ctx: &CheckContext<'_>) -> CheckOutcome {
    if ctx.user.expected_type == ExpectedType::Employee {
        return Ok(CheckResult::no_data());
    }
    let evidence = json!({ "company": ctx.user.company });
    let Some(company) = ctx.user.company.as_deref().filter(|company| !company.is_empty()) else {
        return Ok(CheckResult::error("Company field is missing").with_evidence(evidence));
    };
    let pattern = SCHOOL_COMPANY
        .as_ref()
        .map_err(|err| CheckFault::Other(format!("invalid school pattern: {err}")))?;
    let result = if pattern.is_match(company) {
        CheckResult::success("User has the correct company")
    } else {
        CheckResult::error("Company field does not hold a school name")
    };
    Ok(result.with_evidence(evidence))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the characters in `[start, end)`, clamped to the string length.
fn char_range(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Name attributes used as evidence by the name heuristics.
fn name_evidence(ctx: &CheckContext<'_>) -> Value {
    json!({
        "displayName": ctx.snapshot.value_or_null("displayName"),
        "givenName": ctx.snapshot.value_or_null("givenName"),
        "surName": ctx.snapshot.value_or_null("sn"),
    })
}
