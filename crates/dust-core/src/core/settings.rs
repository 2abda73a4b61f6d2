// crates/dust-core/src/core/settings.rs
// ============================================================================
// Module: DUST Rule Settings
// Description: Deployment constants consumed by the validator rule tables.
// Purpose: Keep OU paths, domains, FEIDE identifiers, license tables, and the
//          propagation tolerance out of the rule code.
// Dependencies: crate::core::user, serde
// ============================================================================

//! ## Overview
//! [`AuditSettings`] collects every deployment-specific constant the rule
//! tables compare against. `Default` carries the reference values; the
//! `dust-config` crate overrides them from `dust.toml`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::user::ExpectedType;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reference propagation tolerance between directories, in seconds.
pub const DEFAULT_PROPAGATION_TOLERANCE_SECONDS: f64 = 15.0;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Constants consumed by the validator rule tables.
///
/// # Invariants
/// - `propagation_tolerance_seconds` is finite and positive (enforced by the
///   config loader, not by this type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Maximum accepted password propagation delay, in seconds (inclusive).
    pub propagation_tolerance_seconds: f64,
    /// Principal-name domains per classification.
    pub domains: UpnDomains,
    /// Active Directory placement rules.
    pub ad: AdSettings,
    /// FEIDE identifiers.
    pub feide: FeideSettings,
    /// Expected license tables per classification.
    pub licenses: Vec<LicenseTable>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            propagation_tolerance_seconds: DEFAULT_PROPAGATION_TOLERANCE_SECONDS,
            domains: UpnDomains::default(),
            ad: AdSettings::default(),
            feide: FeideSettings::default(),
            licenses: default_license_tables(),
        }
    }
}

impl AuditSettings {
    /// Returns the license table for a classification.
    #[must_use]
    pub fn license_table(&self, person_type: ExpectedType) -> Option<&LicenseTable> {
        self.licenses.iter().find(|table| table.person_type == person_type)
    }
}

/// Principal-name domain markers per classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpnDomains {
    /// Marker an employee UPN must contain.
    pub employee: String,
    /// Marker a student UPN must contain.
    pub student: String,
}

impl UpnDomains {
    /// Returns the marker for a classification.
    #[must_use]
    pub fn for_type(&self, expected_type: ExpectedType) -> &str {
        match expected_type {
            ExpectedType::Employee => &self.employee,
            ExpectedType::Student => &self.student,
        }
    }
}

impl Default for UpnDomains {
    fn default() -> Self {
        Self {
            employee: "@vtfk.no".to_string(),
            student: "@skole.vtfk.no".to_string(),
        }
    }
}

/// Organisational unit paths for Active Directory placement.
///
/// # Invariants
/// - Enabled and disabled paths must not be substrings of each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdSettings {
    /// OU for active employees.
    pub employee_enabled_ou: String,
    /// OU for employees who have left.
    pub employee_disabled_ou: String,
    /// OU for active students.
    pub student_enabled_ou: String,
    /// OU for students who have left.
    pub student_disabled_ou: String,
}

impl Default for AdSettings {
    fn default() -> Self {
        Self {
            employee_enabled_ou: "OU=AUTO USERS,OU=USERS,OU=VTFK,DC=login,DC=top,DC=no".to_string(),
            employee_disabled_ou: "OU=AUTO DISABLED USERS,OU=USERS,OU=VTFK,DC=login,DC=top,DC=no"
                .to_string(),
            student_enabled_ou: "OU=AUTO USERS,OU=USERS,OU=VTFK,DC=skole,DC=top,DC=no".to_string(),
            student_disabled_ou: "OU=AUTO DISABLED USERS,OU=USERS,OU=VTFK,DC=skole,DC=top,DC=no"
                .to_string(),
        }
    }
}

/// FEIDE identifiers compared by the FEIDE catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeideSettings {
    /// Suffix appended to the username to form the principal name.
    pub principal_name_suffix: String,
    /// Authentication method marker for SMS one-time codes.
    pub mfa_sms: String,
    /// Authentication method marker for authenticator apps.
    pub mfa_ga: String,
    /// Expected organisation distinguished name.
    pub organization_dn: String,
}

impl Default for FeideSettings {
    fn default() -> Self {
        Self {
            principal_name_suffix: "@vtfk.no".to_string(),
            mfa_sms: "urn:mace:feide.no:auth:method:sms".to_string(),
            mfa_ga: "urn:mace:feide.no:auth:method:ga".to_string(),
            organization_dn: "o=Vestfold og Telemark fylkeskommune,dc=vtfk,dc=no".to_string(),
        }
    }
}

// ============================================================================
// SECTION: License Tables
// ============================================================================

/// Expected license table for one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseTable {
    /// Classification the table applies to.
    pub person_type: ExpectedType,
    /// Department groups with their expected licenses.
    pub departments: Vec<LicenseDepartment>,
}

/// Department group and the licenses its members must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseDepartment {
    /// Department code fragments matched against `departmentShort`.
    pub department: Vec<String>,
    /// Licenses expected for the group.
    pub licenses: Vec<License>,
}

impl LicenseDepartment {
    /// Returns true when any code fragment occurs in `department_short`.
    #[must_use]
    pub fn matches(&self, department_short: &str) -> bool {
        self.department.iter().any(|code| department_short.contains(code.as_str()))
    }
}

/// Single expected license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct License {
    /// SKU identifier compared against `assignedLicenses[].skuId`.
    pub sku: String,
    /// Display name.
    pub name: String,
}

/// Builds a license entry.
fn license(sku: &str, name: &str) -> License {
    License {
        sku: sku.to_string(),
        name: name.to_string(),
    }
}

/// Reference license tables.
fn default_license_tables() -> Vec<LicenseTable> {
    let faculty = license("4b590615-0888-425a-a965-b3bf7789848d", "Microsoft 365 A3 for faculty");
    let student = license("18250162-5d87-4436-a834-d795c15c80f3", "Microsoft 365 A3 for students");
    let printing = license("f30db892-07e9-47e9-837c-80727f46fd3d", "Power Automate Free");
    vec![
        LicenseTable {
            person_type: ExpectedType::Employee,
            departments: vec![
                LicenseDepartment {
                    department: vec!["BDK".to_string(), "OPT".to_string(), "SMM".to_string()],
                    licenses: vec![faculty.clone(), printing],
                },
                LicenseDepartment {
                    department: vec!["VGS".to_string(), "SKOLE".to_string()],
                    licenses: vec![faculty],
                },
            ],
        },
        LicenseTable {
            person_type: ExpectedType::Student,
            departments: vec![LicenseDepartment {
                department: vec!["ELEV".to_string()],
                licenses: vec![student],
            }],
        },
    ]
}
