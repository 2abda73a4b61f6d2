// crates/dust-config/tests/config.rs
// ============================================================================
// Module: Config Validation Tests
// Description: Validate dust.toml loading, defaults, and fail-closed checks.
// Purpose: Ensure invalid configuration is rejected before any audit runs.
// ============================================================================

//! Configuration loading and validation tests.

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

use std::fs;

use dust_config::ConfigError;
use dust_config::DustConfig;
use dust_config::LogSinkKind;
use dust_core::AuditSettings;
use dust_core::ExpectedType;

const FULL_CONFIG: &str = r#"
[propagation]
tolerance_seconds = 30

[domains]
employee = "@example.no"
student = "@skole.example.no"

[ad]
employee_enabled_ou = "OU=ACTIVE,DC=example,DC=no"
employee_disabled_ou = "OU=LEFT,DC=example,DC=no"
student_enabled_ou = "OU=ACTIVE,DC=skole,DC=no"
student_disabled_ou = "OU=LEFT,DC=skole,DC=no"

[feide]
principal_name_suffix = "@example.no"
organization_dn = "o=Example,dc=example,dc=no"

[[licenses]]
personType = "employee"

[[licenses.departments]]
department = ["IT"]
licenses = [{ sku = "sku-1", name = "Office" }]

[logging]
sink = "none"
"#;

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn empty_config_uses_reference_settings() {
    let config = DustConfig::from_toml("").unwrap();
    assert_eq!(config.settings(), AuditSettings::default());
    assert_eq!(config.logging.sink, LogSinkKind::Stderr);
}

#[test]
fn full_config_is_converted() {
    let config = DustConfig::from_toml(FULL_CONFIG).unwrap();
    let settings = config.settings();
    assert!((settings.propagation_tolerance_seconds - 30.0).abs() < f64::EPSILON);
    assert_eq!(settings.domains.for_type(ExpectedType::Student), "@skole.example.no");
    assert_eq!(settings.ad.employee_disabled_ou, "OU=LEFT,DC=example,DC=no");
    assert_eq!(settings.feide.mfa_sms, AuditSettings::default().feide.mfa_sms);
    assert_eq!(settings.licenses.len(), 1);
    assert!(settings.license_table(ExpectedType::Student).is_none());
    assert_eq!(config.logging.sink, LogSinkKind::None);
}

// ============================================================================
// SECTION: Rejections
// ============================================================================

fn invalid(content: &str) -> String {
    match DustConfig::from_toml(content) {
        Err(ConfigError::Invalid(message)) => message,
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(matches!(DustConfig::from_toml("[server]\nport = 1"), Err(ConfigError::Parse(_))));
    assert!(matches!(
        DustConfig::from_toml("[domains]\nstaff = \"@x.no\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn tolerance_range_is_enforced() {
    assert!(invalid("[propagation]\ntolerance_seconds = 0").contains("tolerance_seconds"));
    assert!(invalid("[propagation]\ntolerance_seconds = 3601").contains("tolerance_seconds"));
    assert!(DustConfig::from_toml("[propagation]\ntolerance_seconds = 3600").is_ok());
}

#[test]
fn empty_values_are_rejected() {
    assert_eq!(invalid("[domains]\nemployee = \"  \""), "domains.employee must be non-empty");
    assert_eq!(invalid("[feide]\nmfa_ga = \"\""), "feide.mfa_ga must be non-empty");
}

#[test]
fn nested_ou_paths_are_rejected() {
    let message = invalid(
        "[ad]\nemployee_enabled_ou = \"OU=USERS,DC=x\"\nemployee_disabled_ou = \"OU=OLD,OU=USERS,DC=x\"",
    );
    assert!(message.contains("employee"));
}

#[test]
fn license_tables_are_checked() {
    let empty_sku = r#"
[[licenses]]
personType = "student"
[[licenses.departments]]
department = ["ELEV"]
licenses = [{ sku = " ", name = "Blank" }]
"#;
    assert!(invalid(empty_sku).contains("empty sku"));

    let duplicate = r#"
[[licenses]]
personType = "student"
[[licenses.departments]]
department = ["ELEV"]
licenses = []
[[licenses]]
personType = "student"
[[licenses.departments]]
department = ["ELEV"]
licenses = []
"#;
    assert!(invalid(duplicate).contains("duplicate"));
}

#[test]
fn file_sink_requires_a_path() {
    assert!(invalid("[logging]\nsink = \"file\"").contains("logging.path"));
    assert!(invalid("[logging]\nsink = \"stderr\"\npath = \"x.log\"").contains("logging.path"));
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_reads_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dust.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = DustConfig::load(Some(&path)).unwrap();
    assert_eq!(config.domains.employee, "@example.no");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(DustConfig::load(Some(&path)), Err(ConfigError::Io(_))));
    assert!(matches!(DustConfig::load_or_default(Some(&path)), Err(ConfigError::Io(_))));
}

#[test]
fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dust.toml");
    fs::write(&path, format!("# {}\n", "x".repeat(300 * 1024))).unwrap();
    assert!(matches!(DustConfig::load(Some(&path)), Err(ConfigError::Invalid(_))));
}

#[test]
fn overlong_path_component_is_rejected() {
    let path = std::path::PathBuf::from("x".repeat(300));
    assert!(matches!(DustConfig::load(Some(&path)), Err(ConfigError::Invalid(_))));
}

#[test]
fn file_sink_opens_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("audit.log");
    let content = format!("[logging]\nsink = \"file\"\npath = {:?}\n", log_path.to_string_lossy());
    let config = DustConfig::from_toml(&content).unwrap();
    assert!(config.audit_log().is_ok());
    assert!(log_path.exists());
}
