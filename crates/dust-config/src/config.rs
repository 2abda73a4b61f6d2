// crates/dust-config/src/config.rs
// ============================================================================
// Module: DUST Configuration
// Description: Configuration loading and validation for the audit engine.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dust-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and defaults to the reference constants carried
//! by [`AuditSettings::default`]. Unknown keys and invalid values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use dust_core::AdSettings;
use dust_core::AuditLogSink;
use dust_core::AuditSettings;
use dust_core::DEFAULT_PROPAGATION_TOLERANCE_SECONDS;
use dust_core::FeideSettings;
use dust_core::FileAuditLog;
use dust_core::LicenseTable;
use dust_core::NoopAuditLog;
use dust_core::StderrAuditLog;
use dust_core::UpnDomains;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "dust.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DUST_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest accepted propagation tolerance in seconds.
const MIN_TOLERANCE_SECONDS: f64 = 1.0;
/// Largest accepted propagation tolerance in seconds.
const MAX_TOLERANCE_SECONDS: f64 = 3600.0;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// DUST configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DustConfig {
    /// Password propagation settings.
    #[serde(default)]
    pub propagation: PropagationConfig,
    /// Principal-name domains per classification.
    #[serde(default)]
    pub domains: UpnDomains,
    /// Active Directory OU placement.
    #[serde(default)]
    pub ad: AdSettings,
    /// FEIDE identifiers.
    #[serde(default)]
    pub feide: FeideSettings,
    /// Expected license tables; replaces the reference tables when present.
    #[serde(default = "default_licenses")]
    pub licenses: Vec<LicenseTable>,
    /// Audit log sink selection.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            propagation: PropagationConfig::default(),
            domains: UpnDomains::default(),
            ad: AdSettings::default(),
            feide: FeideSettings::default(),
            licenses: default_licenses(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DustConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from `path`, else from `DUST_CONFIG`, else
    /// `dust.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_resolved(&resolved)
    }

    /// Loads configuration, using defaults when no file was requested.
    ///
    /// Falls back to [`DustConfig::default`] only when neither `path` nor
    /// `DUST_CONFIG` is set and `dust.toml` does not exist. An explicitly
    /// requested file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        let resolved = resolve_path(path)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_resolved(&resolved)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.propagation.validate()?;
        validate_domains(&self.domains)?;
        validate_ad(&self.ad)?;
        validate_feide(&self.feide)?;
        validate_licenses(&self.licenses)?;
        self.logging.validate()?;
        Ok(())
    }

    /// Converts the configuration into rule settings.
    #[must_use]
    pub fn settings(&self) -> AuditSettings {
        AuditSettings {
            propagation_tolerance_seconds: self.propagation.tolerance_seconds,
            domains: self.domains.clone(),
            ad: self.ad.clone(),
            feide: self.feide.clone(),
            licenses: self.licenses.clone(),
        }
    }

    /// Builds the configured audit log sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the log file cannot be opened.
    pub fn audit_log(&self) -> Result<Arc<dyn AuditLogSink>, ConfigError> {
        self.logging.sink()
    }

    /// Reads and validates the file at an already resolved path.
    fn load_resolved(resolved: &Path) -> Result<Self, ConfigError> {
        validate_path(resolved)?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }
}

/// Password propagation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropagationConfig {
    /// Maximum accepted delay between AD and a downstream system, in seconds.
    pub tolerance_seconds: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            tolerance_seconds: DEFAULT_PROPAGATION_TOLERANCE_SECONDS,
        }
    }
}

impl PropagationConfig {
    /// Validates the tolerance range.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TOLERANCE_SECONDS..=MAX_TOLERANCE_SECONDS).contains(&self.tolerance_seconds) {
            return Err(ConfigError::Invalid(format!(
                "propagation.tolerance_seconds must be between {MIN_TOLERANCE_SECONDS} and \
                 {MAX_TOLERANCE_SECONDS}"
            )));
        }
        Ok(())
    }
}

/// Audit log sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// Discard events.
    None,
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit log configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Sink kind.
    pub sink: LogSinkKind,
    /// Log file path, required for the file sink.
    pub path: Option<String>,
}

impl LoggingConfig {
    /// Validates sink and path consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("logging.path is required for the file sink".to_string()))
            }
            (LogSinkKind::File, Some(path)) => validate_path_string("logging.path", path),
            (LogSinkKind::None | LogSinkKind::Stderr, Some(_)) => Err(ConfigError::Invalid(
                "logging.path is only allowed for the file sink".to_string(),
            )),
            (LogSinkKind::None | LogSinkKind::Stderr, None) => Ok(()),
        }
    }

    /// Builds the configured sink.
    fn sink(&self) -> Result<Arc<dyn AuditLogSink>, ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (LogSinkKind::None, _) => Ok(Arc::new(NoopAuditLog)),
            (LogSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditLog)),
            (LogSinkKind::File, Some(path)) => {
                let log = FileAuditLog::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(log))
            }
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("logging.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Requires a non-blank value.
fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Validates principal-name domains.
fn validate_domains(domains: &UpnDomains) -> Result<(), ConfigError> {
    require_non_empty("domains.employee", &domains.employee)?;
    require_non_empty("domains.student", &domains.student)?;
    if domains.employee == domains.student {
        return Err(ConfigError::Invalid("domains.employee and domains.student must differ".to_string()));
    }
    Ok(())
}

/// Validates OU placement paths.
fn validate_ad(ad: &AdSettings) -> Result<(), ConfigError> {
    require_non_empty("ad.employee_enabled_ou", &ad.employee_enabled_ou)?;
    require_non_empty("ad.employee_disabled_ou", &ad.employee_disabled_ou)?;
    require_non_empty("ad.student_enabled_ou", &ad.student_enabled_ou)?;
    require_non_empty("ad.student_disabled_ou", &ad.student_disabled_ou)?;
    for (label, enabled, disabled) in [
        ("employee", &ad.employee_enabled_ou, &ad.employee_disabled_ou),
        ("student", &ad.student_enabled_ou, &ad.student_disabled_ou),
    ] {
        if enabled.contains(disabled.as_str()) || disabled.contains(enabled.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "ad {label} enabled and disabled OUs must not contain each other"
            )));
        }
    }
    Ok(())
}

/// Validates FEIDE identifiers.
fn validate_feide(feide: &FeideSettings) -> Result<(), ConfigError> {
    require_non_empty("feide.principal_name_suffix", &feide.principal_name_suffix)?;
    require_non_empty("feide.mfa_sms", &feide.mfa_sms)?;
    require_non_empty("feide.mfa_ga", &feide.mfa_ga)?;
    require_non_empty("feide.organization_dn", &feide.organization_dn)
}

/// Validates license tables.
fn validate_licenses(tables: &[LicenseTable]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for table in tables {
        let person_type = table.person_type.as_str();
        if !seen.insert(person_type) {
            return Err(ConfigError::Invalid(format!("duplicate license table for {person_type}")));
        }
        if table.departments.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "license table for {person_type} must list departments"
            )));
        }
        for group in &table.departments {
            if group.department.is_empty() || group.department.iter().any(|code| code.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "license table for {person_type} has an empty department code"
                )));
            }
            if group.licenses.iter().any(|license| license.sku.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "license table for {person_type} has an empty sku"
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reference license tables.
fn default_licenses() -> Vec<LicenseTable> {
    AuditSettings::default().licenses
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
