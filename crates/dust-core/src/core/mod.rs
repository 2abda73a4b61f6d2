// crates/dust-core/src/core/mod.rs
// ============================================================================
// Module: DUST Core Types
// Description: Data model shared by validators, runtime, and interfaces.
// Purpose: Group the severity, outcome, snapshot, settings, and report types.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what flows through an audit run: snapshots in,
//! outcomes out. They carry no evaluation logic beyond presence helpers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fault;
pub mod identifiers;
pub mod outcome;
pub mod report;
pub mod settings;
pub mod severity;
pub mod snapshot;
pub mod systems;
pub mod user;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fault::CheckFault;
pub use identifiers::RunId;
pub use outcome::TestOutcome;
pub use outcome::is_valid_test_id;
pub use report::AuditReport;
pub use report::SeverityCounts;
pub use settings::AdSettings;
pub use settings::AuditSettings;
pub use settings::DEFAULT_PROPAGATION_TOLERANCE_SECONDS;
pub use settings::FeideSettings;
pub use settings::License;
pub use settings::LicenseDepartment;
pub use settings::LicenseTable;
pub use settings::UpnDomains;
pub use severity::CheckResult;
pub use severity::DEFAULT_NO_DATA_MESSAGE;
pub use severity::Severity;
pub use snapshot::Snapshot;
pub use snapshot::SnapshotBundle;
pub use snapshot::SnapshotShapeError;
pub use snapshot::has_data;
pub use snapshot::truthy;
pub use systems::SystemName;
pub use systems::UnknownSystemError;
pub use user::ExpectedType;
pub use user::UserContext;
