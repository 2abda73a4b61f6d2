// crates/dust-core/src/runtime/mod.rs
// ============================================================================
// Module: DUST Runtime
// Description: Test engine, cross-system resolver, aggregator, and helpers.
// Purpose: Evaluate catalogues against snapshots and route the results.
// Dependencies: crate::{core, interfaces}, regex, time
// ============================================================================

//! ## Overview
//! Runtime modules turn snapshots into outcomes. Every validator goes through
//! the same registration primitive, so fault containment and gating behave
//! identically for all systems.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregator;
pub mod audit;
pub mod fnr;
pub mod registration;
pub mod resolver;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregator::AuditError;
pub use aggregator::AuditRequest;
pub use aggregator::Auditor;
pub use aggregator::PersistFailure;
pub use aggregator::PersistedRun;
pub use audit::AuditEventKind;
pub use audit::AuditLogEvent;
pub use audit::FileAuditLog;
pub use audit::NoopAuditLog;
pub use audit::StderrAuditLog;
pub use fnr::NationalIdCheck;
pub use fnr::NationalIdKind;
pub use fnr::validate_national_id;
pub use registration::Catalogue;
pub use registration::CheckContext;
pub use registration::CheckFn;
pub use registration::CheckOutcome;
pub use registration::DataGate;
pub use registration::TestSpec;
pub use registration::register_test;
pub use resolver::ActiveRecord;
pub use resolver::RosterPolicy;
pub use resolver::TimeDelta;
pub use resolver::active_record;
pub use resolver::parse_timestamp;
pub use resolver::time_delta;
pub use store::InMemoryResultStore;
pub use store::SharedResultStore;
