// crates/dust-core/src/lib.rs
// ============================================================================
// Module: DUST Core Library
// Description: Public API surface for the DUST account audit engine.
// Purpose: Expose core types, interfaces, validators, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime, validators}
// ============================================================================

//! ## Overview
//! DUST audits one user's accounts across identity directories and source
//! rosters. Each directory has an ordered catalogue of tests; a test reads
//! the directory's snapshot (and optionally every other system's snapshot)
//! and yields a `success`, `warning`, `error`, or `no-data` outcome with
//! evidence. Evaluation is synchronous and side-effect free; fetching and
//! persistence sit behind the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod validators;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AuditLogSink;
pub use interfaces::ResultStore;
pub use interfaces::SnapshotSource;
pub use interfaces::SourceError;
pub use interfaces::StoreError;
pub use runtime::AuditError;
pub use runtime::AuditRequest;
pub use runtime::Auditor;
pub use runtime::Catalogue;
pub use runtime::FileAuditLog;
pub use runtime::InMemoryResultStore;
pub use runtime::NoopAuditLog;
pub use runtime::PersistedRun;
pub use runtime::SharedResultStore;
pub use runtime::StderrAuditLog;
pub use validators::catalogue;
pub use validators::catalogues;
pub use validators::validate;
