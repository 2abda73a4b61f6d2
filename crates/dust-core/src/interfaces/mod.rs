// crates/dust-core/src/interfaces/mod.rs
// ============================================================================
// Module: DUST Interfaces
// Description: Backend-agnostic collaborator contracts for the audit engine.
// Purpose: Define how snapshots arrive and where outcomes go without binding
//          the engine to a directory client or database.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The engine is pure; everything with side effects sits behind these
//! traits. A [`SnapshotSource`] fetches one system's view of a user, a
//! [`ResultStore`] persists one system's outcome list, and an
//! [`AuditLogSink`] receives structured log events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::RunId;
use crate::core::Snapshot;
use crate::core::SystemName;
use crate::core::TestOutcome;
use crate::core::UserContext;
use crate::runtime::audit::AuditLogEvent;

// ============================================================================
// SECTION: Snapshot Source
// ============================================================================

/// Snapshot source errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The backend could not be reached or answered with a failure.
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
    /// The backend answered with data the source could not decode.
    #[error("snapshot source returned invalid data: {0}")]
    Invalid(String),
}

/// Fetches one system's snapshot of a user.
pub trait SnapshotSource {
    /// Returns the snapshot, or `None` when the system holds nothing for the
    /// user.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the backend fails.
    fn fetch(&self, system: SystemName, user: &UserContext)
    -> Result<Option<Snapshot>, SourceError>;
}

// ============================================================================
// SECTION: Result Store
// ============================================================================

/// Result store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("result store io error: {0}")]
    Io(String),
    /// Store reported an error.
    #[error("result store error: {0}")]
    Store(String),
}

/// Persists the outcome list of one system for one run.
pub trait ResultStore {
    /// Persists outcomes, replacing any earlier list for the same run and
    /// system.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when persistence fails.
    fn persist(
        &self,
        run_id: &RunId,
        system: SystemName,
        outcomes: &[TestOutcome],
    ) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Audit Log Sink
// ============================================================================

/// Receives structured audit log events.
pub trait AuditLogSink: Send + Sync {
    /// Records an event. Sinks never fail the caller.
    fn record(&self, event: &AuditLogEvent);
}
