// crates/dust-core/src/runtime/aggregator.rs
// ============================================================================
// Module: DUST Aggregator
// Description: Runs every system's catalogue for one user and collects the
//              results into a report.
// Purpose: Dispatch snapshots to validators, persist outcomes, and log
//          progress without letting one system affect another.
// Dependencies: crate::{core, interfaces, runtime, validators}, serde_json,
//               thiserror
// ============================================================================

//! ## Overview
//! An audit run starts from raw system-keyed snapshots. [`AuditRequest`]
//! resolves the names against the closed system set and checks snapshot
//! shapes up front, so dispatch errors surface before any test runs. The
//! [`Auditor`] then evaluates each system independently: a present snapshot
//! runs its catalogue against the bundle of all present snapshots, and an
//! absent snapshot yields an empty list.
//!
//! Persistence failures are reported next to the report; outcomes are never
//! discarded because a store call failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::core::AuditReport;
use crate::core::AuditSettings;
use crate::core::RunId;
use crate::core::SeverityCounts;
use crate::core::Snapshot;
use crate::core::SnapshotBundle;
use crate::core::SnapshotShapeError;
use crate::core::SystemName;
use crate::core::UnknownSystemError;
use crate::core::UserContext;
use crate::interfaces::AuditLogSink;
use crate::interfaces::ResultStore;
use crate::interfaces::SnapshotSource;
use crate::interfaces::StoreError;
use crate::runtime::audit::AuditLogEvent;
use crate::runtime::audit::NoopAuditLog;
use crate::validators;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dispatch errors raised before evaluation starts.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// A system name is not part of the supported set.
    #[error(transparent)]
    UnknownSystem(#[from] UnknownSystemError),
    /// A snapshot has an unsupported JSON shape.
    #[error(transparent)]
    MalformedSnapshot(#[from] SnapshotShapeError),
    /// The same system was supplied under two spellings.
    #[error("system {0} supplied more than once")]
    DuplicateSystem(SystemName),
}

// ============================================================================
// SECTION: Request
// ============================================================================

/// Resolved input of one audit run.
///
/// # Invariants
/// - Each system appears at most once.
/// - Present snapshots are JSON objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    /// Audited user.
    user: UserContext,
    /// Snapshot per requested system; `None` when absent.
    systems: BTreeMap<SystemName, Option<Snapshot>>,
}

impl AuditRequest {
    /// Creates an empty request for a user.
    #[must_use]
    pub const fn new(user: UserContext) -> Self {
        Self {
            user,
            systems: BTreeMap::new(),
        }
    }

    /// Resolves raw name-keyed snapshots.
    ///
    /// A `null` value marks the system as requested but absent.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] for unknown names, duplicate systems, or
    /// snapshots that are not JSON objects.
    pub fn from_raw<I, K>(user: UserContext, raw: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = (K, Option<Value>)>,
        K: AsRef<str>,
    {
        let mut request = Self::new(user);
        for (name, value) in raw {
            let system: SystemName = name.as_ref().parse()?;
            let snapshot = match value {
                None | Some(Value::Null) => None,
                Some(value) => Some(Snapshot::from_value(system, value)?),
            };
            if request.systems.contains_key(&system) {
                return Err(AuditError::DuplicateSystem(system));
            }
            request.systems.insert(system, snapshot);
        }
        Ok(request)
    }

    /// Adds or replaces a system's snapshot.
    pub fn insert(&mut self, system: SystemName, snapshot: Option<Snapshot>) {
        self.systems.insert(system, snapshot);
    }

    /// Returns the audited user.
    #[must_use]
    pub const fn user(&self) -> &UserContext {
        &self.user
    }

    /// Returns the requested systems in system order.
    pub fn systems(&self) -> impl Iterator<Item = SystemName> + '_ {
        self.systems.keys().copied()
    }

    /// Returns the snapshot for a system, when present.
    #[must_use]
    pub fn snapshot(&self, system: SystemName) -> Option<&Snapshot> {
        self.systems.get(&system).and_then(Option::as_ref)
    }

    /// Builds the bundle of every present snapshot.
    #[must_use]
    pub fn bundle(&self) -> SnapshotBundle {
        self.systems
            .iter()
            .filter_map(|(system, snapshot)| snapshot.clone().map(|snapshot| (*system, snapshot)))
            .collect()
    }
}

// ============================================================================
// SECTION: Persisted Run
// ============================================================================

/// Persistence failure for one system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    /// System whose outcomes were not stored.
    pub system: SystemName,
    /// Store error.
    pub error: StoreError,
}

/// Report of a run together with any persistence failures.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRun {
    /// Run identifier.
    pub run_id: RunId,
    /// Complete report, including systems whose persistence failed.
    pub report: AuditReport,
    /// Systems whose outcomes could not be stored.
    pub failures: Vec<PersistFailure>,
}

impl PersistedRun {
    /// Returns true when every system was stored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Auditor
// ============================================================================

/// Evaluates audit requests against the configured rule settings.
#[derive(Clone)]
pub struct Auditor {
    /// Rule constants.
    settings: AuditSettings,
    /// Audit log sink.
    log: Arc<dyn AuditLogSink>,
}

impl Auditor {
    /// Creates an auditor that does not log.
    #[must_use]
    pub fn new(settings: AuditSettings) -> Self {
        Self {
            settings,
            log: Arc::new(NoopAuditLog),
        }
    }

    /// Replaces the audit log sink.
    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn AuditLogSink>) -> Self {
        self.log = log;
        self
    }

    /// Returns the rule settings.
    #[must_use]
    pub const fn settings(&self) -> &AuditSettings {
        &self.settings
    }

    /// Fetches snapshots for the given systems.
    ///
    /// Source failures are logged and the snapshot is treated as absent.
    #[must_use]
    pub fn collect(
        &self,
        source: &dyn SnapshotSource,
        user: UserContext,
        systems: &[SystemName],
    ) -> AuditRequest {
        let mut request = AuditRequest::new(user);
        for system in systems {
            let snapshot = match source.fetch(*system, request.user()) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    self.log.record(&AuditLogEvent::source_failed(
                        request.user().identity_label(),
                        *system,
                        err.to_string(),
                    ));
                    None
                }
            };
            request.insert(*system, snapshot);
        }
        request
    }

    /// Evaluates every requested system.
    #[must_use]
    pub fn evaluate(&self, request: &AuditRequest) -> AuditReport {
        let bundle = request.bundle();
        let label = request.user().identity_label();
        let mut report = AuditReport::new();
        for system in request.systems() {
            let outcomes = match request.snapshot(system) {
                Some(snapshot) => {
                    let outcomes = validators::validate(
                        system,
                        snapshot,
                        request.user(),
                        Some(&bundle),
                        &self.settings,
                    );
                    self.log.record(&AuditLogEvent::system_evaluated(
                        label,
                        system,
                        SeverityCounts::from_outcomes(&outcomes),
                    ));
                    outcomes
                }
                None => {
                    self.log.record(&AuditLogEvent::system_skipped(label, system));
                    Vec::new()
                }
            };
            report.insert(system, outcomes);
        }
        report
    }

    /// Resolves raw snapshots and evaluates them.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the raw input cannot be dispatched.
    pub fn evaluate_raw<I, K>(&self, user: UserContext, raw: I) -> Result<AuditReport, AuditError>
    where
        I: IntoIterator<Item = (K, Option<Value>)>,
        K: AsRef<str>,
    {
        let request = AuditRequest::from_raw(user, raw)?;
        Ok(self.evaluate(&request))
    }

    /// Evaluates a request and persists each system's outcomes.
    ///
    /// Every system is persisted, including those with empty lists. Store
    /// failures are logged and returned next to the full report.
    #[must_use]
    pub fn evaluate_and_persist(
        &self,
        run_id: &RunId,
        request: &AuditRequest,
        store: &dyn ResultStore,
    ) -> PersistedRun {
        let report = self.evaluate(request);
        let label = request.user().identity_label();
        let mut failures = Vec::new();
        for (system, outcomes) in report.iter() {
            if let Err(error) = store.persist(run_id, system, outcomes) {
                self.log.record(&AuditLogEvent::persist_failed(
                    label,
                    run_id,
                    system,
                    error.to_string(),
                ));
                failures.push(PersistFailure {
                    system,
                    error,
                });
            }
        }
        PersistedRun {
            run_id: run_id.clone(),
            report,
            failures,
        }
    }
}
