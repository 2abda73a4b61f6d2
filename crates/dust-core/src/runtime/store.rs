// crates/dust-core/src/runtime/store.rs
// ============================================================================
// Module: DUST In-Memory Result Store
// Description: Simple in-memory outcome store for tests and the CLI.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryResultStore`] keeps outcome lists keyed by run and system.
//! [`SharedResultStore`] wraps any store behind an `Arc` so it can be cloned
//! across threads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::AuditReport;
use crate::core::RunId;
use crate::core::SystemName;
use crate::core::TestOutcome;
use crate::interfaces::ResultStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Outcome lists keyed by run and system.
type RunMap = BTreeMap<(RunId, SystemName), Vec<TestOutcome>>;

/// In-memory result store for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResultStore {
    /// Outcome map protected by a mutex.
    runs: Arc<Mutex<RunMap>>,
}

impl InMemoryResultStore {
    /// Creates a new in-memory result store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Loads the outcomes persisted for one run and system.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn load(
        &self,
        run_id: &RunId,
        system: SystemName,
    ) -> Result<Option<Vec<TestOutcome>>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(&(run_id.clone(), system)).cloned())
    }

    /// Rebuilds the report persisted for one run.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn report(&self, run_id: &RunId) -> Result<AuditReport, StoreError> {
        let guard = self.lock()?;
        let mut report = AuditReport::new();
        for ((stored_run, system), outcomes) in guard.iter() {
            if stored_run == run_id {
                report.insert(*system, outcomes.clone());
            }
        }
        Ok(report)
    }

    /// Locks the outcome map.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RunMap>, StoreError> {
        self.runs.lock().map_err(|_| StoreError::Store("result store mutex poisoned".to_string()))
    }
}

impl ResultStore for InMemoryResultStore {
    fn persist(
        &self,
        run_id: &RunId,
        system: SystemName,
        outcomes: &[TestOutcome],
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.insert((run_id.clone(), system), outcomes.to_vec());
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared result store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedResultStore {
    /// Inner store implementation.
    inner: Arc<dyn ResultStore + Send + Sync>,
}

impl SharedResultStore {
    /// Wraps a result store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ResultStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ResultStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ResultStore for SharedResultStore {
    fn persist(
        &self,
        run_id: &RunId,
        system: SystemName,
        outcomes: &[TestOutcome],
    ) -> Result<(), StoreError> {
        self.inner.persist(run_id, system, outcomes)
    }
}
