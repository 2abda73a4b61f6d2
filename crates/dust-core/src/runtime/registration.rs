// crates/dust-core/src/runtime/registration.rs
// ============================================================================
// Module: DUST Test Registration
// Description: Declarative test specs and the fault-containing test runner.
// Purpose: Turn a predicate into a complete outcome without letting one
//          failing test affect the rest of its catalogue.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A [`TestSpec`] names a test and points at its predicate. [`register_test`]
//! runs one predicate and merges its result with the test identity; a
//! predicate that returns a [`CheckFault`] or panics becomes an `error`
//! outcome carrying the fault description as evidence.
//!
//! [`Catalogue`] ties an ordered spec table to a data gate. The gate is
//! computed once per invocation and threaded to every test through
//! [`CheckContext::data_present`], so concurrent invocations never share it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use serde_json::json;

use crate::core::AuditSettings;
use crate::core::CheckFault;
use crate::core::CheckResult;
use crate::core::Snapshot;
use crate::core::SnapshotBundle;
use crate::core::SystemName;
use crate::core::TestOutcome;
use crate::core::UserContext;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result returned by a test predicate.
pub type CheckOutcome = Result<CheckResult, CheckFault>;

/// Predicate signature used by catalogue tables.
pub type CheckFn = fn(&CheckContext<'_>) -> CheckOutcome;

/// Inputs visible to a predicate during one validator invocation.
///
/// # Invariants
/// - `data_present` is computed once per invocation from the catalogue gate.
/// - `bundle` is `None` when the caller supplied no cross-system data.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Snapshot of the system under test.
    pub snapshot: &'a Snapshot,
    /// Audited user.
    pub user: &'a UserContext,
    /// Every present snapshot, for cross-referencing.
    pub bundle: Option<&'a SnapshotBundle>,
    /// Rule constants.
    pub settings: &'a AuditSettings,
    /// Result of the catalogue's data gate.
    pub data_present: bool,
}

/// One entry of a validator's ordered test table.
///
/// # Invariants
/// - `id` is unique within its catalogue and never reused.
#[derive(Debug, Clone, Copy)]
pub struct TestSpec {
    /// Stable test id (`<system>-NN`).
    pub id: &'static str,
    /// Short title.
    pub title: &'static str,
    /// What the test checks.
    pub description: &'static str,
    /// When true the test reports `no-data` without running if the gate failed.
    pub gated: bool,
    /// Predicate.
    pub check: CheckFn,
}

impl TestSpec {
    /// Declares a test that is skipped with `no-data` when the gate fails.
    #[must_use]
    pub const fn gated(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        check: CheckFn,
    ) -> Self {
        Self {
            id,
            title,
            description,
            gated: true,
            check,
        }
    }

    /// Declares a test that always runs.
    #[must_use]
    pub const fn ungated(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        check: CheckFn,
    ) -> Self {
        Self {
            id,
            title,
            description,
            gated: false,
            check,
        }
    }
}

/// How a catalogue decides whether its snapshot carries data at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataGate {
    /// No gate; every test runs.
    None,
    /// Gate passes when the snapshot has at least one attribute.
    SnapshotHasData,
}

/// Ordered test table for one system.
#[derive(Debug, Clone, Copy)]
pub struct Catalogue {
    /// System the catalogue validates.
    pub system: SystemName,
    /// Data gate computed before the first test runs.
    pub gate: DataGate,
    /// Tests in presentation order.
    pub tests: &'static [TestSpec],
}

impl Catalogue {
    /// Returns the number of tests in the catalogue.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true when the catalogue has no tests.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Evaluates every test in order against one snapshot.
    #[must_use]
    pub fn evaluate(
        &self,
        snapshot: &Snapshot,
        user: &UserContext,
        bundle: Option<&SnapshotBundle>,
        settings: &AuditSettings,
    ) -> Vec<TestOutcome> {
        let data_present = match self.gate {
            DataGate::None => true,
            DataGate::SnapshotHasData => snapshot.has_data(),
        };
        let ctx = CheckContext {
            snapshot,
            user,
            bundle,
            settings,
            data_present,
        };
        self.tests
            .iter()
            .map(|spec| {
                register_test(spec.id, spec.title, spec.description, || {
                    if spec.gated && !ctx.data_present {
                        return Ok(CheckResult::no_data());
                    }
                    (spec.check)(&ctx)
                })
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Registration Primitive
// ============================================================================

/// Message used for outcomes produced from a contained predicate fault.
pub const FAULT_MESSAGE: &str = "Test failed to evaluate";

/// Runs one predicate and merges its result with the test identity.
///
/// Faults and panics raised by the predicate are contained here and become an
/// `error` outcome with evidence `{ "fault": "<description>" }`.
#[must_use]
pub fn register_test<F>(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    predicate: F,
) -> TestOutcome
where
    F: FnOnce() -> CheckOutcome,
{
    let result = match catch_unwind(AssertUnwindSafe(predicate)) {
        Ok(Ok(result)) => result,
        Ok(Err(fault)) => fault_result(&fault.to_string()),
        Err(payload) => fault_result(&panic_message(payload.as_ref())),
    };
    TestOutcome::from_result(id, title, description, result)
}

/// Builds the error result for a contained fault.
fn fault_result(description: &str) -> CheckResult {
    CheckResult::error(format!("{FAULT_MESSAGE}: {description}"))
        .with_evidence(json!({ "fault": description }))
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "predicate panicked".to_string())
}
