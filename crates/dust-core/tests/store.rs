// crates/dust-core/tests/store.rs
// ============================================================================
// Module: Result Store Tests
// Description: Validate the in-memory and shared result stores.
// Purpose: Ensure persisted outcome lists are keyed by run and system.
// ============================================================================

//! Result store tests.

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

use dust_core::CheckResult;
use dust_core::InMemoryResultStore;
use dust_core::ResultStore;
use dust_core::RunId;
use dust_core::SharedResultStore;
use dust_core::SystemName;
use dust_core::TestOutcome;

fn outcome(id: &str) -> TestOutcome {
    TestOutcome::from_result(id, "Title", "Description", CheckResult::success("ok"))
}

#[test]
fn persist_replaces_earlier_lists() {
    let store = InMemoryResultStore::new();
    let run_id = RunId::new("run-1");
    store.persist(&run_id, SystemName::Ad, &[outcome("ad-01")]).unwrap();
    store.persist(&run_id, SystemName::Ad, &[outcome("ad-01"), outcome("ad-02")]).unwrap();

    let loaded = store.load(&run_id, SystemName::Ad).unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
}

#[test]
fn runs_are_isolated() {
    let store = InMemoryResultStore::new();
    let first = RunId::new("run-1");
    let second = RunId::new("run-2");
    store.persist(&first, SystemName::Ad, &[outcome("ad-01")]).unwrap();
    store.persist(&second, SystemName::Feide, &[]).unwrap();

    let report = store.report(&first).unwrap();
    assert_eq!(report.len(), 1);
    assert!(report.outcomes(SystemName::Feide).is_none());
    assert!(store.load(&first, SystemName::Feide).unwrap().is_none());
    assert_eq!(store.load(&second, SystemName::Feide).unwrap(), Some(Vec::new()));
}

#[test]
fn shared_store_writes_through() {
    let inner = InMemoryResultStore::new();
    let shared = SharedResultStore::from_store(inner.clone());
    let run_id = RunId::new("run-3");

    let writer = shared.clone();
    std::thread::spawn(move || writer.persist(&RunId::new("run-3"), SystemName::Aad, &[outcome("aad-01")]))
        .join()
        .unwrap()
        .unwrap();

    assert_eq!(inner.load(&run_id, SystemName::Aad).unwrap().unwrap()[0].id, "aad-01");
}
