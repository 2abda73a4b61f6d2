// crates/dust-core/src/validators/mod.rs
// ============================================================================
// Module: DUST Validators
// Description: Per-system rule tables and dispatch by system name.
// Purpose: Map each auditable system to its ordered test catalogue.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Each validator is a declarative [`Catalogue`]: an ordered table of tests
//! evaluated by the shared engine in [`crate::runtime::registration`]. Only
//! directories own catalogues; roster and auxiliary systems are used for
//! cross-referencing and produce no tests of their own.

pub mod aad;
pub mod ad;
pub mod feide;
pub mod shared;

use crate::core::AuditSettings;
use crate::core::Snapshot;
use crate::core::SnapshotBundle;
use crate::core::SystemName;
use crate::core::TestOutcome;
use crate::core::UserContext;
use crate::runtime::registration::Catalogue;

/// Returns the catalogue owned by a system, if any.
#[must_use]
pub fn catalogue(system: SystemName) -> Option<&'static Catalogue> {
    match system {
        SystemName::Ad => Some(&ad::CATALOGUE),
        SystemName::Aad => Some(&aad::CATALOGUE),
        SystemName::Feide => Some(&feide::CATALOGUE),
        SystemName::Visma
        | SystemName::Pifu
        | SystemName::Sds
        | SystemName::Vis
        | SystemName::Sync
        | SystemName::Equitrac
        | SystemName::VigoOt
        | SystemName::VigoLaerling
        | SystemName::P360 => None,
    }
}

/// Returns every catalogue in system order.
pub fn catalogues() -> impl Iterator<Item = &'static Catalogue> {
    SystemName::ALL.into_iter().filter_map(catalogue)
}

/// Runs the system's catalogue against a snapshot.
///
/// Systems without a catalogue yield an empty list.
#[must_use]
pub fn validate(
    system: SystemName,
    snapshot: &Snapshot,
    user: &UserContext,
    bundle: Option<&SnapshotBundle>,
    settings: &AuditSettings,
) -> Vec<TestOutcome> {
    catalogue(system)
        .map(|catalogue| catalogue.evaluate(snapshot, user, bundle, settings))
        .unwrap_or_default()
}
