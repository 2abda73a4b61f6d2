// crates/dust-core/src/core/report.rs
// ============================================================================
// Module: DUST Audit Reports
// Description: Per-run report keyed by system, with severity summaries.
// Purpose: Carry aggregated outcomes to persistence and renderers.
// Dependencies: crate::core::{outcome, severity, systems}, serde
// ============================================================================

//! ## Overview
//! An [`AuditReport`] maps each evaluated system to its ordered outcome list.
//! [`SeverityCounts`] summarise a list for logs and renderers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::outcome::TestOutcome;
use crate::core::severity::Severity;
use crate::core::systems::SystemName;

// ============================================================================
// SECTION: Severity Counts
// ============================================================================

/// Number of outcomes per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    /// `success` outcomes.
    pub success: usize,
    /// `warning` outcomes.
    pub warning: usize,
    /// `error` outcomes.
    pub error: usize,
    /// `no-data` outcomes.
    pub no_data: usize,
}

impl SeverityCounts {
    /// Counts the severities of an outcome list.
    #[must_use]
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut counts, outcome| {
            match outcome.severity {
                Severity::Success => counts.success += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
                Severity::NoData => counts.no_data += 1,
            }
            counts
        })
    }

    /// Returns the total number of outcomes counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.warning + self.error + self.no_data
    }
}

// ============================================================================
// SECTION: Audit Report
// ============================================================================

/// Outcomes of one audit run, keyed by system.
///
/// # Invariants
/// - Every evaluated system has an entry, possibly with an empty list.
/// - Outcome order within a list is catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditReport {
    /// Outcomes per system.
    systems: BTreeMap<SystemName, Vec<TestOutcome>>,
}

impl AuditReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            systems: BTreeMap::new(),
        }
    }

    /// Records the outcomes for a system.
    pub fn insert(&mut self, system: SystemName, outcomes: Vec<TestOutcome>) {
        self.systems.insert(system, outcomes);
    }

    /// Returns the outcomes for a system.
    #[must_use]
    pub fn outcomes(&self, system: SystemName) -> Option<&[TestOutcome]> {
        self.systems.get(&system).map(Vec::as_slice)
    }

    /// Returns the outcome with the given id, searching every system.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&TestOutcome> {
        self.systems.values().flatten().find(|outcome| outcome.id == id)
    }

    /// Iterates systems and their outcomes in system order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemName, &[TestOutcome])> {
        self.systems.iter().map(|(system, outcomes)| (*system, outcomes.as_slice()))
    }

    /// Returns severity counts for a system.
    #[must_use]
    pub fn counts(&self, system: SystemName) -> SeverityCounts {
        self.outcomes(system).map(SeverityCounts::from_outcomes).unwrap_or_default()
    }

    /// Returns the worst severity across the report, if any outcome exists.
    #[must_use]
    pub fn worst(&self) -> Option<Severity> {
        self.systems.values().flatten().map(|outcome| outcome.severity).max()
    }

    /// Returns the number of systems in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns true when the report has no systems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
