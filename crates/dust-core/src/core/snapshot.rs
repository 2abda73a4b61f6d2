// crates/dust-core/src/core/snapshot.rs
// ============================================================================
// Module: DUST Snapshots
// Description: Read-only views of one system's account attributes.
// Purpose: Give predicates typed, fault-returning accessors over raw JSON.
// Dependencies: crate::core::{fault, systems}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Snapshot`] is one system's current view of the user, stored as a JSON
//! object. Roster systems may deliver an array of records; those are exposed
//! under the `records` key. A [`SnapshotBundle`] holds every present
//! snapshot for cross-referencing.
//!
//! Presence follows two helper notions used throughout the rule tables:
//! [`has_data`] (non-empty) and [`truthy`] (non-empty and not `false`/`0`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::fault::CheckFault;
use crate::core::systems::SystemName;

// ============================================================================
// SECTION: Presence Helpers
// ============================================================================

/// Returns true when a value carries data.
///
/// Absent, null, empty strings, empty arrays, and empty objects carry no
/// data. Booleans and numbers always do, including `false` and `0`.
#[must_use]
pub fn has_data(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => true,
    }
}

/// Returns true when a value is truthy.
///
/// Absent, null, `false`, zero, and empty strings are falsy; everything else
/// (including empty arrays and objects) is truthy.
#[must_use]
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Key under which roster arrays are exposed.
pub const RECORDS_KEY: &str = "records";

/// Errors raised when raw snapshot JSON has an unsupported shape.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotShapeError {
    /// The snapshot is neither an object nor an accepted roster array.
    #[error("snapshot for {system} must be a JSON object (got {found})")]
    NotAnObject {
        /// System the snapshot belongs to.
        system: SystemName,
        /// JSON type label that was found.
        found: &'static str,
    },
}

/// One system's attribute map for the audited user.
///
/// # Invariants
/// - Always backed by a JSON object.
/// - Read-only once constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    /// Creates a snapshot from an attribute map.
    #[must_use]
    pub const fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    /// Builds a snapshot from raw JSON delivered for `system`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotShapeError`] when the value is not an object, or is
    /// an array for a system that is not a roster.
    pub fn from_value(system: SystemName, value: Value) -> Result<Self, SnapshotShapeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(records) if system.is_roster() => {
                let mut map = Map::new();
                map.insert(RECORDS_KEY.to_string(), Value::Array(records));
                Ok(Self(map))
            }
            other => Err(SnapshotShapeError::NotAnObject {
                system,
                found: json_type(&other),
            }),
        }
    }

    /// Returns true when the snapshot carries any attribute data.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the underlying attribute map.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the raw value for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns true when the field carries data (see [`has_data`]).
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        has_data(self.get(field))
    }

    /// Returns true when the field is truthy (see [`truthy`]).
    #[must_use]
    pub fn is_truthy(&self, field: &str) -> bool {
        truthy(self.get(field))
    }

    /// Returns a non-empty string field.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str).filter(|text| !text.is_empty())
    }

    /// Returns a string field, faulting when it is absent or not a string.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFault`] when the field is absent, null, or not a string.
    pub fn require_text(&self, field: &str) -> Result<&str, CheckFault> {
        match self.get(field) {
            None | Some(Value::Null) => Err(CheckFault::missing(field)),
            Some(Value::String(text)) => Ok(text),
            Some(_) => Err(CheckFault::wrong_type(field, "string")),
        }
    }

    /// Returns an array field, faulting when it is absent or not an array.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFault`] when the field is absent, null, or not an array.
    pub fn require_array(&self, field: &str) -> Result<&[Value], CheckFault> {
        match self.get(field) {
            None | Some(Value::Null) => Err(CheckFault::missing(field)),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(CheckFault::wrong_type(field, "array")),
        }
    }

    /// Returns the string entries of an array field.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFault`] when the field is not an array of strings.
    pub fn require_strings(&self, field: &str) -> Result<Vec<&str>, CheckFault> {
        self.require_array(field)?
            .iter()
            .map(|item| item.as_str().ok_or_else(|| CheckFault::wrong_type(field, "string array")))
            .collect()
    }

    /// Returns the field value for evidence, `null` when absent.
    #[must_use]
    pub fn value_or_null(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Returns the field value when it carries data, `null` otherwise.
    #[must_use]
    pub fn data_or_null(&self, field: &str) -> Value {
        if self.has(field) { self.value_or_null(field) } else { Value::Null }
    }

    /// Returns the full snapshot as evidence.
    #[must_use]
    pub fn to_evidence(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Snapshot {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// SECTION: Snapshot Bundle
// ============================================================================

/// Every present snapshot for one user, keyed by system.
///
/// # Invariants
/// - Contains only present snapshots; absent systems have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SnapshotBundle(BTreeMap<SystemName, Snapshot>);

impl SnapshotBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a snapshot for a system, replacing any earlier one.
    pub fn insert(&mut self, system: SystemName, snapshot: Snapshot) {
        self.0.insert(system, snapshot);
    }

    /// Returns the snapshot for a system.
    #[must_use]
    pub fn get(&self, system: SystemName) -> Option<&Snapshot> {
        self.0.get(&system)
    }

    /// Returns the snapshot for a system when it carries data.
    #[must_use]
    pub fn with_data(&self, system: SystemName) -> Option<&Snapshot> {
        self.get(system).filter(|snapshot| snapshot.has_data())
    }

    /// Returns the systems present in the bundle.
    pub fn systems(&self) -> impl Iterator<Item = SystemName> + '_ {
        self.0.keys().copied()
    }

    /// Returns the number of present snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no snapshots are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the whole bundle as evidence.
    #[must_use]
    pub fn to_evidence(&self) -> Value {
        let map = self
            .0
            .iter()
            .map(|(system, snapshot)| (system.as_str().to_string(), snapshot.to_evidence()))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(SystemName, Snapshot)> for SnapshotBundle {
    fn from_iter<I: IntoIterator<Item = (SystemName, Snapshot)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a JSON type label for diagnostics.
const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use serde_json::json;

    use super::*;

    #[test]
    fn has_data_treats_false_as_data() {
        assert!(has_data(Some(&json!(false))));
        assert!(has_data(Some(&json!(0))));
        assert!(!has_data(Some(&json!(""))));
        assert!(!has_data(Some(&json!([]))));
        assert!(!has_data(Some(&json!({}))));
        assert!(!has_data(Some(&Value::Null)));
        assert!(!has_data(None));
    }

    #[test]
    fn truthy_follows_loose_rules() {
        assert!(truthy(Some(&json!(true))));
        assert!(truthy(Some(&json!([]))));
        assert!(!truthy(Some(&json!(false))));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(!truthy(None));
    }

    #[test]
    fn roster_arrays_become_records() {
        let snapshot = Snapshot::from_value(SystemName::Visma, json!([{"active": true}])).unwrap();
        assert_eq!(snapshot.require_array(RECORDS_KEY).unwrap().len(), 1);
    }

    #[test]
    fn arrays_are_rejected_for_directories() {
        let err = Snapshot::from_value(SystemName::Ad, json!([])).unwrap_err();
        assert_eq!(
            err,
            SnapshotShapeError::NotAnObject {
                system: SystemName::Ad,
                found: "array",
            }
        );
    }

    #[test]
    fn require_text_distinguishes_missing_and_wrong_type() {
        let snapshot = Snapshot::from_value(SystemName::Ad, json!({"mail": 3})).unwrap();
        assert_eq!(snapshot.require_text("upn"), Err(CheckFault::missing("upn")));
        assert_eq!(snapshot.require_text("mail"), Err(CheckFault::wrong_type("mail", "string")));
    }
}
