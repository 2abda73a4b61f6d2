// crates/dust-core/src/runtime/resolver.rs
// ============================================================================
// Module: DUST Cross-System Resolver
// Description: Active-record selection and timestamp delta evaluation.
// Purpose: Answer the two cross-system questions validators ask of other
//          systems' snapshots.
// Dependencies: crate::core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Roster systems (HR and student registers) may hold several records for one
//! person. [`active_record`] picks the record that decides whether the person
//! is currently active, following a per-system [`RosterPolicy`].
//!
//! [`time_delta`] compares two timestamps from different directories and
//! reports whether the signed difference is within the propagation tolerance.
//! Both helpers are total: unexpected shapes yield inactive records or a
//! failed delta, never a fault.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::Date;
use time::Month;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::Snapshot;
use crate::core::SystemName;
use crate::core::snapshot::RECORDS_KEY;
use crate::core::truthy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Array keys under which roster snapshots may list their records.
pub const ROSTER_ARRAY_KEYS: [&str; 3] = [RECORDS_KEY, "employments", "memberships"];

/// Field carrying a record's activity flag.
pub const ACTIVE_FIELD: &str = "active";

/// Field carrying an HR record's start date.
pub const START_DATE_FIELD: &str = "startDate";

// ============================================================================
// SECTION: Active Record Selection
// ============================================================================

/// How a roster system's active record is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterPolicy {
    /// The record with the latest start date decides; undated rosters fall
    /// back to the first record flagged active.
    MostRecent,
    /// The first record flagged active, otherwise inactive.
    FirstFlagged,
}

impl RosterPolicy {
    /// Returns the policy used for a system.
    #[must_use]
    pub const fn for_system(system: SystemName) -> Self {
        match system {
            SystemName::Visma => Self::MostRecent,
            _ => Self::FirstFlagged,
        }
    }
}

/// Record that decides a person's activity in a roster system.
///
/// # Invariants
/// - `active` is false whenever `record` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveRecord {
    /// Whether the person is active in the roster.
    pub active: bool,
    /// Selected record, when any record exists.
    pub record: Option<Value>,
}

impl ActiveRecord {
    /// Record used when the roster holds nothing.
    const fn none() -> Self {
        Self {
            active: false,
            record: None,
        }
    }
}

/// Returns the records listed in a roster snapshot.
///
/// A snapshot holding a `records`, `employments`, or `memberships` array
/// lists those entries; any other non-empty snapshot is a single record.
#[must_use]
pub fn roster_records(snapshot: &Snapshot) -> Vec<&Map<String, Value>> {
    for key in ROSTER_ARRAY_KEYS {
        if let Some(Value::Array(items)) = snapshot.get(key) {
            return items.iter().filter_map(Value::as_object).collect();
        }
    }
    if snapshot.has_data() { vec![snapshot.attributes()] } else { Vec::new() }
}

/// Selects the active record of a roster snapshot using the system's policy.
#[must_use]
pub fn active_record(system: SystemName, snapshot: &Snapshot) -> ActiveRecord {
    select_active_record(&roster_records(snapshot), RosterPolicy::for_system(system))
}

/// Selects the active record from a record list.
///
/// The selected record's own `active` flag decides activity.
#[must_use]
pub fn select_active_record(
    records: &[&Map<String, Value>],
    policy: RosterPolicy,
) -> ActiveRecord {
    let selected = match policy {
        RosterPolicy::MostRecent => most_recent_start(records).or_else(|| {
            first_flagged(records).or_else(|| records.first().copied())
        }),
        RosterPolicy::FirstFlagged => first_flagged(records).or_else(|| records.first().copied()),
    };
    selected.map_or_else(ActiveRecord::none, |record| ActiveRecord {
        active: truthy(record.get(ACTIVE_FIELD)),
        record: Some(Value::Object(record.clone())),
    })
}

/// Returns the first record flagged active.
fn first_flagged<'a>(records: &[&'a Map<String, Value>]) -> Option<&'a Map<String, Value>> {
    records.iter().copied().find(|record| truthy(record.get(ACTIVE_FIELD)))
}

/// Returns the record with the latest parseable start date.
///
/// Records without a parseable date are ignored; among equal dates the
/// earliest listed wins. `None` when no record carries a date.
fn most_recent_start<'a>(records: &[&'a Map<String, Value>]) -> Option<&'a Map<String, Value>> {
    let mut best: Option<(&'a Map<String, Value>, OffsetDateTime)> = None;
    for record in records {
        let Some(started) = record.get(START_DATE_FIELD).and_then(parse_timestamp) else {
            continue;
        };
        if best.is_none_or(|(_, current)| started > current) {
            best = Some((*record, started));
        }
    }
    best.map(|(record, _)| record)
}

// ============================================================================
// SECTION: Time Delta
// ============================================================================

/// Result of comparing two timestamps against a tolerance.
///
/// # Invariants
/// - `seconds` is `None` exactly when either timestamp failed to parse, and
///   `result` is then false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeDelta {
    /// Whether `|seconds| <= tolerance`.
    pub result: bool,
    /// Signed difference `target - source`, in seconds.
    pub seconds: Option<f64>,
}

/// Compares `target - source` against a tolerance (inclusive).
#[must_use]
pub fn time_delta(source: Option<&Value>, target: Option<&Value>, tolerance_seconds: f64) -> TimeDelta {
    let parsed = source.and_then(parse_timestamp).zip(target.and_then(parse_timestamp));
    let Some((source, target)) = parsed else {
        return TimeDelta {
            result: false,
            seconds: None,
        };
    };
    let seconds = (target - source).as_seconds_f64();
    TimeDelta {
        result: seconds.abs() <= tolerance_seconds,
        seconds: Some(seconds),
    }
}

/// Parses a timestamp value.
///
/// Accepts RFC 3339 strings, `YYYY-MM-DD` dates (midnight UTC), integer unix
/// milliseconds (as numbers or digit strings), and `/Date(<millis>)/` strings.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::Number(number) => number.as_i64().and_then(from_unix_millis),
        Value::String(text) => parse_timestamp_text(text.trim()),
        _ => None,
    }
}

/// Parses the string forms accepted by [`parse_timestamp`].
fn parse_timestamp_text(text: &str) -> Option<OffsetDateTime> {
    if let Some(inner) = text.strip_prefix("/Date(").and_then(|rest| rest.strip_suffix(")/")) {
        return inner.parse::<i64>().ok().and_then(from_unix_millis);
    }
    if !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit()) {
        return text.parse::<i64>().ok().and_then(from_unix_millis);
    }
    if let Ok(parsed) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(parsed);
    }
    parse_calendar_date(text)
}

/// Parses a `YYYY-MM-DD` date as midnight UTC.
fn parse_calendar_date(text: &str) -> Option<OffsetDateTime> {
    let mut parts = text.splitn(3, '-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let date = Date::from_calendar_date(year.parse().ok()?, month, day.parse().ok()?).ok()?;
    Some(date.midnight().assume_utc())
}

/// Converts unix milliseconds into a timestamp.
fn from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
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
    fn parses_accepted_shapes() {
        let expected = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(parse_timestamp(&json!("2023-11-14T22:13:20Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!(1_700_000_000_000_i64)), Some(expected));
        assert_eq!(parse_timestamp(&json!("/Date(1700000000000)/")), Some(expected));
        assert_eq!(parse_timestamp(&json!("1700000000000")), Some(expected));
    }

    #[test]
    fn parses_calendar_dates() {
        let parsed = parse_timestamp(&json!("2021-08-01")).unwrap();
        assert_eq!(parsed.year(), 2021);
        assert_eq!(parsed.month(), Month::August);
        assert_eq!(parsed.day(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!("2021-13-01")), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
        assert_eq!(parse_timestamp(&json!("")), None);
    }

    #[test]
    fn single_object_is_one_record() {
        let snapshot = Snapshot::from_value(SystemName::Pifu, json!({"active": true})).unwrap();
        assert_eq!(roster_records(&snapshot).len(), 1);
        assert!(active_record(SystemName::Pifu, &snapshot).active);
    }

    #[test]
    fn empty_roster_is_inactive() {
        let snapshot = Snapshot::default();
        assert_eq!(active_record(SystemName::Visma, &snapshot), ActiveRecord::none());
    }
}
