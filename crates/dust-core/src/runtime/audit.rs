// crates/dust-core/src/runtime/audit.rs
// ============================================================================
// Module: DUST Audit Logging
// Description: Structured audit log events and their sinks.
// Purpose: Emit JSON-line logs of evaluation, skips, and collaborator failures.
// Dependencies: crate::{core, interfaces}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every notable step of an audit run produces an [`AuditLogEvent`]. Events
//! carry the user's identity label, never snapshot contents, so logs do not
//! leak identity numbers. Sinks write one JSON object per line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::RunId;
use crate::core::SeverityCounts;
use crate::core::SystemName;
use crate::interfaces::AuditLogSink;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Kind of audit log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A system's catalogue ran.
    SystemEvaluated,
    /// A system was skipped because no snapshot was supplied.
    SystemSkipped,
    /// A snapshot source failed; the snapshot was treated as absent.
    SourceFailed,
    /// Persisting a system's outcomes failed.
    PersistFailed,
}

/// Audit log event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditLogEvent {
    /// Event kind.
    pub event: AuditEventKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Identity label of the audited user.
    pub user: String,
    /// System the event concerns.
    pub system: SystemName,
    /// Run identifier, when the event belongs to a persisted run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
    /// Severity counts for evaluated systems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<SeverityCounts>,
    /// Failure or skip detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditLogEvent {
    /// Creates an event of the given kind with a fresh timestamp.
    #[must_use]
    pub fn new(event: AuditEventKind, user: impl Into<String>, system: SystemName) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            user: user.into(),
            system,
            run_id: None,
            counts: None,
            detail: None,
        }
    }

    /// Event for a system whose catalogue ran.
    #[must_use]
    pub fn system_evaluated(user: &str, system: SystemName, counts: SeverityCounts) -> Self {
        Self {
            counts: Some(counts),
            ..Self::new(AuditEventKind::SystemEvaluated, user, system)
        }
    }

    /// Event for a system skipped for lack of data.
    #[must_use]
    pub fn system_skipped(user: &str, system: SystemName) -> Self {
        Self {
            detail: Some("no snapshot supplied".to_string()),
            ..Self::new(AuditEventKind::SystemSkipped, user, system)
        }
    }

    /// Event for a failed snapshot fetch.
    #[must_use]
    pub fn source_failed(user: &str, system: SystemName, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(AuditEventKind::SourceFailed, user, system)
        }
    }

    /// Event for a failed persistence call.
    #[must_use]
    pub fn persist_failed(
        user: &str,
        run_id: &RunId,
        system: SystemName,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            run_id: Some(run_id.clone()),
            detail: Some(detail.into()),
            ..Self::new(AuditEventKind::PersistFailed, user, system)
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditLog;

impl AuditLogSink for StderrAuditLog {
    fn record(&self, event: &AuditLogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditLog {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditLog {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditLogSink for FileAuditLog {
    fn record(&self, event: &AuditLogEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditLog;

impl AuditLogSink for NoopAuditLog {
    fn record(&self, _event: &AuditLogEvent) {}
}
