//! Audit event types and emission functions.

use crate::core::{ReportError, ScanResult};
use crate::report::{RunSummary, Verdict};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for audit events.
pub trait AuditEvent: Serialize {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the timestamp of the event.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Audit event for a record that was decoded and scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Message identifier of the record.
    pub msg_id: String,

    /// Scanned file name.
    pub file_name: String,

    /// SHA-256 of the scanned file.
    pub sha256: String,

    /// Engine scan time in milliseconds.
    pub scan_time_ms: i64,

    /// The rendered verdict line.
    pub verdict: String,
}

impl RecordAuditEvent {
    /// Builds the event for a scored record.
    pub fn new(msg_id: &str, scan: &ScanResult, verdict: &Verdict) -> Self {
        Self {
            timestamp: Utc::now(),
            msg_id: msg_id.to_string(),
            file_name: scan.file_name.clone(),
            sha256: scan.sha256.clone(),
            scan_time_ms: scan.scan_time,
            verdict: verdict.to_string(),
        }
    }
}

impl AuditEvent for RecordAuditEvent {
    fn event_type(&self) -> &'static str {
        "record_processed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Emits an audit event for a scored record.
pub fn emit_record_processed(msg_id: &str, scan: &ScanResult, verdict: &Verdict) {
    let event = RecordAuditEvent::new(msg_id, scan, verdict);

    tracing::info!(
        target: "varist_ha::audit",
        event_type = event.event_type(),
        msg_id = %event.msg_id,
        file_name = %event.file_name,
        sha256 = %event.sha256,
        scan_time_ms = event.scan_time_ms,
        verdict = %event.verdict,
        "Record processed"
    );
}

/// Emits an audit event for a record that could not be decoded.
pub fn emit_record_rejected(msg_id: &str, error: &ReportError, body_len: usize) {
    tracing::warn!(
        target: "varist_ha::audit",
        event_type = "record_rejected",
        msg_id = %msg_id,
        reason = error.verdict_reason(),
        body_len,
        error = %error,
        "Record rejected"
    );
}

/// Emits an audit event at the end of a run.
pub fn emit_run_completed(summary: &RunSummary) {
    tracing::info!(
        target: "varist_ha::audit",
        event_type = "run_completed",
        records = summary.records,
        rejected = summary.rejected,
        "Run completed"
    );
}
