//! Structured audit logging.
//!
//! This module provides functions for emitting structured audit events
//! using the `tracing` crate under the `varist_ha::audit` target. Events can
//! be captured by any tracing subscriber for later review of what verdicts
//! were handed to the mail filter.

mod events;

pub use events::{
    emit_record_processed, emit_record_rejected, emit_run_completed, AuditEvent,
    RecordAuditEvent,
};
