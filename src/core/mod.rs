//! Core types for the varist-ha library.
//!
//! This module provides the fundamental building blocks used throughout
//! the library:
//!
//! - [`types`] - The scan document model (`ScanResult`, `ObjectNode`, ...)
//! - [`record`] - Splitting a response log into records
//! - [`error`] - Structured error types

pub mod error;
pub mod record;
pub mod types;

// Re-export commonly used types at the core level
pub use error::{ClientError, ClientResult, ReportError, ReportResult};
pub use record::{parse_sentinel, Record, RecordSplitter, SENTINEL_PREFIX};
pub use types::{
    Content, Indicator, IndicatorCategory, MailHeader, MailInfo, MetaData, ObjectNode,
    ScanResult, SummaryDescription,
};
