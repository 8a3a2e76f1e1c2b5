//! # varist-ha
//!
//! Turns Varist hybrid-analyzer scan responses into verdict lines for a mail
//! filter.
//!
//! ## Overview
//!
//! The analyzer answers each scanned mail with a JSON document describing a
//! tree of objects (the mail, its attachments, archive members, ...), each
//! with a rating and indicator categories. This crate:
//!
//! - Splits a response log into `msgid=<id>:` records
//! - Decodes each record leniently into a typed scan document
//! - Aggregates the worst rating and the detections across the whole tree
//! - Renders one machine-parsable verdict line per record, or a verbose trace
//! - Counts indicator categories across a run
//!
//! ## Quick Start
//!
//! ```rust
//! use varist_ha::{ProcessOptions, Processor};
//!
//! let log = "msgid=1234:\n{}\n";
//! let mut out = Vec::new();
//!
//! let mut processor = Processor::new();
//! processor
//!     .process_stream(log.as_bytes(), &mut out, &ProcessOptions::default())
//!     .unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "Varist-RC=0 Rating=\"\" Result=HA-CLEAN Detections=none\n"
//! );
//! ```
//!
//! ## Features
//!
//! - `default` - Includes the analyzer client
//! - `analyzer` - HTTP analyzer client, response log, and the `varist-scan` binary
//!
//! ## Architecture
//!
//! - **Core**: Records, the scan document model, and error types
//! - **Aggregate**: Tree traversal, maximum rating, detections, category tally
//! - **Report**: Verdict lines, verbose traces, and the `Processor`
//! - **Audit**: Structured `tracing` events per record and per run
//! - **Analyzer**: The single-mail HTTP collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod audit;
pub mod core;
pub mod report;

#[cfg(feature = "analyzer")]
pub mod analyzer;

// Re-export commonly used types at the crate root
pub use crate::core::{
    ClientError, Indicator, IndicatorCategory, ObjectNode, Record, RecordSplitter, ReportError,
    ScanResult,
};

pub use crate::aggregate::{collect_detections, max_rating, CategoryTally};
pub use crate::report::{ProcessOptions, Processor, RatingResult, RunSummary, Verdict};

/// Prelude module for convenient imports.
///
/// ```rust
/// use varist_ha::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregate::{collect_detections, max_rating, CategoryTally};
    pub use crate::core::{
        ClientError, Indicator, IndicatorCategory, ObjectNode, Record, RecordSplitter,
        ReportError, ScanResult,
    };
    pub use crate::report::{ProcessOptions, Processor, RatingResult, RunSummary, Verdict};

    #[cfg(feature = "analyzer")]
    pub use crate::analyzer::{Analyzer, AnalyzerConfig, HttpAnalyzer, ResponseLog};
}
