//! Hybrid analyzer client.
//!
//! The collaborator side of a single-mail scan: fetch the analysis over HTTP,
//! append it to the response log, and hand the body to the
//! [`Processor`](crate::report::Processor).
//!
//! - [`traits`] - The `Analyzer` trait
//! - [`http`] - The `reqwest` backend
//! - [`mock`] - A mock analyzer for tests
//! - [`config`] - INI-backed connection settings
//! - [`response_log`] - The append-only response log
//! - [`session`] - The analyze-log-report cycle

pub mod config;
pub mod http;
pub mod mock;
pub mod response_log;
pub mod session;
pub mod traits;

pub use config::AnalyzerConfig;
pub use http::HttpAnalyzer;
pub use mock::{MockAnalyzer, MockResponse};
pub use response_log::ResponseLog;
pub use session::{scan_and_report, ScanFailure, ScanRequest};
pub use traits::Analyzer;
