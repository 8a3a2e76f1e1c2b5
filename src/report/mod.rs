//! Rendering scan documents into verdicts.
//!
//! - [`verdict`] - Compact single-line verdicts for the mail filter
//! - [`verbose`] - Human-readable traces and category counts
//! - [`processor`] - The processing entry point that ties everything together
//! - [`config`] - Processing options

pub mod config;
pub mod processor;
pub mod verbose;
pub mod verdict;

pub use config::ProcessOptions;
pub use processor::{Processor, RunSummary};
pub use verdict::{RatingResult, Verdict, CLEAN_BELOW, VIRUS_AT};
