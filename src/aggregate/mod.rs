//! Aggregation over decoded scan documents.
//!
//! - [`tree`] - Pre-order traversal, maximum rating, and detection collection
//! - [`tally`] - Cumulative indicator-category counts

pub mod tally;
pub mod tree;

pub use tally::CategoryTally;
pub use tree::{collect_detections, first_detected, max_rating, PreOrder, NO_DETECTIONS};
