//! Traversal and aggregation over the object tree.
//!
//! All walks are pre-order (parent before children, children in document
//! order) and use an explicit stack, so tree depth never grows the call stack.

use crate::core::{IndicatorCategory, ObjectNode};

/// Placeholder reported when no `"Detected"` category exists.
pub const NO_DETECTIONS: &str = "none";

/// Pre-order iterator over an object tree.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<&'a ObjectNode>,
}

impl<'a> PreOrder<'a> {
    /// Walks `root` and all of its descendants.
    pub fn new(root: &'a ObjectNode) -> Self {
        Self { stack: vec![root] }
    }

    /// Walks every node in `nodes` and their descendants, in order.
    pub fn forest(nodes: &'a [ObjectNode]) -> Self {
        Self {
            stack: nodes.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ObjectNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl ObjectNode {
    /// Returns a pre-order iterator over this node and all descendants.
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }

    /// Returns the highest rating of this node and all descendants.
    pub fn max_rating(&self) -> f64 {
        max_rating(&self.children, self.rating)
    }

    /// Returns every indicator category in the tree, in document order.
    pub fn all_categories(&self) -> impl Iterator<Item = &IndicatorCategory> {
        self.walk().flat_map(|node| node.indicator_categories.iter())
    }
}

/// Returns the highest rating found in `nodes` and their descendants,
/// starting from `floor`.
///
/// Only a strictly greater rating replaces the current maximum.
pub fn max_rating(nodes: &[ObjectNode], floor: f64) -> f64 {
    PreOrder::forest(nodes).fold(floor, |max, node| {
        if node.rating > max {
            node.rating
        } else {
            max
        }
    })
}

/// Returns the first `"Detected"` category of the tree in document order.
pub fn first_detected(root: &ObjectNode) -> Option<&IndicatorCategory> {
    root.all_categories().find(|category| category.is_detected())
}

/// Formats the detections of the first `"Detected"` category.
///
/// Each indicator becomes `Type=<item> name=<info>`. Later `"Detected"`
/// categories are ignored. Returns `["none"]` when there is nothing to report.
pub fn collect_detections(root: &ObjectNode) -> Vec<String> {
    let detections: Vec<String> = first_detected(root)
        .map(|category| {
            category
                .indicators
                .iter()
                .map(|indicator| format!("Type={} name={}", indicator.item, indicator.info))
                .collect()
        })
        .unwrap_or_default();

    if detections.is_empty() {
        vec![NO_DETECTIONS.to_string()]
    } else {
        detections
    }
}
