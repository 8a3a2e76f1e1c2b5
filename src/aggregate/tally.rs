//! Cumulative indicator-category counts.

use crate::core::{IndicatorCategory, ObjectNode};

use std::collections::HashMap;

/// Occurrence count per indicator category name.
///
/// Counts only ever grow. A tally lives as long as its owner; construct a
/// fresh one to start from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: HashMap<String, u64>,
}

impl CategoryTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts each category once per occurrence, duplicates included.
    pub fn record<'a>(&mut self, categories: impl IntoIterator<Item = &'a IndicatorCategory>) {
        for category in categories {
            *self.counts.entry(category.category.clone()).or_insert(0) += 1;
        }
    }

    /// Counts every category at every node of the tree, root included.
    pub fn record_tree(&mut self, root: &ObjectNode) {
        self.record(root.all_categories());
    }

    /// Returns the count for a category name.
    pub fn get(&self, category: &str) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Iterates over `(name, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Returns the number of distinct category names.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
