//! Per-post reaction aggregate: label -> count
//!
//! Zero entries are never stored. Decrementing a missing or zero label is a
//! no-op, so the aggregate can never go negative.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ReactionLabel;

/// Ordered mapping from reaction label to number of live reactions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionCounts(BTreeMap<String, i64>);

impl ReactionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a label; 0 when absent
    pub fn get(&self, label: &str) -> i64 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, label: &ReactionLabel) {
        *self.0.entry(label.as_str().to_owned()).or_insert(0) += 1;
    }

    /// Decrement with a floor at zero; the entry is removed when it reaches zero
    pub fn decrement(&mut self, label: &ReactionLabel) {
        if let Some(count) = self.0.get_mut(label.as_str()) {
            *count -= 1;
            if *count <= 0 {
                self.0.remove(label.as_str());
            }
        }
    }

    /// Move one count from `from` to `to`
    pub fn switch(&mut self, from: &ReactionLabel, to: &ReactionLabel) {
        self.decrement(from);
        self.increment(to);
    }

    /// Sum over all labels
    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl FromIterator<(String, i64)> for ReactionCounts {
    /// Build from (label, count) pairs, dropping non-positive counts
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(_, count)| *count > 0).collect())
    }
}
