//! MemoryFilter - Tag constraints for list and search queries

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A conjunction of tag equality and tag negation constraints.
///
/// Constraints with an empty value are kept as written but ignored when the
/// filter is evaluated, so `by_tag("color", "")` behaves like no constraint.
/// A slice of filters passed to a query is OR'ed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryFilter {
    #[serde(default)]
    tags: BTreeSet<(String, String)>,
    #[serde(default)]
    not_tags: BTreeSet<(String, String)>,
}

impl MemoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to carry `value`
    pub fn by_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert((key.into(), value.into()));
        self
    }

    /// Exclude records where `key` carries `value`
    pub fn by_not_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.not_tags.insert((key.into(), value.into()));
        self
    }

    /// Equality constraints that take part in evaluation
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        effective(&self.tags)
    }

    /// Negative constraints that take part in evaluation
    pub fn not_tags(&self) -> impl Iterator<Item = (&str, &str)> {
        effective(&self.not_tags)
    }

    /// True when no constraint survives empty-value pruning
    pub fn is_empty(&self) -> bool {
        self.tags().next().is_none() && self.not_tags().next().is_none()
    }
}

fn effective(set: &BTreeSet<(String, String)>) -> impl Iterator<Item = (&str, &str)> {
    set.iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.as_str(), value.as_str()))
}
