//! Multiset of contents to skip during resolution.

use std::collections::HashMap;

/// Contents already known from a previous pass, kept as a counted multiset.
/// Each matching reference consumes one occurrence, so repeats beyond the
/// recorded count are still extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    /// Remaining occurrences per content. Never holds a zero count.
    counts: HashMap<String, usize>,
}

impl ExclusionList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence of `content`.
    pub fn insert(&mut self, content: impl Into<String>) {
        let count = self.counts.entry(content.into()).or_default();
        *count = count.saturating_add(1);
    }

    /// Remove one occurrence of `content`. Returns whether one was present.
    pub fn consume(&mut self, content: &str) -> bool {
        let Some(count) = self.counts.get_mut(content) else {
            return false;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.counts.remove(content);
        }
        true
    }

    /// Remaining occurrences of `content`.
    pub fn count(&self, content: &str) -> usize {
        self.counts.get(content).copied().unwrap_or(0)
    }

    /// Total remaining occurrences across all contents.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    /// Whether every occurrence has been consumed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for content in iter {
            list.insert(content);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_one_occurrence_at_a_time() {
        let mut list: ExclusionList = ["Foo", "Foo", "Bar"].into_iter().collect();
        assert_eq!(list.len(), 3);
        assert!(list.consume("Foo"));
        assert_eq!(list.count("Foo"), 1);
        assert!(list.consume("Foo"));
        assert!(!list.consume("Foo"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn miss_leaves_list_untouched() {
        let mut list: ExclusionList = ["Foo"].into_iter().collect();
        assert!(!list.consume("foo"));
        assert_eq!(list.count("Foo"), 1);
    }

    #[test]
    fn emptied_list_reports_empty() {
        let mut list: ExclusionList = ["x"].into_iter().collect();
        list.consume("x");
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }
}
