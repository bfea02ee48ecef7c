//! Query-facing wrapper around the range tree.
//!
//! [`RangeSet`] owns a frozen [`RangeTree`] and answers the one question
//! the system exists for: which topic paths does this call number fall
//! under. Classification failure is not an error — a call number nobody
//! can parse simply has no topics.

use std::collections::HashSet;

use crate::callnum::{CallNumber, EncodedKey};
use crate::range::{CallNumberRange, TopicPath};
use crate::tree::RangeTree;

/// A frozen, queryable set of call-number ranges.
#[derive(Debug, Default)]
pub struct RangeSet {
    tree: RangeTree,
}

impl RangeSet {
    /// Build the set from already-validated ranges.
    pub fn from_ranges(ranges: impl IntoIterator<Item = CallNumberRange>) -> Self {
        Self { tree: RangeTree::from_ranges(ranges) }
    }

    /// Topic paths for a raw call-number string, deduplicated.
    ///
    /// An unparseable input yields an empty collection rather than an
    /// error. Order is unspecified (first-seen in tree traversal).
    pub fn topics_for(&self, raw: &str) -> Vec<TopicPath> {
        match CallNumber::parse(raw) {
            Ok(cn) => self.topics_covering(cn.floor_key()),
            Err(_) => Vec::new(),
        }
    }

    /// Topic paths for an already-encoded key, deduplicated.
    pub fn topics_covering(&self, key: EncodedKey) -> Vec<TopicPath> {
        let mut seen = HashSet::new();
        let mut topics = Vec::new();
        for range in self.tree.query_covering(key) {
            if seen.insert(range.topic_path()) {
                topics.push(range.topic_path().clone());
            }
        }
        topics
    }

    /// Number of ranges in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the set holds no ranges.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Iterate the stored ranges in ascending begin order.
    pub fn iter(&self) -> crate::tree::Iter<'_> {
        self.tree.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(parts: &[&str]) -> TopicPath {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn set() -> RangeSet {
        RangeSet::from_ranges(vec![
            CallNumberRange::new("QA1", "QA100", topic(&["Science", "Mathematics"])),
            CallNumberRange::new("QA50", "QA75", topic(&["Science", "Computing"])),
            CallNumberRange::new("QA60", "QA70", topic(&["Science", "Computing"])),
        ])
    }

    #[test]
    fn collects_and_dedupes_topic_paths() {
        let set = set();
        let mut topics = set.topics_for("QA65");
        topics.sort();
        assert_eq!(
            topics,
            vec![topic(&["Science", "Computing"]), topic(&["Science", "Mathematics"])]
        );
    }

    #[test]
    fn miss_and_garbage_both_yield_empty() {
        let set = set();
        assert!(set.topics_for("QA150").is_empty());
        assert!(set.topics_for("###").is_empty());
        assert!(set.topics_for("").is_empty());
    }
}
