//! Augmented balanced search tree over call-number ranges.
//!
//! [`RangeTree`] is an AVL tree keyed by range begin (ties broken by end),
//! where every node also carries the maximum range end in its subtree. The
//! augmentation turns "which ranges cover this key" — a stabbing query —
//! into an O(log n) descent instead of a linear scan.
//!
//! Built once per data load and read-only afterward; the serving path
//! never mutates a node, which is what makes unsynchronized concurrent
//! reads safe.

mod node;

use crate::callnum::EncodedKey;
use crate::range::CallNumberRange;

use node::Node;

/// An augmented interval tree holding [`CallNumberRange`] values.
#[derive(Debug, Default)]
pub struct RangeTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl RangeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Bulk-build from a collection of ranges. O(n log n).
    pub fn from_ranges(ranges: impl IntoIterator<Item = CallNumberRange>) -> Self {
        let mut tree = Self::new();
        for range in ranges {
            tree.insert(range);
        }
        tree
    }

    /// Insert one range. O(log n), including rebalancing.
    ///
    /// Only used while building; the tree is frozen before serving queries.
    pub fn insert(&mut self, range: CallNumberRange) {
        self.root = Some(node::insert(self.root.take(), range));
        self.len += 1;
    }

    /// All ranges whose interval covers `key` (a stabbing query).
    ///
    /// Result order is unspecified; callers deduplicate by topic path.
    pub fn query_covering(&self, key: EncodedKey) -> Vec<&CallNumberRange> {
        let mut out = Vec::new();
        if let Some(root) = self.root.as_deref() {
            node::collect_covering(root, key, &mut out);
        }
        out
    }

    /// Number of ranges stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no ranges.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// In-order iterator over the stored ranges (ascending by begin).
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Walk the whole tree checking the BST ordering, AVL balance, and
    /// `max_end` invariants. Used by unit and property tests after builds.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        fn check(node: &Node) -> (i32, EncodedKey) {
            let mut max_end = node.range.end();
            if let Some(left) = node.left.as_deref() {
                assert!(
                    Node::sort_key(&left.range) <= Node::sort_key(&node.range),
                    "left child out of order"
                );
                let (_, left_max) = check(left);
                max_end = max_end.max(left_max);
            }
            if let Some(right) = node.right.as_deref() {
                assert!(
                    Node::sort_key(&right.range) >= Node::sort_key(&node.range),
                    "right child out of order"
                );
                let (_, right_max) = check(right);
                max_end = max_end.max(right_max);
            }
            let balance = node.balance_factor();
            assert!((-1..=1).contains(&balance), "unbalanced node: {balance}");
            assert_eq!(node.max_end, max_end, "stale max_end");
            (node.height, max_end)
        }
        if let Some(root) = self.root.as_deref() {
            check(root);
        }
    }
}

/// In-order borrowing iterator returned by [`RangeTree::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CallNumberRange;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.range)
    }
}

impl<'a> IntoIterator for &'a RangeTree {
    type Item = &'a CallNumberRange;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
