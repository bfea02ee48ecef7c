//! Tree nodes: AVL balancing plus the `max_end` augmentation.
//!
//! Every node tracks the maximum range end anywhere in its subtree. That
//! single extra word is what lets a stabbing query discard whole subtrees
//! in O(1). Rotations must refresh `max_end` for both nodes whose children
//! changed, demoted node first.

use crate::callnum::EncodedKey;
use crate::range::CallNumberRange;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) range: CallNumberRange,
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
    /// AVL height of the subtree rooted here (leaf = 1).
    pub(crate) height: i32,
    /// Maximum `range.end()` in this subtree.
    pub(crate) max_end: EncodedKey,
}

impl Node {
    pub(crate) fn leaf(range: CallNumberRange) -> Self {
        let max_end = range.end();
        Self { range, left: None, right: None, height: 1, max_end }
    }

    /// Insertion key: ranges sort by begin, ties broken by end.
    pub(crate) fn sort_key(range: &CallNumberRange) -> (EncodedKey, EncodedKey) {
        (range.begin(), range.end())
    }

    /// Recompute `height` and `max_end` from the children. Must be called
    /// on every node whose subtree changed, bottom-up.
    pub(crate) fn refresh(&mut self) {
        self.height = 1 + i32::max(height(&self.left), height(&self.right));
        let mut max_end = self.range.end();
        if let Some(left) = self.left.as_deref() {
            max_end = max_end.max(left.max_end);
        }
        if let Some(right) = self.right.as_deref() {
            max_end = max_end.max(right.max_end);
        }
        self.max_end = max_end;
    }

    /// Left height minus right height; positive means left-heavy.
    pub(crate) fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height(node: &Option<Box<Node>>) -> i32 {
    node.as_deref().map_or(0, |n| n.height)
}

/// Insert `range` below `node`, rebalancing on the way back up.
pub(crate) fn insert(node: Option<Box<Node>>, range: CallNumberRange) -> Box<Node> {
    let mut node = match node {
        None => return Box::new(Node::leaf(range)),
        Some(node) => node,
    };
    if Node::sort_key(&range) < Node::sort_key(&node.range) {
        node.left = Some(insert(node.left.take(), range));
    } else {
        node.right = Some(insert(node.right.take(), range));
    }
    node.refresh();
    rebalance(node)
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    let balance = node.balance_factor();
    if balance > 1 {
        let left = node.left.take().expect("left-heavy node must have a left child");
        node.left = if left.balance_factor() < 0 {
            Some(rotate_left(left))
        } else {
            Some(left)
        };
        rotate_right(node)
    } else if balance < -1 {
        let right = node.right.take().expect("right-heavy node must have a right child");
        node.right = if right.balance_factor() > 0 {
            Some(rotate_right(right))
        } else {
            Some(right)
        };
        rotate_left(node)
    } else {
        node
    }
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let mut pivot = node.right.take().expect("rotate_left requires a right child");
    node.right = pivot.left.take();
    node.refresh();
    pivot.left = Some(node);
    pivot.refresh();
    pivot
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let mut pivot = node.left.take().expect("rotate_right requires a left child");
    node.left = pivot.right.take();
    node.refresh();
    pivot.right = Some(node);
    pivot.refresh();
    pivot
}

/// Classic augmented-interval-tree stabbing descent.
///
/// The `max_end` bound prunes whole subtrees; the `begin <= key` bound cuts
/// off the right spine, since begins only grow to the right.
pub(crate) fn collect_covering<'a>(
    node: &'a Node,
    key: EncodedKey,
    out: &mut Vec<&'a CallNumberRange>,
) {
    if node.max_end < key {
        return;
    }
    if let Some(left) = node.left.as_deref() {
        if left.max_end >= key {
            collect_covering(left, key, out);
        }
    }
    if node.range.contains(key) {
        out.push(&node.range);
    }
    if node.range.begin() <= key {
        if let Some(right) = node.right.as_deref() {
            collect_covering(right, key, out);
        }
    }
}
