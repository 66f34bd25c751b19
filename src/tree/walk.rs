//! Stack-based walks shared by the boxed binary trees.
//!
//! None of these recurse. The explicit stacks live on the heap and grow with
//! the length of a left spine at most, so a fully skewed tree of any size is
//! walked without touching the call stack.

use std::cmp::Ordering;

use crate::record::{WordRecord, compare_prefix};

/// Read access to a node of a boxed binary tree.
pub(crate) trait BinaryNode: Sized {
    fn record(&self) -> &WordRecord;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;
}

/// Descend to the node holding `key`.
pub(crate) fn find<'a, N: BinaryNode>(mut current: Option<&'a N>, key: &str) -> Option<&'a N> {
    while let Some(node) = current {
        current = match key.cmp(node.record().word.as_str()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.left(),
            Ordering::Greater => node.right(),
        };
    }
    None
}

pub(crate) fn inorder<N: BinaryNode>(root: Option<&N>, visit: &mut dyn FnMut(&WordRecord)) {
    let mut stack: Vec<&N> = Vec::new();
    let mut current = root;
    loop {
        while let Some(node) = current {
            stack.push(node);
            current = node.left();
        }
        let Some(node) = stack.pop() else { break };
        visit(node.record());
        current = node.right();
    }
}

pub(crate) fn preorder<N: BinaryNode>(root: Option<&N>, visit: &mut dyn FnMut(&WordRecord)) {
    let mut stack: Vec<&N> = root.into_iter().collect();
    while let Some(node) = stack.pop() {
        visit(node.record());
        if let Some(right) = node.right() {
            stack.push(right);
        }
        if let Some(left) = node.left() {
            stack.push(left);
        }
    }
}

pub(crate) fn count<N: BinaryNode>(root: Option<&N>) -> usize {
    let mut total = 0;
    inorder(root, &mut |_| total += 1);
    total
}

pub(crate) fn height<N: BinaryNode>(root: Option<&N>) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&N, usize)> = root.into_iter().map(|node| (node, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        if let Some(right) = node.right() {
            stack.push((right, depth + 1));
        }
        if let Some(left) = node.left() {
            stack.push((left, depth + 1));
        }
    }
    deepest
}

/// Pruned inorder walk collecting keys that start with `prefix`.
///
/// A node whose key sorts after the prefix range only has candidates on its
/// left, one that sorts before it only on its right. Matching nodes are
/// stacked and emitted after their left subtree, which keeps the output in
/// key order.
pub(crate) fn collect_prefix<N: BinaryNode>(
    root: Option<&N>,
    prefix: &str,
    limit: usize,
) -> Vec<WordRecord> {
    let mut matches = Vec::new();
    let mut stack: Vec<&N> = Vec::new();
    let mut current = root;
    while matches.len() < limit {
        while let Some(node) = current {
            current = match compare_prefix(&node.record().word, prefix) {
                Ordering::Greater => node.left(),
                Ordering::Less => node.right(),
                Ordering::Equal => {
                    stack.push(node);
                    node.left()
                }
            };
        }
        let Some(node) = stack.pop() else { break };
        matches.push(node.record().clone());
        current = node.right();
    }
    matches
}
