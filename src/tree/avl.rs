//! AVL tree.
//!
//! Every node caches the height of its subtree. After an insert or delete
//! the nodes on the path back to the root are re-measured and, where the
//! balance factor leaves `-1..=1`, rotated back into shape. The recursive
//! helpers take the owned subtree root and hand back whichever node ends up
//! on top; callers always store the returned root.

use std::cmp::Ordering;

use crate::record::{WordRecord, normalize_key};
use crate::tree::walk::{self, BinaryNode};
use crate::tree::{IndexKind, WordIndex};

type Link = Option<Box<AvlNode>>;

#[derive(Debug)]
struct AvlNode {
    record: WordRecord,
    left: Link,
    right: Link,
    /// Height of the subtree rooted here; a leaf is 1.
    height: usize,
}

impl AvlNode {
    fn new(record: WordRecord) -> Self {
        AvlNode {
            record,
            left: None,
            right: None,
            height: 1,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    /// `height(left) - height(right)`.
    fn balance_factor(&self) -> isize {
        height_of(&self.left) as isize - height_of(&self.right) as isize
    }
}

impl BinaryNode for AvlNode {
    fn record(&self) -> &WordRecord {
        &self.record
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

fn height_of(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right(mut node: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left(mut node: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Refresh the cached height and restore the balance invariant at `node`.
fn rebalance(mut node: Box<AvlNode>) -> Box<AvlNode> {
    node.update_height();
    let factor = node.balance_factor();

    if factor > 1 {
        // left-right
        if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if factor < -1 {
        // right-left
        if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn insert_into(link: Link, record: WordRecord, inserted: &mut bool) -> Box<AvlNode> {
    let Some(mut node) = link else {
        *inserted = true;
        return Box::new(AvlNode::new(record));
    };
    match record.cmp_key(&node.record) {
        Ordering::Less => node.left = Some(insert_into(node.left.take(), record, inserted)),
        Ordering::Greater => node.right = Some(insert_into(node.right.take(), record, inserted)),
        Ordering::Equal => return node,
    }
    rebalance(node)
}

fn delete_from(link: Link, key: &str, deleted: &mut bool) -> Link {
    let mut node = link?;
    match key.cmp(node.record.word.as_str()) {
        Ordering::Less => node.left = delete_from(node.left.take(), key, deleted),
        Ordering::Greater => node.right = delete_from(node.right.take(), key, deleted),
        Ordering::Equal => {
            *deleted = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    let successor = min_record(&right).clone();
                    node.left = Some(left);
                    node.right = delete_from(Some(right), &successor.word, &mut false);
                    node.record = successor;
                }
            }
        }
    }
    Some(rebalance(node))
}

fn min_record(mut node: &AvlNode) -> &WordRecord {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    &node.record
}

/// A height-balanced binary search tree keyed by lowercased word.
#[derive(Debug, Default)]
pub struct AvlTree {
    root: Link,
}

impl AvlTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        AvlTree { root: None }
    }

    /// Insert a record, rebalancing on the way back up. Duplicates are
    /// ignored and `false` is returned.
    pub fn insert(&mut self, record: WordRecord) -> bool {
        let mut inserted = false;
        self.root = Some(insert_into(
            self.root.take(),
            record.normalized(),
            &mut inserted,
        ));
        inserted
    }

    /// Look up a record by key.
    pub fn search(&self, key: &str) -> Option<&WordRecord> {
        let key = normalize_key(key);
        walk::find(self.root.as_deref(), &key).map(|node| &node.record)
    }

    /// Look up a record by key for in-place updates.
    pub fn search_mut(&mut self, key: &str) -> Option<&mut WordRecord> {
        let key = normalize_key(key);
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.as_str().cmp(node.record.word.as_str()) {
                Ordering::Equal => return Some(&mut node.record),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    /// Remove a record by key, rebalancing on the way back up. Returns
    /// `false` if the key is absent.
    pub fn delete(&mut self, key: &str) -> bool {
        let key = normalize_key(key);
        let mut deleted = false;
        self.root = delete_from(self.root.take(), &key, &mut deleted);
        deleted
    }

    /// Visit every record in ascending key order.
    pub fn inorder<F: FnMut(&WordRecord)>(&self, mut visit: F) {
        walk::inorder(self.root.as_deref(), &mut visit);
    }

    /// Height of the tree, read from the root's cached value.
    pub fn height(&self) -> usize {
        height_of(&self.root)
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        walk::count(self.root.as_deref())
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Check the AVL invariant and the cached heights of every node.
    pub fn is_balanced(&self) -> bool {
        fn measure(link: &Link) -> Option<usize> {
            let Some(node) = link else { return Some(0) };
            let left = measure(&node.left)?;
            let right = measure(&node.right)?;
            let height = 1 + left.max(right);
            (left.abs_diff(right) <= 1 && node.height == height).then_some(height)
        }
        measure(&self.root).is_some()
    }
}

impl WordIndex for AvlTree {
    fn kind(&self) -> IndexKind {
        IndexKind::Avl
    }

    fn insert(&mut self, record: WordRecord) -> bool {
        AvlTree::insert(self, record)
    }

    fn search(&self, key: &str) -> Option<&WordRecord> {
        AvlTree::search(self, key)
    }

    fn search_mut(&mut self, key: &str) -> Option<&mut WordRecord> {
        AvlTree::search_mut(self, key)
    }

    fn delete(&mut self, key: &str) -> bool {
        AvlTree::delete(self, key)
    }

    fn for_each_sorted(&self, visit: &mut dyn FnMut(&WordRecord)) {
        walk::inorder(self.root.as_deref(), visit);
    }

    fn collect_prefix(&self, prefix: &str, limit: usize) -> Vec<WordRecord> {
        walk::collect_prefix(self.root.as_deref(), prefix, limit)
    }

    fn height(&self) -> usize {
        AvlTree::height(self)
    }

    fn count(&self) -> usize {
        AvlTree::count(self)
    }

    fn is_empty(&self) -> bool {
        AvlTree::is_empty(self)
    }

    fn clear(&mut self) {
        AvlTree::clear(self)
    }
}
