//! Unbalanced binary search tree.
//!
//! The baseline index. Lookups are O(log n) on random input and degrade to
//! O(n) when keys arrive sorted, in which case the tree is a single right
//! spine. Every operation here is iterative so that such a spine, even at
//! 100,000 nodes, never grows the call stack.

use std::cmp::Ordering;

use crate::record::{WordRecord, normalize_key};
use crate::tree::walk::{self, BinaryNode};
use crate::tree::{IndexKind, WordIndex};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    record: WordRecord,
    left: Link,
    right: Link,
}

impl Node {
    fn new(record: WordRecord) -> Self {
        Node {
            record,
            left: None,
            right: None,
        }
    }
}

impl BinaryNode for Node {
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

/// An unbalanced binary search tree keyed by lowercased word.
#[derive(Debug, Default)]
pub struct BinarySearchTree {
    root: Link,
}

impl BinarySearchTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        BinarySearchTree { root: None }
    }

    /// Insert a record. Duplicates are ignored and `false` is returned.
    pub fn insert(&mut self, record: WordRecord) -> bool {
        let record = record.normalized();
        let mut cursor = &mut self.root;
        while let Some(node) = cursor {
            cursor = match record.cmp_key(&node.record) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }
        *cursor = Some(Box::new(Node::new(record)));
        true
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

    /// Remove a record by key. Returns `false` if the key is absent.
    ///
    /// A leaf is dropped, a node with one child is replaced by that child, and
    /// a node with two children takes over its inorder successor's record
    /// before the successor is unlinked from the right subtree.
    pub fn delete(&mut self, key: &str) -> bool {
        let key = normalize_key(key);
        let mut cursor = &mut self.root;
        loop {
            let ordering = match cursor.as_deref() {
                Some(node) => key.as_str().cmp(node.record.word.as_str()),
                None => return false,
            };
            if ordering == Ordering::Equal {
                break;
            }
            let Some(node) = cursor else { return false };
            cursor = if ordering == Ordering::Less {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        unlink(cursor);
        true
    }

    /// Visit every record in ascending key order.
    pub fn inorder<F: FnMut(&WordRecord)>(&self, mut visit: F) {
        walk::inorder(self.root.as_deref(), &mut visit);
    }

    /// Visit every record parent-first. Inserting the records back in this
    /// order rebuilds a tree of the same shape.
    pub fn preorder<F: FnMut(&WordRecord)>(&self, mut visit: F) {
        walk::preorder(self.root.as_deref(), &mut visit);
    }

    /// Records in preorder.
    pub fn preorder_records(&self) -> Vec<WordRecord> {
        let mut records = Vec::new();
        self.preorder(|record| records.push(record.clone()));
        records
    }

    /// Number of levels; 0 for an empty tree.
    pub fn height(&self) -> usize {
        walk::height(self.root.as_deref())
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
    ///
    /// Left children are rotated up until the current node has none, which
    /// turns the tree into a right-linked vine that is freed one node at a
    /// time with no auxiliary memory.
    pub fn clear(&mut self) {
        let mut current = self.root.take();
        while let Some(mut node) = current {
            current = match node.left.take() {
                Some(mut left) => {
                    node.left = left.right.take();
                    left.right = Some(node);
                    Some(left)
                }
                None => node.right.take(),
            };
        }
    }
}

impl Drop for BinarySearchTree {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Remove the node held in `slot`, which must be occupied.
fn unlink(slot: &mut Link) {
    let Some(mut node) = slot.take() else { return };
    *slot = match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            node.left = Some(left);
            node.right = Some(right);
            if let Some(successor) = take_min(&mut node.right) {
                node.record = successor;
            }
            Some(node)
        }
    };
}

/// Detach the leftmost node of the subtree in `slot`, splicing its right
/// child into its place, and return its record.
fn take_min(slot: &mut Link) -> Option<WordRecord> {
    let mut cursor = slot;
    while cursor.as_ref().is_some_and(|node| node.left.is_some()) {
        let Some(node) = cursor else { return None };
        cursor = &mut node.left;
    }
    let mut min = cursor.take()?;
    *cursor = min.right.take();
    Some(min.record)
}

impl WordIndex for BinarySearchTree {
    fn kind(&self) -> IndexKind {
        IndexKind::Bst
    }

    fn insert(&mut self, record: WordRecord) -> bool {
        BinarySearchTree::insert(self, record)
    }

    fn search(&self, key: &str) -> Option<&WordRecord> {
        BinarySearchTree::search(self, key)
    }

    fn search_mut(&mut self, key: &str) -> Option<&mut WordRecord> {
        BinarySearchTree::search_mut(self, key)
    }

    fn delete(&mut self, key: &str) -> bool {
        BinarySearchTree::delete(self, key)
    }

    fn for_each_sorted(&self, visit: &mut dyn FnMut(&WordRecord)) {
        walk::inorder(self.root.as_deref(), visit);
    }

    fn collect_prefix(&self, prefix: &str, limit: usize) -> Vec<WordRecord> {
        walk::collect_prefix(self.root.as_deref(), prefix, limit)
    }

    fn height(&self) -> usize {
        BinarySearchTree::height(self)
    }

    fn count(&self) -> usize {
        BinarySearchTree::count(self)
    }

    fn is_empty(&self) -> bool {
        BinarySearchTree::is_empty(self)
    }

    fn clear(&mut self) {
        BinarySearchTree::clear(self)
    }
}
