//! Threaded binary tree.
//!
//! Nodes live in an arena and refer to each other by slot id. A child slot
//! that would be empty in a plain BST instead holds a thread: the left one
//! points at the inorder predecessor, the right one at the inorder
//! successor. Slot 0 is the header. Its left link holds the root (or a
//! thread to itself when the tree is empty) and its right link is always a
//! thread to itself, so walking successors from the smallest key ends back
//! at the header. That walk needs neither recursion nor a stack.
//!
//! Deletion rebuilds the tree from the surviving records instead of
//! re-threading around the removed node.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::record::{WordRecord, compare_prefix, normalize_key};
use crate::tree::{IndexKind, WordIndex};

type NodeId = usize;

const HEADER: NodeId = 0;

/// One side of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    /// Owning edge to a subtree.
    Child(NodeId),
    /// Non-owning pointer to the inorder neighbour on this side.
    Thread(NodeId),
}

impl Link {
    fn child(self) -> Option<NodeId> {
        match self {
            Link::Child(id) => Some(id),
            Link::Thread(_) => None,
        }
    }
}

#[derive(Debug)]
struct ThreadedNode {
    record: WordRecord,
    left: Link,
    right: Link,
}

impl ThreadedNode {
    fn header() -> Self {
        ThreadedNode {
            record: WordRecord::default(),
            left: Link::Thread(HEADER),
            right: Link::Thread(HEADER),
        }
    }
}

/// A right- and left-threaded binary search tree keyed by lowercased word.
#[derive(Debug)]
pub struct ThreadedTree {
    nodes: Vec<ThreadedNode>,
    /// Released slots available for reuse.
    vacant: Vec<NodeId>,
}

impl Default for ThreadedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadedTree {
    /// Create an empty tree: a header whose links both thread to itself.
    pub fn new() -> Self {
        ThreadedTree {
            nodes: vec![ThreadedNode::header()],
            vacant: Vec::new(),
        }
    }

    fn root(&self) -> Option<NodeId> {
        self.nodes[HEADER].left.child()
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Link::Child(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    /// Smallest node, or the header when the tree is empty.
    fn first(&self) -> NodeId {
        self.root().map_or(HEADER, |root| self.leftmost(root))
    }

    /// Inorder successor of `id`; the header follows the largest node.
    fn successor(&self, id: NodeId) -> NodeId {
        match self.nodes[id].right {
            Link::Thread(next) => next,
            Link::Child(right) => self.leftmost(right),
        }
    }

    fn allocate(&mut self, node: ThreadedNode) -> NodeId {
        match self.vacant.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, HEADER);
        self.nodes[id] = ThreadedNode::header();
        self.vacant.push(id);
    }

    /// Release every data node and reset the header to the empty state.
    /// Each node's successor is read before the node is released.
    fn release_all(&mut self) {
        let mut current = self.first();
        while current != HEADER {
            let next = self.successor(current);
            self.release(current);
            current = next;
        }
        self.nodes[HEADER].left = Link::Thread(HEADER);
    }

    /// Insert a record. Duplicates are ignored and `false` is returned.
    ///
    /// The new node takes over the parent's link on the side it is attached
    /// to (a thread to the neighbour beyond the parent), threads its other
    /// side back to the parent, and the parent's link becomes a real child.
    pub fn insert(&mut self, record: WordRecord) -> bool {
        let record = record.normalized();

        let mut parent = HEADER;
        let mut as_left = true;
        let mut current = self.root();
        while let Some(id) = current {
            let node = &self.nodes[id];
            parent = id;
            current = match record.cmp_key(&node.record) {
                Ordering::Equal => return false,
                Ordering::Less => {
                    as_left = true;
                    node.left.child()
                }
                Ordering::Greater => {
                    as_left = false;
                    node.right.child()
                }
            };
        }

        if as_left {
            let node = ThreadedNode {
                record,
                left: self.nodes[parent].left,
                right: Link::Thread(parent),
            };
            let id = self.allocate(node);
            self.nodes[parent].left = Link::Child(id);
        } else {
            let node = ThreadedNode {
                record,
                left: Link::Thread(parent),
                right: self.nodes[parent].right,
            };
            let id = self.allocate(node);
            self.nodes[parent].right = Link::Child(id);
        }
        true
    }

    fn find(&self, key: &str) -> Option<NodeId> {
        let mut current = self.root();
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = match key.cmp(node.record.word.as_str()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left.child(),
                Ordering::Greater => node.right.child(),
            };
        }
        None
    }

    /// Look up a record by key.
    pub fn search(&self, key: &str) -> Option<&WordRecord> {
        let key = normalize_key(key);
        self.find(&key).map(|id| &self.nodes[id].record)
    }

    /// Look up a record by key for in-place updates.
    pub fn search_mut(&mut self, key: &str) -> Option<&mut WordRecord> {
        let key = normalize_key(key);
        let id = self.find(&key)?;
        Some(&mut self.nodes[id].record)
    }

    /// Remove a record by key. Returns `false`, leaving the tree untouched, if
    /// the key is absent.
    ///
    /// The surviving records are collected in order, every node is released,
    /// and the records are inserted again. Reinsertion goes median-first over
    /// the sorted records so the rebuilt tree is balanced rather than a
    /// single right spine.
    pub fn delete(&mut self, key: &str) -> bool {
        let key = normalize_key(key);
        if self.find(&key).is_none() {
            return false;
        }

        let mut survivors: Vec<Option<WordRecord>> = Vec::with_capacity(self.count());
        let mut current = self.first();
        while current != HEADER {
            let record = &self.nodes[current].record;
            if record.word != key {
                survivors.push(Some(record.clone()));
            }
            current = self.successor(current);
        }

        self.release_all();
        for index in median_order(survivors.len()) {
            if let Some(record) = survivors[index].take() {
                self.insert(record);
            }
        }
        true
    }

    /// Iterate over the records in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            next: self.first(),
        }
    }

    /// Visit every record in ascending key order.
    pub fn inorder<F: FnMut(&WordRecord)>(&self, mut visit: F) {
        for record in self.iter() {
            visit(record);
        }
    }

    /// Number of levels; 0 for an empty tree. Threads are not followed.
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root().into_iter().map(|id| (id, 1)).collect();
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id];
            if let Some(right) = node.right.child() {
                stack.push((right, depth + 1));
            }
            if let Some(left) = node.left.child() {
                stack.push((left, depth + 1));
            }
        }
        deepest
    }

    /// Number of records, counted by walking the threads.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Release every node and return the arena to its initial size.
    pub fn clear(&mut self) {
        self.release_all();
        self.nodes.truncate(1);
        self.vacant.clear();
    }

    /// Collect keys starting with `prefix`: find the first key not below the
    /// prefix range, then follow successors until a key passes the range.
    pub fn collect_prefix(&self, prefix: &str, limit: usize) -> Vec<WordRecord> {
        let mut start = None;
        let mut current = self.root();
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = if compare_prefix(&node.record.word, prefix) == Ordering::Less {
                node.right.child()
            } else {
                start = Some(id);
                node.left.child()
            };
        }

        let mut matches = Vec::new();
        let Some(mut current) = start else {
            return matches;
        };
        while current != HEADER && matches.len() < limit {
            let record = &self.nodes[current].record;
            match compare_prefix(&record.word, prefix) {
                Ordering::Greater => break,
                Ordering::Equal => matches.push(record.clone()),
                Ordering::Less => {}
            }
            current = self.successor(current);
        }
        matches
    }

    /// Check every thread against the actual inorder sequence: a left thread
    /// must name the predecessor and a right thread the successor, with the
    /// header standing in at both ends. Also checks that every live arena
    /// slot is reachable.
    pub fn threads_are_consistent(&self) -> bool {
        if self.nodes[HEADER].right != Link::Thread(HEADER) {
            return false;
        }
        if self.root().is_none() && self.nodes[HEADER].left != Link::Thread(HEADER) {
            return false;
        }

        let mut order = vec![HEADER];
        let mut current = self.first();
        while current != HEADER {
            if order.len() > self.nodes.len() {
                return false;
            }
            order.push(current);
            current = self.successor(current);
        }
        order.push(HEADER);

        for window in order.windows(3) {
            let (prev, id, next) = (window[0], window[1], window[2]);
            let node = &self.nodes[id];
            if let Link::Thread(target) = node.left
                && target != prev
            {
                return false;
            }
            if let Link::Thread(target) = node.right
                && target != next
            {
                return false;
            }
        }

        order.len() - 2 == self.nodes.len() - 1 - self.vacant.len()
    }
}

/// Indices of a sorted slice of length `len`, ordered so that each range's
/// midpoint comes before the midpoints of its halves.
fn median_order(len: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(len);
    let mut ranges = VecDeque::from([(0, len)]);
    while let Some((start, end)) = ranges.pop_front() {
        if start >= end {
            continue;
        }
        let mid = start + (end - start) / 2;
        order.push(mid);
        ranges.push_back((start, mid));
        ranges.push_back((mid + 1, end));
    }
    order
}

/// Inorder iterator over a [`ThreadedTree`]. Holds only the next node id.
pub struct Iter<'a> {
    tree: &'a ThreadedTree,
    next: NodeId,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a WordRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == HEADER {
            return None;
        }
        let id = self.next;
        self.next = self.tree.successor(id);
        Some(&self.tree.nodes[id].record)
    }
}

impl<'a> IntoIterator for &'a ThreadedTree {
    type Item = &'a WordRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl WordIndex for ThreadedTree {
    fn kind(&self) -> IndexKind {
        IndexKind::Threaded
    }

    fn insert(&mut self, record: WordRecord) -> bool {
        ThreadedTree::insert(self, record)
    }

    fn search(&self, key: &str) -> Option<&WordRecord> {
        ThreadedTree::search(self, key)
    }

    fn search_mut(&mut self, key: &str) -> Option<&mut WordRecord> {
        ThreadedTree::search_mut(self, key)
    }

    fn delete(&mut self, key: &str) -> bool {
        ThreadedTree::delete(self, key)
    }

    fn for_each_sorted(&self, visit: &mut dyn FnMut(&WordRecord)) {
        for record in self.iter() {
            visit(record);
        }
    }

    fn collect_prefix(&self, prefix: &str, limit: usize) -> Vec<WordRecord> {
        ThreadedTree::collect_prefix(self, prefix, limit)
    }

    fn height(&self) -> usize {
        ThreadedTree::height(self)
    }

    fn count(&self) -> usize {
        ThreadedTree::count(self)
    }

    fn is_empty(&self) -> bool {
        ThreadedTree::is_empty(self)
    }

    fn clear(&mut self) {
        ThreadedTree::clear(self)
    }
}
