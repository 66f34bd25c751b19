//! The dictionary session: one word list replicated into three indexes.
//!
//! Every mutation goes to the BST, the AVL tree and the threaded tree
//! together. Reads go to one of them, either named explicitly or the
//! session's active index.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::autocomplete::{self, PrefixSearchConfig, PrefixSearchEngine};
use crate::config::LexisConfig;
use crate::error::{LexisError, Result};
use crate::record::{WordRecord, normalize_key};
use crate::tree::{AvlTree, BinarySearchTree, IndexKind, ThreadedTree, WordIndex};

/// Three synchronized word indexes and the selector for reads.
#[derive(Debug, Default)]
pub struct Dictionary {
    bst: BinarySearchTree,
    avl: AvlTree,
    threaded: ThreadedTree,
    active: IndexKind,
    engine: PrefixSearchEngine,
}

impl Dictionary {
    /// Create an empty dictionary reading from the BST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dictionary using the limits and active index of `config`.
    pub fn with_config(config: &LexisConfig) -> Self {
        Dictionary {
            active: config.active_index,
            engine: PrefixSearchEngine::with_config(PrefixSearchConfig::from(config)),
            ..Default::default()
        }
    }

    /// Index used when a read does not name one.
    pub fn active(&self) -> IndexKind {
        self.active
    }

    /// Switch the index used for reads.
    pub fn set_active(&mut self, kind: IndexKind) {
        log::debug!("active index {} -> {}", self.active, kind);
        self.active = kind;
    }

    /// Borrow one index.
    pub fn index(&self, kind: IndexKind) -> &dyn WordIndex {
        match kind {
            IndexKind::Bst => &self.bst,
            IndexKind::Avl => &self.avl,
            IndexKind::Threaded => &self.threaded,
        }
    }

    /// The unbalanced tree. Exposed for its preorder walk, which the loader
    /// uses to save a file that reloads into the same shape.
    pub fn bst(&self) -> &BinarySearchTree {
        &self.bst
    }

    /// The AVL tree.
    pub fn avl(&self) -> &AvlTree {
        &self.avl
    }

    /// The threaded tree.
    pub fn threaded(&self) -> &ThreadedTree {
        &self.threaded
    }

    fn indexes_mut(&mut self) -> [&mut dyn WordIndex; 3] {
        [&mut self.bst, &mut self.avl, &mut self.threaded]
    }

    /// Insert a record into all three indexes. Returns `false` if the key was
    /// already present, in which case nothing changes.
    pub fn insert_all(&mut self, record: WordRecord) -> bool {
        let record = record.normalized();
        if record.word.is_empty() {
            return false;
        }
        if self.bst.search(&record.word).is_some() {
            log::debug!("duplicate '{}' skipped", record.word);
            return false;
        }
        let word = record.word.clone();
        let inserted = [
            self.bst.insert(record.clone()),
            self.avl.insert(record.clone()),
            self.threaded.insert(record),
        ];
        debug_assert!(
            inserted.iter().all(|&ok| ok),
            "'{word}' inserted into only some indexes: {inserted:?}"
        );
        inserted[0]
    }

    /// Remove a key from all three indexes. Returns `false` if it was absent.
    pub fn delete_all(&mut self, key: &str) -> bool {
        let removed = self.indexes_mut().map(|index| index.delete(key));
        debug_assert!(
            removed.iter().all(|&ok| ok == removed[0]),
            "'{key}' removed from only some indexes: {removed:?}"
        );
        removed.iter().any(|&ok| ok)
    }

    /// Set the frequency score of `key` in every index holding it. Returns
    /// `false` if no index holds it.
    pub fn update_frequency(&mut self, key: &str, score: u32) -> bool {
        let mut updated = false;
        for index in self.indexes_mut() {
            if let Some(record) = index.search_mut(key) {
                record.frequency_score = score;
                updated = true;
            }
        }
        updated
    }

    /// Look up `key` in the selected index.
    pub fn search(&self, kind: IndexKind, key: &str) -> Option<WordRecord> {
        self.index(kind).search(key).cloned()
    }

    /// Look up `key` in the active index.
    pub fn lookup(&self, key: &str) -> Option<WordRecord> {
        self.search(self.active, key)
    }

    /// Visit every record of the selected index in ascending key order.
    pub fn traverse_sorted<F: FnMut(&WordRecord)>(&self, kind: IndexKind, mut visit: F) {
        self.index(kind).for_each_sorted(&mut visit);
    }

    /// Ranked prefix search over the selected index. `top_k` of `None` uses the
    /// configured default.
    pub fn prefix_search(
        &self,
        kind: IndexKind,
        prefix: &str,
        top_k: Option<usize>,
    ) -> Vec<WordRecord> {
        self.engine.search(self.index(kind), prefix, top_k)
    }

    /// Count one user pick of `key` in every index. Returns the number of
    /// indexes updated: 3 when present, 0 when absent.
    pub fn record_selection(&mut self, key: &str) -> usize {
        let mut indexes = self.indexes_mut();
        let updated = autocomplete::record_selection(&mut indexes, key);
        if updated != 0 && updated != indexes.len() {
            log::warn!(
                "selection of '{}' reached {} of {} indexes",
                normalize_key(key),
                updated,
                indexes.len()
            );
        }
        updated
    }

    /// Height of the selected index.
    pub fn height(&self, kind: IndexKind) -> usize {
        self.index(kind).height()
    }

    /// Record count of the selected index.
    pub fn count(&self, kind: IndexKind) -> usize {
        self.index(kind).count()
    }

    /// Whether the dictionary holds no records.
    pub fn is_empty(&self) -> bool {
        self.bst.is_empty()
    }

    /// Remove every record from all three indexes.
    pub fn clear(&mut self) {
        for index in self.indexes_mut() {
            index.clear();
        }
    }

    /// Compare the three indexes record by record. Any difference in
    /// membership, order or field values is reported as a
    /// [`LexisError::Consistency`].
    pub fn check_consistency(&self) -> Result<()> {
        let reference = self.bst.sorted_records();
        for kind in [IndexKind::Avl, IndexKind::Threaded] {
            let other = self.index(kind).sorted_records();
            if other.len() != reference.len() {
                return Err(LexisError::consistency(format!(
                    "bst holds {} records, {} holds {}",
                    reference.len(),
                    kind,
                    other.len()
                )));
            }
            if let Some((expected, found)) = reference
                .iter()
                .zip(other.iter())
                .find(|(expected, found)| expected != found)
            {
                return Err(LexisError::consistency(format!(
                    "bst has '{}' where {} has '{}'",
                    expected.word, kind, found.word
                )));
            }
        }
        if !self.avl.is_balanced() {
            return Err(LexisError::consistency("avl tree is out of balance"));
        }
        if !self.threaded.threads_are_consistent() {
            return Err(LexisError::consistency("threaded tree links are broken"));
        }
        Ok(())
    }
}

/// A [`Dictionary`] behind a single lock, for callers that share a session
/// across threads. Each method holds the lock for the whole multi-index
/// operation.
#[derive(Debug, Clone, Default)]
pub struct SharedDictionary {
    inner: Arc<Mutex<Dictionary>>,
}

impl SharedDictionary {
    /// Wrap an existing dictionary.
    pub fn new(dictionary: Dictionary) -> Self {
        SharedDictionary {
            inner: Arc::new(Mutex::new(dictionary)),
        }
    }

    /// Run `f` with exclusive access to the dictionary.
    pub fn with<R>(&self, f: impl FnOnce(&mut Dictionary) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    pub fn insert_all(&self, record: WordRecord) -> bool {
        self.with(|dictionary| dictionary.insert_all(record))
    }

    pub fn delete_all(&self, key: &str) -> bool {
        self.with(|dictionary| dictionary.delete_all(key))
    }

    pub fn update_frequency(&self, key: &str, score: u32) -> bool {
        self.with(|dictionary| dictionary.update_frequency(key, score))
    }

    pub fn record_selection(&self, key: &str) -> usize {
        self.with(|dictionary| dictionary.record_selection(key))
    }

    pub fn search(&self, kind: IndexKind, key: &str) -> Option<WordRecord> {
        self.with(|dictionary| dictionary.search(kind, key))
    }

    pub fn prefix_search(
        &self,
        kind: IndexKind,
        prefix: &str,
        top_k: Option<usize>,
    ) -> Vec<WordRecord> {
        self.with(|dictionary| dictionary.prefix_search(kind, prefix, top_k))
    }

    pub fn count(&self, kind: IndexKind) -> usize {
        self.with(|dictionary| dictionary.count(kind))
    }
}
