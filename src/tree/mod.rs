//! Ordered word indexes.
//!
//! Three representations share the [`WordIndex`] trait:
//!
//! - [`BinarySearchTree`]: unbalanced, shape follows insertion order.
//! - [`AvlTree`]: height-balanced through rotations.
//! - [`ThreadedTree`]: arena-backed tree whose empty child slots hold
//!   inorder threads, so it can be walked without a stack.
//!
//! Keys are compared as ASCII-lowercased byte strings. Every operation that
//! takes a key normalizes it first, so callers may pass any casing.

pub mod avl;
pub mod bst;
pub mod threaded;
pub(crate) mod walk;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::LexisError;
use crate::record::WordRecord;

pub use avl::AvlTree;
pub use bst::BinarySearchTree;
pub use threaded::ThreadedTree;

/// Selects one of the three index representations.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Unbalanced binary search tree
    #[default]
    Bst,
    /// AVL tree
    Avl,
    /// Threaded binary tree
    #[value(alias = "tbt")]
    #[serde(alias = "tbt")]
    Threaded,
}

impl IndexKind {
    /// All kinds, in the order mutations are applied.
    pub const ALL: [IndexKind; 3] = [IndexKind::Bst, IndexKind::Avl, IndexKind::Threaded];

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Bst => "bst",
            IndexKind::Avl => "avl",
            IndexKind::Threaded => "threaded",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for IndexKind {
    type Err = LexisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bst" => Ok(IndexKind::Bst),
            "avl" => Ok(IndexKind::Avl),
            "tbt" | "threaded" => Ok(IndexKind::Threaded),
            other => Err(LexisError::invalid_argument(format!(
                "unknown index kind '{other}'"
            ))),
        }
    }
}

/// Common interface of the three ordered indexes.
///
/// Misses and duplicates are reported through `Option` and `bool` rather
/// than errors.
pub trait WordIndex {
    /// Which representation backs this index.
    fn kind(&self) -> IndexKind;

    /// Insert a record. Returns `false` and leaves the stored record untouched
    /// if the key is already present.
    fn insert(&mut self, record: WordRecord) -> bool;

    /// Find the record stored under `key`.
    fn search(&self, key: &str) -> Option<&WordRecord>;

    /// Find the record stored under `key` for in-place updates.
    fn search_mut(&mut self, key: &str) -> Option<&mut WordRecord>;

    /// Remove the record stored under `key`. Returns `false` if absent.
    fn delete(&mut self, key: &str) -> bool;

    /// Visit every record in ascending key order.
    fn for_each_sorted(&self, visit: &mut dyn FnMut(&WordRecord));

    /// Collect records whose key starts with `prefix` (already lowercased), in
    /// ascending key order, stopping after `limit` matches.
    fn collect_prefix(&self, prefix: &str, limit: usize) -> Vec<WordRecord>;

    /// Number of levels; 0 for an empty index.
    fn height(&self) -> usize;

    /// Number of records.
    fn count(&self) -> usize;

    /// Whether the index holds no records.
    fn is_empty(&self) -> bool;

    /// Remove every record.
    fn clear(&mut self);

    /// All records in ascending key order.
    fn sorted_records(&self) -> Vec<WordRecord> {
        let mut records = Vec::new();
        self.for_each_sorted(&mut |record| records.push(record.clone()));
        records
    }

    /// All keys in ascending order.
    fn sorted_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.for_each_sorted(&mut |record| keys.push(record.word.clone()));
        keys
    }
}
