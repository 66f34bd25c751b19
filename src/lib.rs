//! # Lexis
//!
//! An in-memory word dictionary kept in three ordered indexes at once: an
//! unbalanced binary search tree, an AVL tree and a threaded binary tree.
//!
//! ## Features
//!
//! - Insert, exact lookup, delete and sorted traversal on every index
//! - Stack-free inorder walks over the threaded tree
//! - Prefix autocomplete ranked by frequency and user picks
//! - Word list, frequency file and session persistence
//! - A benchmark comparing the three representations

pub mod autocomplete;
pub mod benchmark;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod loader;
pub mod record;
pub mod tree;

pub mod prelude {
    pub use crate::autocomplete::{PrefixSearchConfig, PrefixSearchEngine};
    pub use crate::config::LexisConfig;
    pub use crate::dictionary::{Dictionary, SharedDictionary};
    pub use crate::error::{LexisError, Result};
    pub use crate::record::WordRecord;
    pub use crate::tree::{AvlTree, BinarySearchTree, IndexKind, ThreadedTree, WordIndex};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
