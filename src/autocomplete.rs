//! Prefix search ranked by composite score.
//!
//! Each index enumerates its own matches through
//! [`WordIndex::collect_prefix`]: the boxed trees prune their walk with
//! bounded prefix comparisons, the threaded tree seeks the lower bound and
//! follows successor threads. The engine here only caps the candidate set
//! and ranks it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::{LexisConfig, MAX_CANDIDATES, TOP_K_DEFAULT, TOP_K_MAX};
use crate::record::WordRecord;
use crate::tree::WordIndex;

/// Limits applied to a prefix search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixSearchConfig {
    /// Results returned when the caller does not ask for a count.
    pub default_top_k: usize,
    /// Ceiling for any requested count.
    pub max_top_k: usize,
    /// Candidates collected before ranking.
    pub max_candidates: usize,
}

impl Default for PrefixSearchConfig {
    fn default() -> Self {
        PrefixSearchConfig {
            default_top_k: TOP_K_DEFAULT,
            max_top_k: TOP_K_MAX,
            max_candidates: MAX_CANDIDATES,
        }
    }
}

impl From<&LexisConfig> for PrefixSearchConfig {
    fn from(config: &LexisConfig) -> Self {
        PrefixSearchConfig {
            default_top_k: config.default_top_k,
            max_top_k: config.max_top_k,
            max_candidates: config.max_candidates,
        }
    }
}

/// Ranks the words of any [`WordIndex`] that start with a prefix.
#[derive(Debug, Clone, Default)]
pub struct PrefixSearchEngine {
    config: PrefixSearchConfig,
}

impl PrefixSearchEngine {
    /// Create an engine with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom limits.
    pub fn with_config(config: PrefixSearchConfig) -> Self {
        PrefixSearchEngine { config }
    }

    /// Current limits.
    pub fn config(&self) -> &PrefixSearchConfig {
        &self.config
    }

    /// Up to `top_k` records whose key starts with `prefix`, best first.
    ///
    /// `top_k` of `None` uses the configured default; any request is
    /// clamped to `1..=max_top_k`. An empty prefix matches nothing.
    pub fn search(
        &self,
        index: &dyn WordIndex,
        prefix: &str,
        top_k: Option<usize>,
    ) -> Vec<WordRecord> {
        let top_k = top_k
            .unwrap_or(self.config.default_top_k)
            .clamp(1, self.config.max_top_k.max(1));
        prefix_search(index, prefix, top_k, self.config.max_candidates)
    }
}

/// Collect at most `max_candidates` keys starting with `prefix` from `index`,
/// rank them and keep the best `top_k`.
pub fn prefix_search(
    index: &dyn WordIndex,
    prefix: &str,
    top_k: usize,
    max_candidates: usize,
) -> Vec<WordRecord> {
    // Not truncated: a prefix longer than any stored key matches nothing.
    let prefix = prefix.to_ascii_lowercase();
    if prefix.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let mut candidates = index.collect_prefix(&prefix, max_candidates);
    log::debug!(
        "prefix '{}' on {}: {} candidates",
        prefix,
        index.kind(),
        candidates.len()
    );
    rank(&mut candidates);
    candidates.truncate(top_k);
    candidates
}

/// Sort by descending composite score, then ascending key.
pub fn rank(records: &mut [WordRecord]) {
    records.sort_by(compare_rank);
}

fn compare_rank(a: &WordRecord, b: &WordRecord) -> Ordering {
    b.composite_score()
        .cmp(&a.composite_score())
        .then_with(|| a.cmp_key(b))
}

/// Count one user pick of `key` in each index that holds it. Returns how
/// many indexes were updated.
pub fn record_selection(indexes: &mut [&mut dyn WordIndex], key: &str) -> usize {
    let mut updated = 0;
    for index in indexes.iter_mut() {
        if let Some(record) = index.search_mut(key) {
            record.selection_count = record.selection_count.saturating_add(1);
            updated += 1;
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_WORD_LEN;
    use crate::tree::{AvlTree, BinarySearchTree, ThreadedTree};

    fn sample() -> Vec<WordRecord> {
        vec![
            WordRecord::new("cat").with_frequency(10),
            WordRecord::new("car").with_frequency(5).with_selections(2),
            WordRecord::new("dog").with_frequency(99),
        ]
    }

    fn indexes() -> Vec<Box<dyn WordIndex>> {
        let mut indexes: Vec<Box<dyn WordIndex>> = vec![
            Box::new(BinarySearchTree::new()),
            Box::new(AvlTree::new()),
            Box::new(ThreadedTree::new()),
        ];
        for index in indexes.iter_mut() {
            for record in sample() {
                index.insert(record);
            }
        }
        indexes
    }

    fn words(records: &[WordRecord]) -> Vec<&str> {
        records.iter().map(|record| record.word.as_str()).collect()
    }

    #[test]
    fn test_selection_bonus_outranks_frequency() {
        for index in indexes() {
            let results = prefix_search(index.as_ref(), "CA", 5, MAX_CANDIDATES);
            assert_eq!(words(&results), vec!["car", "cat"], "{}", index.kind());
            assert_eq!(results[0].composite_score(), 25);
            assert_eq!(results[1].composite_score(), 10);
        }
    }

    #[test]
    fn test_empty_prefix_and_no_match() {
        for index in indexes() {
            assert!(prefix_search(index.as_ref(), "", 5, MAX_CANDIDATES).is_empty());
            assert!(prefix_search(index.as_ref(), "zebra", 5, MAX_CANDIDATES).is_empty());
        }
    }

    #[test]
    fn test_prefix_longer_than_any_key_matches_nothing() {
        let longest = "q".repeat(MAX_WORD_LEN - 1);
        let mut tree = ThreadedTree::new();
        tree.insert(WordRecord::new(&longest));
        let mut bst = BinarySearchTree::new();
        bst.insert(WordRecord::new(&longest));
        let indexes: [&dyn WordIndex; 2] = [&tree, &bst];

        for index in indexes {
            let exact = prefix_search(index, &longest.to_uppercase(), 5, MAX_CANDIDATES);
            assert_eq!(words(&exact), vec![longest.as_str()]);
            let overlong = format!("{longest}q");
            assert!(prefix_search(index, &overlong, 5, MAX_CANDIDATES).is_empty());
        }
    }

    #[test]
    fn test_top_k_truncates() {
        for index in indexes() {
            let results = prefix_search(index.as_ref(), "c", 1, MAX_CANDIDATES);
            assert_eq!(words(&results), vec!["car"]);
        }
    }

    #[test]
    fn test_ties_break_by_key() {
        let mut records = vec![
            WordRecord::new("bee").with_frequency(3),
            WordRecord::new("ant").with_frequency(3),
            WordRecord::new("cow").with_frequency(4),
        ];
        rank(&mut records);
        assert_eq!(words(&records), vec!["cow", "ant", "bee"]);
    }

    #[test]
    fn test_candidate_cap_bounds_collection() {
        let mut tree = ThreadedTree::new();
        for i in 0..50 {
            tree.insert(WordRecord::new(&format!("pre{i:02}")).with_frequency(i));
        }
        // Only the first 10 keys in order are considered.
        let results = prefix_search(&tree, "pre", 3, 10);
        assert_eq!(words(&results), vec!["pre09", "pre08", "pre07"]);
    }

    #[test]
    fn test_engine_clamps_top_k() {
        let mut tree = AvlTree::new();
        for i in 0..80 {
            tree.insert(WordRecord::new(&format!("x{i:02}")));
        }
        let engine = PrefixSearchEngine::new();
        assert_eq!(engine.search(&tree, "x", None).len(), TOP_K_DEFAULT);
        assert_eq!(engine.search(&tree, "x", Some(500)).len(), TOP_K_MAX);
        assert_eq!(engine.search(&tree, "x", Some(0)).len(), 1);
    }

    #[test]
    fn test_record_selection_updates_every_index() {
        let mut bst = BinarySearchTree::new();
        let mut avl = AvlTree::new();
        let mut tbt = ThreadedTree::new();
        for record in sample() {
            bst.insert(record.clone());
            avl.insert(record.clone());
            tbt.insert(record);
        }

        {
            let mut all: [&mut dyn WordIndex; 3] = [&mut bst, &mut avl, &mut tbt];
            assert_eq!(record_selection(&mut all, "Cat"), 3);
            assert_eq!(record_selection(&mut all, "emu"), 0);
        }
        assert_eq!(bst.search("cat").unwrap().selection_count, 1);
        assert_eq!(avl.search("cat").unwrap().selection_count, 1);
        assert_eq!(tbt.search("cat").unwrap().selection_count, 1);

    }
}
