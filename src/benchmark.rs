//! Side-by-side timing of the three indexes.
//!
//! Each run builds a fresh BST, AVL tree and threaded tree from the same
//! shuffled synthetic word list and times bulk insertion, a fixed sequence of
//! random lookups and a full sorted traversal.

use std::hint::black_box;
use std::time::Instant;

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{LexisError, Result};
use crate::record::WordRecord;
use crate::tree::{AvlTree, BinarySearchTree, IndexKind, ThreadedTree, WordIndex};

/// Parameters of a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Dataset sizes, one trial each.
    pub sizes: Vec<usize>,
    /// Lookups per tree per trial.
    pub searches: usize,
    /// Seed for the insertion-order shuffle.
    pub shuffle_seed: u64,
    /// Seed for the lookup sequence. Every tree sees the same sequence.
    pub search_seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![500, 2000, 5000],
            searches: 1000,
            shuffle_seed: 42,
            search_seed: 99,
        }
    }
}

/// Measurements for one tree in one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeTiming {
    pub kind: IndexKind,
    pub insert_ms: f64,
    pub height: usize,
    pub search_ms: f64,
    /// Lookups that found their key. Equal to the lookup count on a correct run.
    pub hits: usize,
    pub traverse_ms: f64,
}

/// One trial: all three trees at one dataset size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    pub size: usize,
    pub trees: Vec<TreeTiming>,
}

/// Results of a full benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub config: BenchmarkConfig,
    pub runs: Vec<SizeReport>,
}

/// Synthetic key for the 0-based position `i`: `wd00001`, `wd00002`, ...
pub fn synthetic_word(i: usize) -> String {
    format!("wd{:05}", i + 1)
}

/// `n` distinct records with frequency `1 + i % 100`, shuffled with `seed`.
pub fn generate_words(n: usize, seed: u64) -> Vec<WordRecord> {
    let mut words: Vec<WordRecord> = (0..n)
        .map(|i| {
            WordRecord::new(&synthetic_word(i))
                .with_part_of_speech("noun")
                .with_frequency(1 + (i % 100) as u32)
        })
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    words.shuffle(&mut rng);
    words
}

/// Lookup keys drawn uniformly from the dataset.
fn search_keys(n: usize, count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| synthetic_word(rng.random_range(0..n)))
        .collect()
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn measure(index: &mut dyn WordIndex, words: &[WordRecord], keys: &[String]) -> TreeTiming {
    let start = Instant::now();
    for record in words {
        index.insert(record.clone());
    }
    let insert_ms = elapsed_ms(start);
    let height = index.height();

    let start = Instant::now();
    let hits = keys
        .iter()
        .filter(|key| black_box(index.search(key)).is_some())
        .count();
    let search_ms = elapsed_ms(start);

    let start = Instant::now();
    let mut visited = 0usize;
    index.for_each_sorted(&mut |record| {
        black_box(record);
        visited += 1;
    });
    let traverse_ms = elapsed_ms(start);
    debug_assert_eq!(visited, words.len());

    TreeTiming {
        kind: index.kind(),
        insert_ms,
        height,
        search_ms,
        hits,
        traverse_ms,
    }
}

/// Run one trial at dataset size `n`.
pub fn run_size(n: usize, config: &BenchmarkConfig) -> Result<SizeReport> {
    if n == 0 {
        return Err(LexisError::invalid_argument("benchmark size must be positive"));
    }
    let words = generate_words(n, config.shuffle_seed);
    let keys = search_keys(n, config.searches, config.search_seed);

    let mut indexes: [Box<dyn WordIndex>; 3] = [
        Box::new(BinarySearchTree::new()),
        Box::new(AvlTree::new()),
        Box::new(ThreadedTree::new()),
    ];
    let trees = indexes
        .iter_mut()
        .map(|index| measure(index.as_mut(), &words, &keys))
        .collect();

    log::debug!("benchmark trial n={} done", n);
    Ok(SizeReport { size: n, trees })
}

/// Run every configured trial.
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    let runs = config
        .sizes
        .iter()
        .map(|&n| run_size(n, config))
        .collect::<Result<Vec<_>>>()?;
    Ok(BenchmarkReport {
        config: config.clone(),
        runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_words_is_reproducible() {
        let a = generate_words(200, 42);
        let b = generate_words(200, 42);
        assert_eq!(a, b);
        assert_ne!(a, generate_words(200, 7));

        let mut keys: Vec<&str> = a.iter().map(|record| record.word.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 200);
        assert_eq!(keys[0], "wd00001");
        assert_eq!(keys[199], "wd00200");
    }

    #[test]
    fn test_frequencies_follow_position() {
        let words = generate_words(150, 1);
        let wd101 = words.iter().find(|record| record.word == "wd00101").unwrap();
        assert_eq!(wd101.frequency_score, 1);
        let wd100 = words.iter().find(|record| record.word == "wd00100").unwrap();
        assert_eq!(wd100.frequency_score, 100);
    }

    #[test]
    fn test_run_benchmark_small() {
        let config = BenchmarkConfig {
            sizes: vec![50, 300],
            searches: 100,
            ..Default::default()
        };
        let report = run_benchmark(&config).unwrap();
        assert_eq!(report.runs.len(), 2);
        for run in &report.runs {
            let kinds: Vec<IndexKind> = run.trees.iter().map(|tree| tree.kind).collect();
            assert_eq!(kinds, IndexKind::ALL.to_vec());
            for tree in &run.trees {
                assert_eq!(tree.hits, 100);
            }
            let avl = &run.trees[1];
            let bst = &run.trees[0];
            assert!(avl.height <= bst.height);
        }
        assert!(serde_json::to_string(&report).unwrap().contains("\"avl\""));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let config = BenchmarkConfig {
            sizes: vec![0],
            ..Default::default()
        };
        assert!(run_benchmark(&config).is_err());
    }
}
