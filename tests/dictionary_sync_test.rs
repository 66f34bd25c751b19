use std::collections::BTreeMap;

use lexis::autocomplete::rank;
use lexis::dictionary::{Dictionary, SharedDictionary};
use lexis::record::WordRecord;
use lexis::tree::{AvlTree, IndexKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(String, u32),
    Delete(String),
    Select(String),
    Frequency(String, u32),
    Prefix(String, usize),
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    // A small alphabet so that operations collide on the same keys.
    "[a-e]{1,4}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        4 => (key.clone(), 1u32..200).prop_map(|(k, f)| Op::Insert(k, f)),
        2 => key.clone().prop_map(Op::Delete),
        1 => key.clone().prop_map(Op::Select),
        1 => (key.clone(), 1u32..200).prop_map(|(k, f)| Op::Frequency(k, f)),
        1 => ("[a-e]{1,2}", 1usize..8).prop_map(|(p, k)| Op::Prefix(p, k)),
    ];
    prop::collection::vec(op, 0..=300)
}

fn expected_prefix(model: &BTreeMap<String, WordRecord>, prefix: &str, top_k: usize) -> Vec<WordRecord> {
    let mut matches: Vec<WordRecord> = model
        .range(prefix.to_string()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(_, record)| record.clone())
        .collect();
    rank(&mut matches);
    matches.truncate(top_k);
    matches
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_indexes_match_model(ops in ops_strategy()) {
        let mut dictionary = Dictionary::new();
        let mut model: BTreeMap<String, WordRecord> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, frequency) => {
                    let record = WordRecord::new(&key).with_frequency(frequency);
                    let expected = !model.contains_key(&key);
                    if expected {
                        model.insert(key.clone(), record.clone());
                    }
                    prop_assert_eq!(dictionary.insert_all(record), expected);
                }
                Op::Delete(key) => {
                    let expected = model.remove(&key).is_some();
                    prop_assert_eq!(dictionary.delete_all(&key), expected);
                }
                Op::Select(key) => {
                    let expected = match model.get_mut(&key) {
                        Some(record) => {
                            record.selection_count += 1;
                            3
                        }
                        None => 0,
                    };
                    prop_assert_eq!(dictionary.record_selection(&key), expected);
                }
                Op::Frequency(key, score) => {
                    let expected = match model.get_mut(&key) {
                        Some(record) => {
                            record.frequency_score = score;
                            true
                        }
                        None => false,
                    };
                    prop_assert_eq!(dictionary.update_frequency(&key, score), expected);
                }
                Op::Prefix(prefix, top_k) => {
                    let expected = expected_prefix(&model, &prefix, top_k);
                    for kind in IndexKind::ALL {
                        prop_assert_eq!(
                            &dictionary.prefix_search(kind, &prefix, Some(top_k)),
                            &expected
                        );
                    }
                }
            }

            for kind in IndexKind::ALL {
                prop_assert_eq!(dictionary.count(kind), model.len());
            }
        }

        prop_assert!(dictionary.check_consistency().is_ok());
        let expected: Vec<WordRecord> = model.values().cloned().collect();
        for kind in IndexKind::ALL {
            prop_assert_eq!(dictionary.index(kind).sorted_records(), expected.clone());
            for (key, record) in &model {
                let found = dictionary.search(kind, key);
                prop_assert_eq!(found.as_ref(), Some(record));
            }
        }
    }

    #[test]
    fn prop_avl_height_is_logarithmic(keys in prop::collection::vec("[a-z]{1,6}", 0..400)) {
        let mut tree = AvlTree::new();
        for key in &keys {
            tree.insert(WordRecord::new(key));
        }
        prop_assert!(tree.is_balanced());
        let n = tree.count() as f64;
        let bound = 1.45 * (n + 2.0).log2();
        prop_assert!((tree.height() as f64) <= bound, "height {} for {} keys", tree.height(), n);
    }
}

#[test]
fn test_alphabetical_insertion_heights() {
    let mut dictionary = Dictionary::new();
    for word in ["ant", "bird", "cat", "dog", "eel"] {
        assert!(dictionary.insert_all(WordRecord::new(word)));
    }
    assert_eq!(dictionary.height(IndexKind::Bst), 5);
    assert_eq!(dictionary.height(IndexKind::Avl), 3);
    assert!(dictionary.check_consistency().is_ok());
}

#[test]
fn test_mixed_case_keys_are_one_word() {
    let mut dictionary = Dictionary::new();
    assert!(dictionary.insert_all(WordRecord::new("Apple").with_frequency(5)));
    assert!(!dictionary.insert_all(WordRecord::new("APPLE").with_frequency(9)));
    for kind in IndexKind::ALL {
        let record = dictionary.search(kind, "aPpLe").unwrap();
        assert_eq!(record.word, "apple");
        assert_eq!(record.frequency_score, 5);
    }
    assert!(dictionary.delete_all("APPLE"));
    assert!(dictionary.is_empty());
}

#[test]
fn test_prefix_ranking_example() {
    let mut dictionary = Dictionary::new();
    dictionary.insert_all(WordRecord::new("cat").with_frequency(10));
    dictionary.insert_all(WordRecord::new("car").with_frequency(5).with_selections(2));
    dictionary.insert_all(WordRecord::new("dog").with_frequency(99));

    for kind in IndexKind::ALL {
        let results = dictionary.prefix_search(kind, "ca", Some(5));
        let words: Vec<&str> = results.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["car", "cat"]);
        assert!(dictionary.prefix_search(kind, "", Some(5)).is_empty());
        assert!(dictionary.prefix_search(kind, "zebra", Some(5)).is_empty());
    }
}

#[test]
fn test_shared_dictionary_concurrent_mixed_operations() {
    let shared = SharedDictionary::new(Dictionary::new());
    for i in 0..100 {
        shared.insert_all(WordRecord::new(&format!("base{i:03}")));
    }

    let workers: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in (t..100).step_by(4) {
                    let key = format!("base{i:03}");
                    if i % 2 == 0 {
                        assert!(shared.delete_all(&key));
                    } else {
                        assert_eq!(shared.record_selection(&key), 3);
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    for kind in IndexKind::ALL {
        assert_eq!(shared.count(kind), 50);
        assert_eq!(shared.search(kind, "base001").unwrap().selection_count, 1);
    }
    assert!(shared.with(|dictionary| dictionary.check_consistency()).is_ok());
}
