//! Command implementations for the Lexis CLI.

use std::fs;

use crate::benchmark::{self, BenchmarkConfig, BenchmarkReport};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{LexisConfig, MAX_WORD_LEN};
use crate::dictionary::Dictionary;
use crate::error::{LexisError, Result};
use crate::loader::{self, SessionSource};
use crate::record::WordRecord;
use crate::tree::IndexKind;

/// A loaded dictionary and the files it came from.
#[derive(Debug)]
pub struct Session {
    pub config: LexisConfig,
    pub dictionary: Dictionary,
    pub source: SessionSource,
}

impl Session {
    /// Build the dictionary from the files named in `config`.
    pub fn open(config: LexisConfig) -> Result<Self> {
        config.validate()?;
        let mut dictionary = Dictionary::with_config(&config);
        let source = loader::load_session(&config, &mut dictionary)?;
        log::debug!(
            "session ready: {} words, active index {}",
            dictionary.count(IndexKind::Bst),
            dictionary.active()
        );
        Ok(Session {
            config,
            dictionary,
            source,
        })
    }

    /// Index used for reads.
    pub fn active(&self) -> IndexKind {
        self.dictionary.active()
    }

    /// Write the dictionary to the session file.
    pub fn save(&self) -> Result<usize> {
        let path = &self.config.custom_words_file;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        loader::save_words(path, &self.dictionary)
    }
}

/// Execute a CLI command.
pub fn execute_command(args: LexisArgs) -> Result<()> {
    if let Command::Benchmark(benchmark_args) = &args.command {
        let report = run_benchmark(benchmark_args)?;
        return output_result(&report, &args);
    }

    let mut session = Session::open(args.resolve_config()?)?;
    let changed = match &args.command {
        Command::Lookup(lookup_args) => {
            output_result(&lookup(&session, lookup_args)?, &args)?;
            false
        }
        Command::Complete(complete_args) => {
            let result = complete(&mut session, complete_args)?;
            output_result(&result, &args)?;
            result.selected.is_some()
        }
        Command::List(list_args) => {
            output_result(&list(&session, list_args), &args)?;
            false
        }
        Command::Add(add_args) => {
            let result = add(&mut session, add_args)?;
            output_result(&result, &args)?;
            result.changed
        }
        Command::Remove(remove_args) => {
            let result = remove(&mut session, remove_args);
            output_result(&result, &args)?;
            result.changed
        }
        Command::Frequency(frequency_args) => {
            let result = set_frequency(&mut session, frequency_args);
            output_result(&result, &args)?;
            result.changed
        }
        Command::Stats => {
            output_result(&stats(&session), &args)?;
            false
        }
        Command::Check => {
            let result = check(&session);
            output_result(&result, &args)?;
            if let Some(message) = result.message {
                return Err(LexisError::consistency(message));
            }
            false
        }
        Command::Benchmark(_) => false,
    };

    if changed {
        session.save()?;
    }
    Ok(())
}

/// Look up one word in the active index.
pub fn lookup(session: &Session, args: &LookupArgs) -> Result<LookupResult> {
    let index = session.active();
    let record = session
        .dictionary
        .search(index, &args.word)
        .ok_or_else(|| LexisError::not_found(&args.word))?;
    Ok(LookupResult { index, record })
}

/// Rank completions of a prefix, optionally recording a pick of one of them.
pub fn complete(session: &mut Session, args: &CompleteArgs) -> Result<CompletionResult> {
    let index = session.active();
    let suggestions = session
        .dictionary
        .prefix_search(index, &args.prefix, args.limit);

    let selected = match args.select {
        None => None,
        Some(n) if n >= 1 && n <= suggestions.len() => {
            let word = suggestions[n - 1].word.clone();
            session.dictionary.record_selection(&word);
            Some(word)
        }
        Some(n) => {
            return Err(LexisError::invalid_argument(format!(
                "--select {} is out of range, {} suggestions shown",
                n,
                suggestions.len()
            )));
        }
    };

    Ok(CompletionResult {
        index,
        prefix: args.prefix.clone(),
        suggestions,
        selected,
    })
}

/// Every word of the active index in sorted order.
pub fn list(session: &Session, args: &ListArgs) -> ListResult {
    let index = session.active();
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut words = Vec::new();
    session.dictionary.traverse_sorted(index, |record| {
        if words.len() < limit {
            words.push(record.clone());
        }
    });
    ListResult {
        index,
        total: session.dictionary.count(index),
        height: session.dictionary.height(index),
        words,
    }
}

/// Add a word to all three trees.
pub fn add(session: &mut Session, args: &AddArgs) -> Result<MutationResult> {
    let word = args.word.trim();
    if word.is_empty() || word.len() >= MAX_WORD_LEN || word.contains('|') {
        return Err(LexisError::invalid_argument(format!(
            "'{}' is not a storable word (1 to {} bytes, no '|')",
            args.word,
            MAX_WORD_LEN - 1
        )));
    }

    let mut record = WordRecord::new(word)
        .with_meaning(&args.meaning)
        .with_part_of_speech(&args.pos);
    if let Some(frequency) = args.frequency {
        record = record.with_frequency(frequency);
    }
    let word = record.word.clone();
    let changed = session.dictionary.insert_all(record);
    if !changed {
        log::warn!("'{}' is already in the dictionary", word);
    }
    Ok(MutationResult {
        word,
        action: "add".to_string(),
        changed,
        total: session.dictionary.count(IndexKind::Bst),
    })
}

/// Remove a word from all three trees.
pub fn remove(session: &mut Session, args: &RemoveArgs) -> MutationResult {
    let changed = session.dictionary.delete_all(&args.word);
    MutationResult {
        word: args.word.to_ascii_lowercase(),
        action: "remove".to_string(),
        changed,
        total: session.dictionary.count(IndexKind::Bst),
    }
}

/// Set a word's frequency score in all three trees.
pub fn set_frequency(session: &mut Session, args: &FrequencyArgs) -> MutationResult {
    let changed = session.dictionary.update_frequency(&args.word, args.score);
    MutationResult {
        word: args.word.to_ascii_lowercase(),
        action: "frequency".to_string(),
        changed,
        total: session.dictionary.count(IndexKind::Bst),
    }
}

/// Sizes and heights of the three trees.
pub fn stats(session: &Session) -> DictionaryStats {
    let trees = IndexKind::ALL
        .iter()
        .map(|&index| TreeStats {
            index,
            count: session.dictionary.count(index),
            height: session.dictionary.height(index),
        })
        .collect();
    DictionaryStats {
        source: session.source.clone(),
        active: session.active(),
        trees,
    }
}

/// Compare the three trees.
pub fn check(session: &Session) -> CheckResult {
    let message = session
        .dictionary
        .check_consistency()
        .err()
        .map(|error| error.to_string());
    CheckResult {
        consistent: message.is_none(),
        words: session.dictionary.count(IndexKind::Bst),
        message,
    }
}

/// Time the three trees on synthetic data.
pub fn run_benchmark(args: &BenchmarkArgs) -> Result<BenchmarkReport> {
    let config = BenchmarkConfig {
        sizes: args.sizes.clone(),
        searches: args.searches,
        shuffle_seed: args.seed,
        ..Default::default()
    };
    benchmark::run_benchmark(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir, words: &str) -> Session {
        let words_file = dir.path().join("words.txt");
        let mut file = fs::File::create(&words_file).unwrap();
        file.write_all(words.as_bytes()).unwrap();

        let config = LexisConfig {
            words_file,
            frequency_file: dir.path().join("word_freq.txt"),
            custom_words_file: dir.path().join("session").join("custom_words.txt"),
            ..Default::default()
        };
        Session::open(config).unwrap()
    }

    #[test]
    fn test_open_falls_back_to_samples() {
        let dir = TempDir::new().unwrap();
        let config = LexisConfig {
            words_file: dir.path().join("missing.txt"),
            custom_words_file: dir.path().join("also_missing.txt"),
            ..Default::default()
        };
        let session = Session::open(config).unwrap();
        assert_eq!(session.source, SessionSource::Samples);
        assert_eq!(session.dictionary.count(IndexKind::Threaded), 15);
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir, "owl|noun|a night bird\n");
        let result = lookup(&session, &LookupArgs { word: "OWL".into() }).unwrap();
        assert_eq!(result.record.meaning, "a night bird");

        let error = lookup(&session, &LookupArgs { word: "emu".into() }).unwrap_err();
        assert_eq!(error.to_string(), "Error: Not found: emu");
    }

    #[test]
    fn test_complete_with_selection_then_save() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "cat|noun||10|0\ncar|noun||5|2\ndog|noun||99|0\n");

        let args = CompleteArgs {
            prefix: "ca".into(),
            limit: None,
            select: Some(2),
        };
        let result = complete(&mut session, &args).unwrap();
        let words: Vec<&str> = result.suggestions.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["car", "cat"]);
        assert_eq!(result.selected.as_deref(), Some("cat"));
        for kind in IndexKind::ALL {
            assert_eq!(session.dictionary.search(kind, "cat").unwrap().selection_count, 1);
        }

        assert_eq!(session.save().unwrap(), 3);
        let saved = fs::read_to_string(&session.config.custom_words_file).unwrap();
        assert_eq!(saved.lines().next(), Some("cat|noun||10|1"));
    }

    #[test]
    fn test_complete_rejects_bad_selection() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "cat\n");
        let args = CompleteArgs {
            prefix: "c".into(),
            limit: None,
            select: Some(2),
        };
        assert!(matches!(
            complete(&mut session, &args),
            Err(LexisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_remove_and_frequency() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "ant\n");

        let added = add(
            &mut session,
            &AddArgs {
                word: "Bee".into(),
                meaning: "buzzes".into(),
                pos: "noun".into(),
                frequency: Some(7),
            },
        )
        .unwrap();
        assert!(added.changed);
        assert_eq!(added.word, "bee");
        assert_eq!(added.total, 2);

        let again = add(
            &mut session,
            &AddArgs {
                word: "bee".into(),
                meaning: String::new(),
                pos: String::new(),
                frequency: None,
            },
        )
        .unwrap();
        assert!(!again.changed);

        assert!(add(
            &mut session,
            &AddArgs {
                word: "a|b".into(),
                meaning: String::new(),
                pos: String::new(),
                frequency: None,
            },
        )
        .is_err());

        let updated = set_frequency(
            &mut session,
            &FrequencyArgs {
                word: "BEE".into(),
                score: 40,
            },
        );
        assert!(updated.changed);
        assert_eq!(session.dictionary.search(IndexKind::Avl, "bee").unwrap().frequency_score, 40);

        let removed = remove(&mut session, &RemoveArgs { word: "ant".into() });
        assert!(removed.changed);
        assert_eq!(removed.total, 1);
        assert!(!remove(&mut session, &RemoveArgs { word: "ant".into() }).changed);
        assert!(check(&session).consistent);
    }

    #[test]
    fn test_session_file_is_restored_first() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "ant\nbee\n");
        add(
            &mut session,
            &AddArgs {
                word: "cow".into(),
                meaning: String::new(),
                pos: String::new(),
                frequency: None,
            },
        )
        .unwrap();
        session.save().unwrap();

        let reopened = Session::open(session.config.clone()).unwrap();
        assert_eq!(
            reopened.source,
            SessionSource::Session(session.config.custom_words_file.clone())
        );
        assert_eq!(reopened.dictionary.count(IndexKind::Bst), 3);
        assert_eq!(
            reopened.dictionary.height(IndexKind::Bst),
            session.dictionary.height(IndexKind::Bst)
        );
    }

    #[test]
    fn test_list_and_stats() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir, "ant\nbird\ncat\ndog\neel\n");
        let listed = list(&session, &ListArgs { limit: Some(2) });
        assert_eq!(listed.total, 5);
        assert_eq!(listed.height, 5);
        assert_eq!(listed.words.len(), 2);
        assert_eq!(listed.words[0].word, "ant");

        let stats = stats(&session);
        let heights: Vec<usize> = stats.trees.iter().map(|tree| tree.height).collect();
        assert_eq!(heights[0], 5);
        assert_eq!(heights[1], 3);
    }

    #[test]
    fn test_run_benchmark() {
        let args = BenchmarkArgs {
            sizes: vec![64],
            searches: 10,
            seed: 42,
        };
        let report = run_benchmark(&args).unwrap();
        assert_eq!(report.runs[0].size, 64);
        assert_eq!(report.runs[0].trees.len(), 3);
    }
}
