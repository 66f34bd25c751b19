//! Word list and frequency file I/O.
//!
//! Word files hold one entry per line in one of four shapes:
//!
//! ```text
//! word
//! word|pos
//! word|pos|meaning
//! word|pos|meaning|freq|picks
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Frequency files hold
//! `word,score` lines. Saved files use the five-field shape.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{FREQ_SCORE_DEFAULT, FREQ_SCORE_MAX, LexisConfig, MAX_WORD_LEN};
use crate::dictionary::Dictionary;
use crate::error::{LexisError, Result};
use crate::record::WordRecord;

/// Summary of one [`load_words`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Lines that parsed into a record.
    pub parsed: usize,
    /// Records whose key was new.
    pub inserted: usize,
    /// Records whose key was already present; the stored record is kept.
    pub duplicates: usize,
    /// Non-comment lines that were rejected.
    pub skipped: usize,
}

/// Parse one word-file line. Returns `None` for blank lines, comments, empty
/// words and words too long to store.
pub fn parse_word_line(line: &str) -> Option<WordRecord> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.splitn(5, '|').map(str::trim);
    let word = fields.next()?;
    if word.is_empty() || word.len() >= MAX_WORD_LEN {
        return None;
    }

    let mut record = WordRecord::new(word);
    if let Some(pos) = fields.next() {
        record = record.with_part_of_speech(pos);
    }
    if let Some(meaning) = fields.next() {
        record = record.with_meaning(meaning);
    }
    if let Some(freq) = fields.next().and_then(positive) {
        record.frequency_score = freq;
    }
    if let Some(picks) = fields.next().and_then(positive) {
        record.selection_count = picks;
    }
    Some(record)
}

fn positive(field: &str) -> Option<u32> {
    let value = leading_integer(field)?;
    (value > 0).then(|| value.min(u32::MAX as i64) as u32)
}

/// Read an optional sign and the digits that follow it, ignoring any trailing
/// text, so `12abc` reads as 12. Returns `None` when no digit is present.
fn leading_integer(field: &str) -> Option<i64> {
    let field = field.trim_start();
    let (negative, digits) = match field.as_bytes().first() {
        Some(b'-') => (true, &field[1..]),
        Some(b'+') => (false, &field[1..]),
        _ => (false, field),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

fn is_ignorable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Insert every record read from `reader` into all three indexes.
pub fn read_words<R: BufRead>(reader: R, dictionary: &mut Dictionary) -> Result<LoadStats> {
    let mut stats = LoadStats::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if is_ignorable(&line) {
            continue;
        }
        let Some(record) = parse_word_line(&line) else {
            stats.skipped += 1;
            log::warn!("{}", LexisError::parse(number + 1, "empty or oversized word"));
            continue;
        };
        stats.parsed += 1;
        if dictionary.insert_all(record) {
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }
    }

    Ok(stats)
}

/// Load a word file into all three indexes.
pub fn load_words<P: AsRef<Path>>(path: P, dictionary: &mut Dictionary) -> Result<LoadStats> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let stats = read_words(BufReader::new(file), dictionary)?;
    log::info!(
        "loaded {} words from {} ({} duplicates, {} skipped)",
        stats.inserted,
        path.display(),
        stats.duplicates,
        stats.skipped
    );
    Ok(stats)
}

/// Parse a frequency score. Missing, non-numeric and non-positive values map
/// to the default; large values are capped.
pub fn parse_score(field: &str) -> u32 {
    match leading_integer(field) {
        Some(score) if score > 0 => score.min(FREQ_SCORE_MAX as i64) as u32,
        _ => FREQ_SCORE_DEFAULT,
    }
}

/// Apply `word,score` lines from `reader`. Returns the number of words found
/// in the dictionary and updated.
pub fn read_frequencies<R: BufRead>(reader: R, dictionary: &mut Dictionary) -> Result<usize> {
    let mut updated = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if is_ignorable(&line) {
            continue;
        }
        let Some((word, score)) = line.split_once(',') else {
            log::warn!("{}", LexisError::parse(number + 1, "expected word,score"));
            continue;
        };
        let (word, score) = (word.trim(), score.trim());
        if word.is_empty() || score.is_empty() {
            continue;
        }
        if dictionary.update_frequency(word, parse_score(score)) {
            updated += 1;
        }
    }

    Ok(updated)
}

/// Apply a frequency file to words already in the dictionary.
pub fn load_frequencies<P: AsRef<Path>>(path: P, dictionary: &mut Dictionary) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let updated = read_frequencies(BufReader::new(file), dictionary)?;
    log::info!("applied {} frequency scores from {}", updated, path.display());
    Ok(updated)
}

/// Write every record in five-field form, in BST preorder. Reloading the file
/// rebuilds a BST of the same shape.
pub fn write_words<W: Write>(writer: &mut W, dictionary: &Dictionary) -> Result<usize> {
    let mut written = 0;
    for record in dictionary.bst().preorder_records() {
        writeln!(
            writer,
            "{}|{}|{}|{}|{}",
            record.word,
            field(&record.part_of_speech),
            field(&record.meaning),
            record.frequency_score,
            record.selection_count
        )?;
        written += 1;
    }
    Ok(written)
}

/// Save the dictionary to `path`, replacing any existing file.
pub fn save_words<P: AsRef<Path>>(path: P, dictionary: &Dictionary) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_words(&mut writer, dictionary)?;
    writer.flush()?;
    log::info!("saved {} words to {}", written, path.display());
    Ok(written)
}

/// Separators and line breaks inside a field would split it on reload.
fn field(text: &str) -> String {
    text.replace(['|', '\n', '\r'], " ")
}

/// A small built-in vocabulary, used when no word file is available.
pub fn sample_records() -> Vec<WordRecord> {
    const SAMPLES: [(&str, &str, u32); 15] = [
        ("mango", "A tropical fruit with sweet orange flesh", 85),
        ("apple", "A round fruit, typically red or green", 95),
        ("zebra", "An African mammal with black and white stripes", 40),
        ("cat", "A small domesticated carnivorous mammal", 90),
        ("dog", "A domesticated carnivorous mammal", 92),
        ("banana", "A long curved yellow tropical fruit", 88),
        ("orange", "A citrus fruit with bright orange skin", 83),
        ("grape", "A small sweet berry growing in clusters", 70),
        ("kite", "A toy flown in the wind on a long string", 55),
        ("igloo", "A dome-shaped shelter made of ice blocks", 35),
        ("lemon", "A sour yellow citrus fruit", 75),
        ("notebook", "A book with blank pages for writing notes", 60),
        ("jungle", "A tropical forest with dense vegetation", 50),
        ("fish", "A cold-blooded aquatic vertebrate animal", 80),
        ("elephant", "The largest land animal, with a long trunk", 65),
    ];

    SAMPLES
        .iter()
        .map(|&(word, meaning, frequency)| {
            WordRecord::new(word)
                .with_meaning(meaning)
                .with_part_of_speech("noun")
                .with_frequency(frequency)
        })
        .collect()
}

/// Insert [`sample_records`] into all three indexes. Returns how many were new.
pub fn load_samples(dictionary: &mut Dictionary) -> usize {
    let inserted = sample_records()
        .into_iter()
        .filter(|record| dictionary.insert_all(record.clone()))
        .count();
    log::info!("loaded {} sample words", inserted);
    inserted
}

/// Where [`load_session`] found its words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSource {
    /// The saved session file, which carries selection counts.
    Session(PathBuf),
    /// The canonical word list.
    Words(PathBuf),
    /// Neither file had any words; the built-in samples were used.
    Samples,
}

/// Fill an empty dictionary for a new session.
///
/// The saved session file is tried first, then the word list, then the
/// built-in samples. Frequency scores are applied afterwards whenever a file
/// supplied the words and the frequency file exists.
pub fn load_session(config: &LexisConfig, dictionary: &mut Dictionary) -> Result<SessionSource> {
    let source = if load_if_present(&config.custom_words_file, dictionary)? {
        SessionSource::Session(config.custom_words_file.clone())
    } else if load_if_present(&config.words_file, dictionary)? {
        SessionSource::Words(config.words_file.clone())
    } else {
        log::warn!("no word file found, using the built-in sample words");
        load_samples(dictionary);
        return Ok(SessionSource::Samples);
    };

    if config.frequency_file.is_file() {
        load_frequencies(&config.frequency_file, dictionary)?;
    }
    Ok(source)
}

/// Load `path` if it exists. Returns whether it contributed any words.
fn load_if_present(path: &Path, dictionary: &mut Dictionary) -> Result<bool> {
    if !path.is_file() {
        log::debug!("{} not found", path.display());
        return Ok(false);
    }
    Ok(load_words(path, dictionary)?.inserted > 0)
}
