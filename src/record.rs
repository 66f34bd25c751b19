//! The word record stored at every index node.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::{FREQ_SCORE_DEFAULT, MAX_MEANING_LEN, MAX_POS_LEN, MAX_WORD_LEN};

/// Weight of one user selection in the composite ranking score.
pub const SELECTION_WEIGHT: u64 = 10;

/// A dictionary entry.
///
/// The `word` field is the ordering key. It is always stored ASCII-lowercased
/// and truncated to `MAX_WORD_LEN - 1` bytes; the original casing is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Lowercased key.
    pub word: String,
    /// Human-readable definition.
    #[serde(default)]
    pub meaning: String,
    /// Part-of-speech tag such as "noun" or "verb".
    #[serde(default)]
    pub part_of_speech: String,
    /// Corpus frequency.
    #[serde(default = "default_frequency")]
    pub frequency_score: u32,
    /// Number of times a user picked this word from a suggestion list.
    #[serde(default)]
    pub selection_count: u32,
}

fn default_frequency() -> u32 {
    FREQ_SCORE_DEFAULT
}

impl Default for WordRecord {
    fn default() -> Self {
        WordRecord::new("")
    }
}

impl WordRecord {
    /// Create a record with an empty definition and the default frequency.
    pub fn new(word: &str) -> Self {
        WordRecord {
            word: normalize_key(word),
            meaning: String::new(),
            part_of_speech: String::new(),
            frequency_score: FREQ_SCORE_DEFAULT,
            selection_count: 0,
        }
    }

    /// Set the definition, truncated to the meaning limit.
    pub fn with_meaning(mut self, meaning: &str) -> Self {
        self.meaning = truncate_to(meaning, MAX_MEANING_LEN - 1).to_string();
        self
    }

    /// Set the part-of-speech tag, truncated to the tag limit.
    pub fn with_part_of_speech(mut self, pos: &str) -> Self {
        self.part_of_speech = truncate_to(pos, MAX_POS_LEN - 1).to_string();
        self
    }

    /// Set the frequency score.
    pub fn with_frequency(mut self, frequency_score: u32) -> Self {
        self.frequency_score = frequency_score;
        self
    }

    /// Set the selection count.
    pub fn with_selections(mut self, selection_count: u32) -> Self {
        self.selection_count = selection_count;
        self
    }

    /// Re-apply key normalization and field limits. Indexes call this on every
    /// record they receive so that hand-built records obey the same bounds.
    pub fn normalized(mut self) -> Self {
        self.word = normalize_key(&self.word);
        if self.meaning.len() >= MAX_MEANING_LEN {
            self.meaning = truncate_to(&self.meaning, MAX_MEANING_LEN - 1).to_string();
        }
        if self.part_of_speech.len() >= MAX_POS_LEN {
            self.part_of_speech = truncate_to(&self.part_of_speech, MAX_POS_LEN - 1).to_string();
        }
        self
    }

    /// Ranking value used by prefix search: `frequency + 10 * selections`.
    pub fn composite_score(&self) -> u64 {
        u64::from(self.frequency_score) + SELECTION_WEIGHT * u64::from(self.selection_count)
    }

    /// Compare two records by key.
    pub fn cmp_key(&self, other: &WordRecord) -> Ordering {
        self.word.as_bytes().cmp(other.word.as_bytes())
    }
}

/// Lowercase ASCII letters and cut the key to `MAX_WORD_LEN - 1` bytes.
/// Non-ASCII characters are left as they are.
pub fn normalize_key(word: &str) -> String {
    truncate_to(word, MAX_WORD_LEN - 1).to_ascii_lowercase()
}

/// Compare the first `prefix.len()` bytes of `word` with `prefix`, the way a
/// bounded `strncmp` does. `Equal` means `word` starts with `prefix`.
pub fn compare_prefix(word: &str, prefix: &str) -> Ordering {
    let word = word.as_bytes();
    let prefix = prefix.as_bytes();
    let head = &word[..word.len().min(prefix.len())];
    head.cmp(prefix)
}

fn truncate_to(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_normalized() {
        let record = WordRecord::new("HeLLo");
        assert_eq!(record.word, "hello");
        assert_eq!(record.frequency_score, FREQ_SCORE_DEFAULT);
        assert_eq!(record.selection_count, 0);
        assert!(record.meaning.is_empty());
    }

    #[test]
    fn test_key_is_truncated() {
        let long = "A".repeat(100);
        let record = WordRecord::new(&long);
        assert_eq!(record.word.len(), MAX_WORD_LEN - 1);
        assert!(record.word.chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = format!("{}é", "x".repeat(MAX_POS_LEN - 2));
        let record = WordRecord::new("word").with_part_of_speech(&text);
        assert_eq!(record.part_of_speech, "x".repeat(MAX_POS_LEN - 2));
    }

    #[test]
    fn test_composite_score() {
        let record = WordRecord::new("car").with_frequency(5).with_selections(2);
        assert_eq!(record.composite_score(), 25);

        let record = WordRecord::new("max")
            .with_frequency(u32::MAX)
            .with_selections(u32::MAX);
        assert_eq!(
            record.composite_score(),
            u64::from(u32::MAX) * 11,
        );
    }

    #[test]
    fn test_compare_prefix() {
        assert_eq!(compare_prefix("cat", "ca"), Ordering::Equal);
        assert_eq!(compare_prefix("ca", "ca"), Ordering::Equal);
        assert_eq!(compare_prefix("c", "ca"), Ordering::Less);
        assert_eq!(compare_prefix("bat", "ca"), Ordering::Less);
        assert_eq!(compare_prefix("dog", "ca"), Ordering::Greater);
        assert_eq!(compare_prefix("cb", "ca"), Ordering::Greater);
    }

    #[test]
    fn test_serde_defaults() {
        let record: WordRecord = serde_json::from_str(r#"{ "word": "tree" }"#).unwrap();
        assert_eq!(record.word, "tree");
        assert_eq!(record.frequency_score, FREQ_SCORE_DEFAULT);
        assert_eq!(record.selection_count, 0);
    }
}
