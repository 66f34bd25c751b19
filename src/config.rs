//! Limits and runtime configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{LexisError, Result};
use crate::tree::IndexKind;

/// Maximum word length in bytes, including the terminator slot of the
/// on-disk format. Stored keys are at most `MAX_WORD_LEN - 1` bytes.
pub const MAX_WORD_LEN: usize = 64;

/// Maximum definition length in bytes, including the terminator slot.
pub const MAX_MEANING_LEN: usize = 512;

/// Maximum part-of-speech tag length in bytes, including the terminator slot.
pub const MAX_POS_LEN: usize = 32;

/// Default number of autocomplete results.
pub const TOP_K_DEFAULT: usize = 10;

/// Ceiling for the number of autocomplete results.
pub const TOP_K_MAX: usize = 50;

/// Hard cap on prefix-search candidates collected before ranking.
pub const MAX_CANDIDATES: usize = 512;

/// Frequency assigned when no corpus count is known.
pub const FREQ_SCORE_DEFAULT: u32 = 1;

/// Ceiling applied to frequency scores read from a frequency file.
pub const FREQ_SCORE_MAX: u32 = 100_000;

/// Runtime configuration for a dictionary session and its CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexisConfig {
    /// Number of autocomplete results when the caller does not ask for a count.
    pub default_top_k: usize,
    /// Upper bound applied to any requested result count.
    pub max_top_k: usize,
    /// Candidates collected per prefix search before ranking.
    pub max_candidates: usize,
    /// Index used for read operations.
    pub active_index: IndexKind,
    /// Word list loaded at startup.
    pub words_file: PathBuf,
    /// Optional `word,score` frequency file applied after loading.
    pub frequency_file: PathBuf,
    /// File the session is saved to.
    pub custom_words_file: PathBuf,
}

impl Default for LexisConfig {
    fn default() -> Self {
        LexisConfig {
            default_top_k: TOP_K_DEFAULT,
            max_top_k: TOP_K_MAX,
            max_candidates: MAX_CANDIDATES,
            active_index: IndexKind::Bst,
            words_file: PathBuf::from("data/words.txt"),
            frequency_file: PathBuf::from("data/word_freq.txt"),
            custom_words_file: PathBuf::from("data/custom_words.txt"),
        }
    }
}

impl LexisConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: LexisConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_top_k == 0 {
            return Err(LexisError::config("max_top_k must be at least 1"));
        }
        if self.default_top_k == 0 || self.default_top_k > self.max_top_k {
            return Err(LexisError::config(format!(
                "default_top_k must be within 1..={}, got {}",
                self.max_top_k, self.default_top_k
            )));
        }
        if self.max_candidates < self.max_top_k {
            return Err(LexisError::config(format!(
                "max_candidates ({}) must not be smaller than max_top_k ({})",
                self.max_candidates, self.max_top_k
            )));
        }
        Ok(())
    }

    /// Clamp a requested result count into `1..=max_top_k`.
    /// `None` selects `default_top_k`.
    pub fn effective_top_k(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_top_k)
            .clamp(1, self.max_top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = LexisConfig::default();
        assert_eq!(config.default_top_k, 10);
        assert_eq!(config.max_top_k, 50);
        assert_eq!(config.max_candidates, 512);
        assert_eq!(config.active_index, IndexKind::Bst);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_top_k() {
        let config = LexisConfig::default();
        assert_eq!(config.effective_top_k(None), 10);
        assert_eq!(config.effective_top_k(Some(0)), 1);
        assert_eq!(config.effective_top_k(Some(5)), 5);
        assert_eq!(config.effective_top_k(Some(500)), 50);
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let config = LexisConfig {
            default_top_k: 80,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LexisError::Config(_))));

        let config = LexisConfig {
            max_candidates: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_names_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let error = LexisConfig::load(&path).unwrap_err();
        assert!(matches!(error, LexisError::Anyhow(_)));
        let message = error.to_string();
        assert!(message.contains("cannot read config file"), "{message}");
        assert!(message.contains("absent.json"), "{message}");
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "default_top_k": 5, "active_index": "avl" }}"#).unwrap();
        file.flush().unwrap();

        let config = LexisConfig::load(file.path()).unwrap();
        assert_eq!(config.default_top_k, 5);
        assert_eq!(config.active_index, IndexKind::Avl);
        assert_eq!(config.max_top_k, TOP_K_MAX);
    }
}
