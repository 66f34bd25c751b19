//! Command line argument parsing for the Lexis CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::LexisConfig;
use crate::error::Result;
use crate::tree::IndexKind;

/// Lexis - a word dictionary kept in three search trees
#[derive(Parser, Debug, Clone)]
#[command(name = "lexis")]
#[command(about = "Dictionary lookup and autocomplete over BST, AVL and threaded trees")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexisArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "LEXIS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Word list to load when no saved session exists
    #[arg(long, value_name = "FILE", global = true)]
    pub words: Option<PathBuf>,

    /// `word,score` frequency file applied after loading
    #[arg(long = "freq", value_name = "FILE", global = true)]
    pub frequency: Option<PathBuf>,

    /// Session file that is restored first and saved after changes
    #[arg(long, value_name = "FILE", global = true)]
    pub session: Option<PathBuf>,

    /// Index used for reads
    #[arg(short, long, value_name = "KIND", global = true)]
    pub index: Option<IndexKind>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexisArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }

    /// Load the configuration file, if any, and apply command line overrides.
    pub fn resolve_config(&self) -> Result<LexisConfig> {
        let mut config = match &self.config {
            Some(path) => LexisConfig::load(path)?,
            None => LexisConfig::default(),
        };
        if let Some(words) = &self.words {
            config.words_file = words.clone();
        }
        if let Some(frequency) = &self.frequency {
            config.frequency_file = frequency.clone();
        }
        if let Some(session) = &self.session {
            config.custom_words_file = session.clone();
        }
        if let Some(index) = self.index {
            config.active_index = index;
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Look up a word
    Lookup(LookupArgs),

    /// Suggest words starting with a prefix
    Complete(CompleteArgs),

    /// List every word in sorted order
    List(ListArgs),

    /// Add a word
    Add(AddArgs),

    /// Remove a word
    Remove(RemoveArgs),

    /// Set a word's frequency score
    Frequency(FrequencyArgs),

    /// Show tree sizes and heights
    Stats,

    /// Verify that the three trees agree
    Check,

    /// Time the three trees on synthetic data
    Benchmark(BenchmarkArgs),
}

/// Arguments for looking up a word
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Word to look up (case-insensitive)
    #[arg(value_name = "WORD")]
    pub word: String,
}

/// Arguments for prefix completion
#[derive(Parser, Debug, Clone)]
pub struct CompleteArgs {
    /// Prefix to complete
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Maximum number of suggestions
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Record a pick of the Nth suggestion (1-based)
    #[arg(short, long, value_name = "N")]
    pub select: Option<usize>,
}

/// Arguments for listing words
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Stop after this many words
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for adding a word
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Word to add
    #[arg(value_name = "WORD")]
    pub word: String,

    /// Definition
    #[arg(short, long, default_value = "")]
    pub meaning: String,

    /// Part of speech
    #[arg(short, long, default_value = "")]
    pub pos: String,

    /// Initial frequency score
    #[arg(long)]
    pub frequency: Option<u32>,
}

/// Arguments for removing a word
#[derive(Parser, Debug, Clone)]
pub struct RemoveArgs {
    /// Word to remove
    #[arg(value_name = "WORD")]
    pub word: String,
}

/// Arguments for updating a frequency score
#[derive(Parser, Debug, Clone)]
pub struct FrequencyArgs {
    /// Word to update
    #[arg(value_name = "WORD")]
    pub word: String,

    /// New frequency score
    #[arg(value_name = "SCORE")]
    pub score: u32,
}

/// Arguments for benchmarking
#[derive(Parser, Debug, Clone)]
pub struct BenchmarkArgs {
    /// Dataset sizes, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [500, 2000, 5000])]
    pub sizes: Vec<usize>,

    /// Lookups per tree per dataset
    #[arg(long, default_value = "1000")]
    pub searches: usize,

    /// Seed for the insertion order
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
