//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::benchmark::{BenchmarkReport, TreeTiming};
use crate::cli::args::{LexisArgs, OutputFormat};
use crate::error::Result;
use crate::loader::SessionSource;
use crate::record::WordRecord;
use crate::tree::IndexKind;

/// Result structure for a lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub index: IndexKind,
    pub record: WordRecord,
}

/// Result structure for prefix completion.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionResult {
    pub index: IndexKind,
    pub prefix: String,
    pub suggestions: Vec<WordRecord>,
    /// Word whose pick was recorded, when `--select` was given.
    pub selected: Option<String>,
}

/// Result structure for listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResult {
    pub index: IndexKind,
    pub total: usize,
    pub height: usize,
    pub words: Vec<WordRecord>,
}

/// Result structure for add, remove and frequency updates.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResult {
    pub word: String,
    pub action: String,
    pub changed: bool,
    pub total: usize,
}

/// Size and height of one tree.
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeStats {
    pub index: IndexKind,
    pub count: usize,
    pub height: usize,
}

/// Dictionary statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryStats {
    pub source: SessionSource,
    pub active: IndexKind,
    pub trees: Vec<TreeStats>,
}

/// Result structure for the consistency check.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub consistent: bool,
    pub words: usize,
    pub message: Option<String>,
}

/// Renders a result as human-readable text.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &LexisArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", result.render_human());
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LexisArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn describe(record: &WordRecord) -> String {
    let mut text = format!(
        "{}\n  Part of speech: {}\n  Meaning: {}\n  Frequency: {}\n  Picks: {}\n",
        record.word,
        placeholder(&record.part_of_speech),
        placeholder(&record.meaning),
        record.frequency_score,
        record.selection_count
    );
    text.push_str(&format!("  Score: {}\n", record.composite_score()));
    text
}

fn placeholder(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}

fn separator(ch: char, width: usize) -> String {
    format!("{}\n", ch.to_string().repeat(width))
}

impl HumanOutput for LookupResult {
    fn render_human(&self) -> String {
        describe(&self.record)
    }
}

impl HumanOutput for CompletionResult {
    fn render_human(&self) -> String {
        if self.suggestions.is_empty() {
            return format!("No words start with '{}'.\n", self.prefix);
        }
        let mut text = format!("Suggestions for '{}' ({}):\n", self.prefix, self.index);
        for (rank, record) in self.suggestions.iter().enumerate() {
            text.push_str(&format!(
                "  {:>2}. {:<24} score {:>6}  ({} + {} picks)\n",
                rank + 1,
                record.word,
                record.composite_score(),
                record.frequency_score,
                record.selection_count
            ));
        }
        if let Some(word) = &self.selected {
            text.push_str(&format!("Recorded pick of '{word}'.\n"));
        }
        text
    }
}

impl HumanOutput for ListResult {
    fn render_human(&self) -> String {
        let mut text = format!("  {:>5}  {:<24}  {:<14}  {}\n", "No.", "Word", "Part of Speech", "Freq");
        text.push_str(&separator('-', 58));
        for (number, record) in self.words.iter().enumerate() {
            text.push_str(&format!(
                "  {:>5}  {:<24}  {:<14}  {}\n",
                number + 1,
                record.word,
                placeholder(&record.part_of_speech),
                record.frequency_score
            ));
        }
        text.push_str(&separator('-', 58));
        text.push_str(&format!(
            "  Total: {} words  |  {} height: {}\n",
            self.total, self.index, self.height
        ));
        text
    }
}

impl HumanOutput for MutationResult {
    fn render_human(&self) -> String {
        let outcome = if self.changed { "done" } else { "no change" };
        format!(
            "{} '{}': {} ({} words)\n",
            self.action, self.word, outcome, self.total
        )
    }
}

impl HumanOutput for DictionaryStats {
    fn render_human(&self) -> String {
        let source = match &self.source {
            SessionSource::Session(path) => format!("session {}", path.display()),
            SessionSource::Words(path) => format!("word list {}", path.display()),
            SessionSource::Samples => "built-in samples".to_string(),
        };
        let mut text = format!("Loaded from: {source}\nActive index: {}\n", self.active);
        text.push_str(&format!("  {:<10}{:>8}{:>8}\n", "Index", "Words", "Height"));
        for tree in &self.trees {
            text.push_str(&format!(
                "  {:<10}{:>8}{:>8}\n",
                tree.index, tree.count, tree.height
            ));
        }
        text
    }
}

impl HumanOutput for CheckResult {
    fn render_human(&self) -> String {
        match &self.message {
            None => format!("All three trees agree on {} words.\n", self.words),
            Some(message) => format!("Trees disagree: {message}\n"),
        }
    }
}

const BENCHMARK_ROWS: [&str; 4] = [
    "Bulk insert (ms)",
    "Tree height",
    "Search (ms)",
    "Traverse full (ms)",
];

fn benchmark_cell(tree: &TreeTiming, row: usize) -> String {
    match row {
        0 => format!("{:.3}", tree.insert_ms),
        1 => tree.height.to_string(),
        2 => format!("{:.3}", tree.search_ms),
        _ => format!("{:.3}", tree.traverse_ms),
    }
}

impl HumanOutput for BenchmarkReport {
    fn render_human(&self) -> String {
        let mut text = String::from("Benchmark Results:\n");
        text.push_str(&separator('=', 62));
        for run in &self.runs {
            text.push_str(&format!("\nDataset: {} words\n", run.size));
            text.push_str(&format!("  {:<24}", "Metric"));
            for tree in &run.trees {
                text.push_str(&format!("|  {:>9}  ", tree.kind.name().to_uppercase()));
            }
            text.push('\n');
            text.push_str(&separator('-', 62));

            for (row, label) in BENCHMARK_ROWS.iter().enumerate() {
                text.push_str(&format!("  {label:<24}"));
                for tree in &run.trees {
                    text.push_str(&format!("|  {:>9}  ", benchmark_cell(tree, row)));
                }
                text.push('\n');
            }
        }
        text
    }
}
