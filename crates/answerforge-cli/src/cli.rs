//! CLI command definitions and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AnswerForge - extract training answer candidates from documents
#[derive(Debug, Parser)]
#[command(name = "answerforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract answer candidates from a text file
    Extract(ExtractArgs),

    /// Search a document for a term
    Search(SearchArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line (default)
    Jsonl,
    /// A single pretty-printed JSON array
    Json,
}

/// Arguments for the extract command
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Text or markdown file to process
    pub file: PathBuf,

    /// Comma-separated extraction methods
    /// (sentences, paragraphs, lists, definitions, facts, procedures, ai)
    #[arg(
        short,
        long,
        default_value = "sentences,paragraphs,lists,definitions,facts,procedures"
    )]
    pub methods: String,

    /// Minimum candidate confidence
    #[arg(long, default_value = "0.3")]
    pub min_confidence: f64,

    /// Minimum answer length in bytes
    #[arg(long, default_value = "20")]
    pub min_length: usize,

    /// Maximum answer length in bytes
    #[arg(long, default_value = "500")]
    pub max_length: usize,

    /// Stop collecting after this many candidates
    #[arg(long, default_value = "5000")]
    pub max_candidates: usize,

    /// Output format on stdout
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub output: OutputFormat,

    /// Model for the ai method
    #[arg(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// API key for the ai method
    #[arg(long, env = "ANSWERFORGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint for the ai method
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pairs requested per chunk for the ai method
    #[arg(long, default_value = "25")]
    pub max_pairs: usize,

    /// Replacement requirements block for the generation prompt
    #[arg(long)]
    pub custom_prompt: Option<String>,
}

/// Arguments for the search command
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Text file to scan
    pub file: PathBuf,

    /// Term to search for
    pub term: String,
}
