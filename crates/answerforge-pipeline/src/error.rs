//! Error types for the document extraction pipeline

use answerforge_document::DocumentError;
use answerforge_extractor::ExtractorError;
use thiserror::Error;

/// Errors that can end an extraction run
///
/// All variants except `Document` are detected during request validation,
/// before any chunk is touched. Per-chunk failures (unreadable chunk, failed
/// generation call) are contained and logged, never surfaced here.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request named no extraction methods
    #[error("no extraction methods requested")]
    EmptyMethods,

    /// Extractor or pipeline thresholds are out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The `ai` method was requested but no generator is configured
    #[error("the ai method requires a configured question generator")]
    MissingGenerator,

    /// The requested chunk range does not fit the document
    #[error("chunk range {start}..{end} out of bounds for {chunk_count} chunks")]
    InvalidChunkRange {
        /// First requested chunk
        start: usize,
        /// One past the last requested chunk
        end: usize,
        /// Chunks in the document
        chunk_count: usize,
    },

    /// Error surfaced by the extraction engine
    #[error(transparent)]
    Engine(#[from] ExtractorError),

    /// Error opening or indexing the document
    #[error(transparent)]
    Document(#[from] DocumentError),
}
