//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the extraction core and
//! infrastructure. Implementations live in other crates
//! (answerforge-document, answerforge-llm) or in the caller's code.

use crate::chunk::Chunk;
use crate::qa::QaPair;

/// Materializes chunk text on demand
///
/// Implemented by document backends: flat text files read by byte range,
/// in-memory strings, or page-oriented sources (PDF extraction lives outside
/// the core and plugs in through this seam).
pub trait ChunkSource {
    /// Error type for read operations
    type Error: std::fmt::Display;

    /// Read exactly the given chunk's page or byte range from the source
    fn read_chunk(&mut self, chunk: &Chunk) -> Result<String, Self::Error>;
}

/// Produces question/answer pairs from a span of text
///
/// Implemented by the LLM client layer (answerforge-llm). Failures must
/// distinguish rate limiting (retryable) from other errors through the
/// implementation's error type; the core treats any failure as a per-chunk
/// recoverable condition.
pub trait QuestionGenerator {
    /// Error type for generation operations
    type Error: std::fmt::Display;

    /// Generate up to `max_pairs` question/answer pairs from `text`
    ///
    /// `custom_prompt` optionally replaces the default requirements block of
    /// the generation prompt.
    fn extract_qa_pairs(
        &self,
        text: &str,
        max_pairs: usize,
        custom_prompt: Option<&str>,
    ) -> Result<Vec<QaPair>, Self::Error>;
}
