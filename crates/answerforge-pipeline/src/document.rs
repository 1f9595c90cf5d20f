//! The document handle the pipeline operates on

use crate::error::PipelineError;
use answerforge_document::LazyDocument;
use answerforge_domain::{ChunkSource, DocumentIndex};

/// A document opened for extraction
///
/// Small documents are held eagerly as one string and processed in a single
/// engine call; large ones go through the chunk loader. The cut-over point is
/// the caller's choice ([`answerforge_document::LAZY_THRESHOLD_BYTES`] by
/// convention).
pub enum Document<S: ChunkSource> {
    /// Whole text in memory, treated as a single chunk
    Eager(String),

    /// Chunk-indexed document loaded on demand
    Lazy(LazyDocument<S>),
}

impl<S: ChunkSource> Document<S> {
    /// Wrap already-loaded text
    pub fn eager(text: impl Into<String>) -> Self {
        Document::Eager(text.into())
    }

    /// Open a chunk-indexed document
    pub fn lazy(index: DocumentIndex, source: S) -> Result<Self, PipelineError> {
        Ok(Document::Lazy(LazyDocument::new(index, source)?))
    }

    /// Number of chunks the pipeline will iterate
    pub fn chunk_count(&self) -> usize {
        match self {
            Document::Eager(_) => 1,
            Document::Lazy(doc) => doc.chunk_count(),
        }
    }

    /// Total bytes (an estimate for paged lazy sources)
    pub fn total_characters(&self) -> usize {
        match self {
            Document::Eager(text) => text.len(),
            Document::Lazy(doc) => doc.total_characters(),
        }
    }
}
