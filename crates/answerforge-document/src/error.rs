//! Error types for document access

use thiserror::Error;

/// Errors that can occur while indexing or reading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A chunk id past the end of the index was requested
    #[error("chunk {chunk_id} out of range (document has {chunk_count} chunks)")]
    ChunkOutOfRange {
        /// The requested id
        chunk_id: usize,
        /// Number of chunks in the index
        chunk_count: usize,
    },

    /// The chunk index violates its structural invariant
    #[error("invalid document index: {0}")]
    InvalidIndex(String),

    /// The underlying source failed to produce a chunk's text
    #[error("failed to read chunk {chunk_id}: {message}")]
    Source {
        /// The chunk whose read failed
        chunk_id: usize,
        /// Stringified source error
        message: String,
    },
}
