//! Chunk-indexed document access for AnswerForge
//!
//! Large documents are navigated through a [`DocumentIndex`](answerforge_domain::DocumentIndex)
//! built up front, with chunk text loaded on demand and evicted under memory
//! pressure. Flat text sources are addressed by byte range; page-oriented
//! sources plug in behind the [`ChunkSource`](answerforge_domain::ChunkSource)
//! trait with estimated extents.
//!
//! # Example
//!
//! ```
//! use answerforge_document::{flat_index_for_text, ChunkingConfig, InMemorySource, LazyDocument};
//!
//! let text = "Lorem ipsum dolor sit amet. ".repeat(100);
//! let index = flat_index_for_text(&text, &ChunkingConfig::default());
//! let mut doc = LazyDocument::new(index, InMemorySource::new(text.clone())).unwrap();
//! assert_eq!(doc.get_text_at_position(0, 11).unwrap(), "Lorem ipsum");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod index;
mod loader;
mod source;

pub use error::DocumentError;
pub use index::{flat_index, flat_index_for_text, paged_index, ChunkingConfig, LAZY_THRESHOLD_BYTES};
pub use loader::{ChunkSummary, LazyDocument, SearchHit, DEFAULT_CACHE_CHUNKS};
pub use source::{InMemorySource, TextFileSource};
