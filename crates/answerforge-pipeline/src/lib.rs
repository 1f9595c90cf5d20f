//! Document-level extraction orchestration for AnswerForge
//!
//! Ties the extraction engine (`answerforge-extractor`) to the chunked
//! document layer (`answerforge-document`): walks a document chunk by chunk
//! with boundary overlap, promotes chunk-local candidates to global
//! coordinates, merges and ranks them, and reports progress along the way.
//! Runs execute synchronously, on a blocking worker via [`spawn_extraction`],
//! or as a pull-based batch iterator.
//!
//! # Example
//!
//! ```
//! use answerforge_pipeline::{CancelFlag, Document, DocumentExtractor, ExtractionRequest};
//! use answerforge_document::InMemorySource;
//!
//! let extractor = DocumentExtractor::new();
//! let mut document = Document::<InMemorySource>::eager(
//!     "Machine learning is a subset of artificial intelligence.",
//! );
//! let candidates = extractor
//!     .extract(&mut document, &ExtractionRequest::default(), |_| {}, &CancelFlag::new())
//!     .unwrap();
//! assert!(!candidates.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod batches;
mod cancel;
mod document;
mod error;
mod matching;
mod orchestrator;
mod task;

pub use batches::CandidateBatches;
pub use cancel::CancelFlag;
pub use document::Document;
pub use error::PipelineError;
pub use orchestrator::{
    AiOptions, DocumentExtractor, ExtractionRequest, NoGenerator, PipelineConfig,
};
pub use task::spawn_extraction;
