//! AnswerForge Domain Layer
//!
//! This crate contains the core value objects and trait interfaces shared by
//! every other layer of AnswerForge. It stays dependency-light and defines the
//! vocabulary of the system:
//!
//! - **AnswerCandidate**: a scored span of source text proposed as a training answer
//! - **ExtractionMethod**: which strategy produced a candidate
//! - **ExtractionProgress**: a progress snapshot emitted during a run
//! - **Chunk / DocumentIndex**: offset-addressed slices of a lazily loaded document
//! - **QaPair**: a question/answer exchange with the generation service
//!
//! Trait definitions for external collaborators (`ChunkSource`,
//! `QuestionGenerator`) live in [`traits`]; infrastructure implementations
//! live in other crates.
//!
//! All offsets throughout the workspace are **byte offsets into UTF-8 text**,
//! measured in the global document coordinate space unless a function says
//! otherwise.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod chunk;
pub mod progress;
pub mod qa;
pub mod traits;

// Re-exports for convenience
pub use candidate::{AnswerCandidate, ExtractionMethod};
pub use chunk::{Chunk, DocumentIndex};
pub use progress::ExtractionProgress;
pub use qa::QaPair;
pub use traits::{ChunkSource, QuestionGenerator};
