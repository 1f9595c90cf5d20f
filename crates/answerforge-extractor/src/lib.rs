//! AnswerForge Extraction Engine
//!
//! Rule-based answer-candidate mining. Given a span of already-decoded text,
//! the engine runs a set of independent pattern strategies (sentences,
//! paragraphs, list items, definitions, facts, procedures), scores each hit
//! with a method-specific heuristic, and then post-processes the pooled
//! results: overlap-based deduplication, quality filtering, and ranking by
//! confidence.
//!
//! # Architecture
//!
//! ```text
//! text ──▶ strategies (×6, independent) ──▶ dedup ──▶ filter ──▶ rank
//! ```
//!
//! The engine is purely synchronous and CPU-bound. Malformed text is not an
//! error case: strategies degrade to producing fewer or no candidates, and
//! empty input yields an empty list. The only rejected inputs are an empty
//! method set and an invalid configuration, both surfaced before any work.
//!
//! # Example
//!
//! ```
//! use answerforge_extractor::{AnswerExtractor, ExtractorConfig};
//! use answerforge_domain::ExtractionMethod;
//!
//! let engine = AnswerExtractor::new();
//! let config = ExtractorConfig::default();
//! let text = "Machine learning is a subset of artificial intelligence. \
//!             It enables computers to learn from data without explicit programming.";
//!
//! let candidates = engine
//!     .extract(text, &[ExtractionMethod::Sentences, ExtractionMethod::Definitions], &config)
//!     .unwrap();
//! assert!(!candidates.is_empty());
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod postprocess;
mod strategies;

pub use config::ExtractorConfig;
pub use engine::AnswerExtractor;
pub use error::ExtractorError;
