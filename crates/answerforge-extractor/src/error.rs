//! Error types for the extraction engine

use thiserror::Error;

/// Errors that can occur during pattern extraction
///
/// Both variants are validation errors surfaced before any extraction work
/// starts; strategies themselves never fail on malformed text.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The caller requested no extraction methods
    #[error("no extraction methods requested")]
    NoMethods,

    /// Invalid threshold configuration
    #[error("invalid extractor configuration: {0}")]
    Config(String),
}
