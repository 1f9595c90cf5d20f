//! Question/answer exchange types for the generation service

use serde::{Deserialize, Serialize};

/// A question/answer pair returned by the generation service
///
/// By service contract the `answer` is a near-exact substring of the text it
/// was generated from; the core locates it rather than trusting offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The generated question
    pub question: String,

    /// The answer, quoted from the source text
    pub answer: String,
}

impl QaPair {
    /// Create a pair
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
