//! Question-generation service clients for AnswerForge
//!
//! Implementations of the `QuestionGenerator` trait from
//! `answerforge-domain`. The service boundary is a black box to the
//! extraction core: text goes in, question-answer pairs come out, and every
//! failure is reported through [`GeneratorError`].
//!
//! # Generators
//!
//! - `ChatCompletionsGenerator`: OpenAI-compatible chat-completions API
//! - `MockGenerator`: deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use answerforge_llm::MockGenerator;
//! use answerforge_domain::{QaPair, QuestionGenerator};
//!
//! let generator = MockGenerator::new(vec![QaPair::new("What is it?", "A test.")]);
//! let pairs = generator.extract_qa_pairs("any text", 10, None).unwrap();
//! assert_eq!(pairs[0].answer, "A test.");
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod parser;
pub mod prompt;

use answerforge_domain::{QaPair, QuestionGenerator};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use chat::{ChatCompletionsGenerator, GeneratorConfig};
pub use parser::parse_qa_response;
pub use prompt::build_qa_prompt;

/// Errors that can occur while talking to the generation service
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Network or API communication error
    #[error("communication error: {0}")]
    Communication(String),

    /// The service replied with something the parser cannot use
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit still in force after retries
    #[error("rate limit exceeded")]
    RateLimited,

    /// No API key configured
    #[error("no API key configured for the generation service")]
    MissingCredentials,

    /// Generic error
    #[error("generation error: {0}")]
    Other(String),
}

/// Mock generator for deterministic testing
///
/// Returns pre-configured pairs without any network calls. Specific input
/// texts can be given their own pairs or made to fail; everything else gets
/// the default pairs, truncated to the caller's `max_pairs`.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    default_pairs: Vec<QaPair>,
    responses: Arc<Mutex<HashMap<String, Vec<QaPair>>>>,
    failures: Arc<Mutex<HashSet<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGenerator {
    /// Create a mock that returns `pairs` for every text
    pub fn new(pairs: Vec<QaPair>) -> Self {
        Self {
            default_pairs: pairs,
            responses: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashSet::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Return specific pairs for one input text
    pub fn add_response(&mut self, text: impl Into<String>, pairs: Vec<QaPair>) {
        self.responses.lock().unwrap().insert(text.into(), pairs);
    }

    /// Make generation fail for one input text
    pub fn add_failure(&mut self, text: impl Into<String>) {
        self.failures.lock().unwrap().insert(text.into());
    }

    /// Number of times `extract_qa_pairs` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl QuestionGenerator for MockGenerator {
    type Error = GeneratorError;

    fn extract_qa_pairs(
        &self,
        text: &str,
        max_pairs: usize,
        _custom_prompt: Option<&str>,
    ) -> Result<Vec<QaPair>, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if self.failures.lock().unwrap().contains(text) {
            return Err(GeneratorError::Other("mock generation failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        let mut pairs = responses
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default_pairs.clone());
        pairs.truncate(max_pairs);
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_default_pairs() {
        let generator = MockGenerator::new(vec![QaPair::new("Q?", "A.")]);
        let pairs = generator.extract_qa_pairs("anything", 10, None).unwrap();
        assert_eq!(pairs, vec![QaPair::new("Q?", "A.")]);
    }

    #[test]
    fn test_mock_specific_responses() {
        let mut generator = MockGenerator::default();
        generator.add_response("alpha", vec![QaPair::new("Qa?", "Aa.")]);
        generator.add_response("beta", vec![QaPair::new("Qb?", "Ab.")]);

        assert_eq!(
            generator.extract_qa_pairs("alpha", 10, None).unwrap()[0].answer,
            "Aa."
        );
        assert_eq!(
            generator.extract_qa_pairs("beta", 10, None).unwrap()[0].answer,
            "Ab."
        );
        assert!(generator.extract_qa_pairs("other", 10, None).unwrap().is_empty());
    }

    #[test]
    fn test_mock_truncates_to_max_pairs() {
        let pairs = (0..5)
            .map(|i| QaPair::new(format!("Q{i}?"), format!("A{i}.")))
            .collect();
        let generator = MockGenerator::new(pairs);
        assert_eq!(generator.extract_qa_pairs("text", 2, None).unwrap().len(), 2);
    }

    #[test]
    fn test_mock_failure_injection() {
        let mut generator = MockGenerator::default();
        generator.add_failure("bad text");
        let result = generator.extract_qa_pairs("bad text", 10, None);
        assert!(matches!(result, Err(GeneratorError::Other(_))));
    }

    #[test]
    fn test_mock_call_count_shared_across_clones() {
        let generator = MockGenerator::new(vec![QaPair::new("Q?", "A.")]);
        let clone = generator.clone();
        generator.extract_qa_pairs("one", 1, None).unwrap();
        clone.extract_qa_pairs("two", 1, None).unwrap();
        assert_eq!(generator.call_count(), 2);

        generator.reset_call_count();
        assert_eq!(clone.call_count(), 0);
    }
}
