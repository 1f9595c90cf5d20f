//! The extraction engine: strategy dispatch plus post-processing

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::postprocess;
use crate::strategies::Patterns;
use answerforge_domain::{AnswerCandidate, ExtractionMethod};
use tracing::debug;

/// Rule-based answer-candidate extractor
///
/// Holds only compiled patterns; all thresholds arrive with each call, so a
/// single engine can serve callers with different settings. Construction is
/// the expensive part (regex compilation); `extract` is read-only.
pub struct AnswerExtractor {
    patterns: Patterns,
}

impl AnswerExtractor {
    /// Create an engine with all patterns compiled
    pub fn new() -> Self {
        Self {
            patterns: Patterns::new(),
        }
    }

    /// Extract answer candidates from `text` using the requested methods
    ///
    /// Strategies are independent and order-insensitive; their pooled output
    /// goes through one dedup/filter/rank pass. Empty text yields an empty
    /// list. The `ai` method is driven by the document pipeline, not this
    /// engine, and is skipped here.
    pub fn extract(
        &self,
        text: &str,
        methods: &[ExtractionMethod],
        config: &ExtractorConfig,
    ) -> Result<Vec<AnswerCandidate>, ExtractorError> {
        if methods.is_empty() {
            return Err(ExtractorError::NoMethods);
        }
        config.validate().map_err(ExtractorError::Config)?;

        let mut candidates = Vec::new();
        for method in methods {
            match method {
                ExtractionMethod::Sentences => {
                    candidates.extend(self.patterns.extract_sentences(text, config));
                }
                ExtractionMethod::Paragraphs => {
                    candidates.extend(self.patterns.extract_paragraphs(text, config));
                }
                ExtractionMethod::Lists => {
                    candidates.extend(self.patterns.extract_list_items(text, config));
                }
                ExtractionMethod::Definitions => {
                    candidates.extend(self.patterns.extract_definitions(text, config));
                }
                ExtractionMethod::Facts => {
                    candidates.extend(self.patterns.extract_facts(text, config));
                }
                ExtractionMethod::Procedures => {
                    candidates.extend(self.patterns.extract_procedures(text, config));
                }
                ExtractionMethod::Ai => {
                    debug!("ai method requires the generation service; skipping in the pattern engine");
                }
            }
        }

        Ok(self.postprocess(candidates, config))
    }

    /// Run the dedup → filter → rank pass over pooled candidates
    ///
    /// Exposed separately so the document pipeline can pool per-chunk results
    /// (already promoted to global coordinates) and resolve cross-chunk
    /// duplicates in one place.
    pub fn postprocess(
        &self,
        candidates: Vec<AnswerCandidate>,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        let deduplicated = postprocess::deduplicate(candidates);
        let mut filtered =
            postprocess::filter(deduplicated, config, &self.patterns.uppercase_run);
        postprocess::rank(&mut filtered);
        filtered
    }
}

impl Default for AnswerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnswerExtractor {
        AnswerExtractor::new()
    }

    #[test]
    fn test_empty_methods_rejected() {
        let result = engine().extract("some text", &[], &ExtractorConfig::default());
        assert!(matches!(result, Err(ExtractorError::NoMethods)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ExtractorConfig::default();
        config.min_confidence = 2.0;
        let result = engine().extract("some text", &[ExtractionMethod::Sentences], &config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_empty_text_yields_empty_list() {
        let candidates = engine()
            .extract("", &ExtractionMethod::PATTERN_METHODS, &ExtractorConfig::default())
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_definitions_and_sentences_scenario() {
        let text = "Machine learning is a subset of artificial intelligence. \
                    It enables computers to learn from data without explicit programming.";
        let candidates = engine()
            .extract(
                text,
                &[ExtractionMethod::Sentences, ExtractionMethod::Definitions],
                &ExtractorConfig::default(),
            )
            .unwrap();

        let definition = candidates
            .iter()
            .find(|c| c.method == ExtractionMethod::Definitions)
            .expect("the 'X is Y.' pattern should match");
        assert!(definition.confidence >= 0.8);
        assert!(definition.text.contains("is a subset of"));

        let sentence = candidates
            .iter()
            .find(|c| c.method == ExtractionMethod::Sentences && c.text.starts_with("It enables"))
            .expect("the second sentence should survive");
        assert!(sentence.confidence >= 0.5);
    }

    #[test]
    fn test_results_ranked_by_confidence() {
        let text = "Machine learning is a subset of artificial intelligence. \
                    It enables computers to learn from data without explicit programming. \
                    First, collect a corpus of representative documents for the task.";
        let candidates = engine()
            .extract(
                text,
                &ExtractionMethod::PATTERN_METHODS,
                &ExtractorConfig::default(),
            )
            .unwrap();
        for pair in candidates.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_offsets_exact_across_methods() {
        let text = "Latency is the time between request and response. \
                    According to the handbook, retries should use exponential backoff. \
                    First, measure a baseline before changing any parameters.";
        let candidates = engine()
            .extract(
                text,
                &ExtractionMethod::PATTERN_METHODS,
                &ExtractorConfig::default(),
            )
            .unwrap();
        assert!(!candidates.is_empty());
        for candidate in &candidates {
            // Exact up to the strategy's leading/trailing trim
            let slice = &text[candidate.start_pos..candidate.end_pos];
            assert_eq!(slice.trim(), candidate.text);
        }
    }
}
