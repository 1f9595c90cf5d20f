//! Document-level extraction orchestration

use crate::cancel::CancelFlag;
use crate::document::Document;
use crate::error::PipelineError;
use crate::matching::locate_answer;
use answerforge_document::LazyDocument;
use answerforge_domain::{
    AnswerCandidate, ChunkSource, ExtractionMethod, ExtractionProgress, QaPair, QuestionGenerator,
};
use answerforge_extractor::{AnswerExtractor, ExtractorConfig};
use tracing::{info, warn};

/// Confidence assigned to candidates produced by the generation service
const AI_CONFIDENCE: f64 = 0.9;

/// Knobs governing how a document is walked
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bytes of the previous chunk prepended to each chunk so spans that
    /// straddle a boundary are still seen whole
    pub overlap_size: usize,

    /// Candidates kept per chunk, best first
    pub max_candidates_per_chunk: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overlap_size: 200,
            max_candidates_per_chunk: 100,
        }
    }
}

impl PipelineConfig {
    /// Check that all knobs are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.max_candidates_per_chunk == 0 {
            return Err("max_candidates_per_chunk must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Settings for the `ai` extraction method
#[derive(Debug, Clone)]
pub struct AiOptions {
    /// Pairs requested from the generation service per chunk
    pub max_pairs: usize,

    /// Replacement for the default requirements block of the prompt
    pub custom_prompt: Option<String>,
}

impl Default for AiOptions {
    fn default() -> Self {
        Self {
            max_pairs: 25,
            custom_prompt: None,
        }
    }
}

/// One extraction run's worth of parameters
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Methods to apply, in order
    pub methods: Vec<ExtractionMethod>,

    /// Engine thresholds for this run
    pub config: ExtractorConfig,

    /// Collection stops once this many candidates have been gathered
    pub max_candidates: usize,

    /// Restrict the run to a sub-range of chunks
    pub chunk_range: Option<std::ops::Range<usize>>,

    /// Settings for the `ai` method, if requested
    pub ai: Option<AiOptions>,
}

impl Default for ExtractionRequest {
    fn default() -> Self {
        Self {
            methods: ExtractionMethod::PATTERN_METHODS.to_vec(),
            config: ExtractorConfig::default(),
            max_candidates: 5_000,
            chunk_range: None,
            ai: None,
        }
    }
}

/// Placeholder generator for extractors that never use the `ai` method
///
/// The type parameter default keeps pattern-only callers from naming a
/// generator they do not have; requesting `ai` against it fails validation.
pub struct NoGenerator;

impl QuestionGenerator for NoGenerator {
    type Error = String;

    fn extract_qa_pairs(
        &self,
        _text: &str,
        _max_pairs: usize,
        _custom_prompt: Option<&str>,
    ) -> Result<Vec<QaPair>, Self::Error> {
        Err("no question generator configured".to_string())
    }
}

/// Runs the extraction engine over whole documents
///
/// Owns one compiled engine and optionally a question generator. A single
/// extractor serves many runs; all per-run parameters arrive with the
/// [`ExtractionRequest`].
pub struct DocumentExtractor<G: QuestionGenerator = NoGenerator> {
    engine: AnswerExtractor,
    pipeline: PipelineConfig,
    generator: Option<G>,
}

impl DocumentExtractor<NoGenerator> {
    /// Create an extractor without a question generator
    pub fn new() -> Self {
        Self {
            engine: AnswerExtractor::new(),
            pipeline: PipelineConfig::default(),
            generator: None,
        }
    }
}

impl Default for DocumentExtractor<NoGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: QuestionGenerator> DocumentExtractor<G> {
    /// Replace the pipeline knobs
    pub fn with_pipeline_config(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Attach a question generator, enabling the `ai` method
    pub fn with_generator<G2: QuestionGenerator>(self, generator: G2) -> DocumentExtractor<G2> {
        DocumentExtractor {
            engine: self.engine,
            pipeline: self.pipeline,
            generator: Some(generator),
        }
    }

    /// Extract answer candidates from a whole document
    ///
    /// Validation failures surface before any chunk is touched. During the
    /// run, `progress` receives one snapshot per (chunk, method) unit plus a
    /// final completion record; `cancel` is polled between units and a
    /// cancelled run returns the candidates collected so far. Unreadable
    /// chunks and failed generation calls contribute nothing and are logged.
    pub fn extract<S: ChunkSource>(
        &self,
        document: &mut Document<S>,
        request: &ExtractionRequest,
        mut progress: impl FnMut(&ExtractionProgress),
        cancel: &CancelFlag,
    ) -> Result<Vec<AnswerCandidate>, PipelineError> {
        self.validate(document.chunk_count(), request)?;
        match document {
            Document::Eager(text) => self.extract_eager(text, request, &mut progress, cancel),
            Document::Lazy(doc) => self.extract_lazy(doc, request, &mut progress, cancel),
        }
    }

    pub(crate) fn validate(
        &self,
        chunk_count: usize,
        request: &ExtractionRequest,
    ) -> Result<(), PipelineError> {
        if request.methods.is_empty() {
            return Err(PipelineError::EmptyMethods);
        }
        request.config.validate().map_err(PipelineError::InvalidConfig)?;
        self.pipeline.validate().map_err(PipelineError::InvalidConfig)?;
        if request.max_candidates == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if request.methods.contains(&ExtractionMethod::Ai) && self.generator.is_none() {
            return Err(PipelineError::MissingGenerator);
        }
        if let Some(range) = &request.chunk_range {
            if range.start >= range.end || range.end > chunk_count {
                return Err(PipelineError::InvalidChunkRange {
                    start: range.start,
                    end: range.end,
                    chunk_count,
                });
            }
        }
        Ok(())
    }

    /// Whole text in one engine call; used below the lazy-loading threshold
    fn extract_eager(
        &self,
        text: &str,
        request: &ExtractionRequest,
        progress: &mut impl FnMut(&ExtractionProgress),
        cancel: &CancelFlag,
    ) -> Result<Vec<AnswerCandidate>, PipelineError> {
        if cancel.is_cancelled() {
            progress(&ExtractionProgress::complete(1, 0));
            return Ok(Vec::new());
        }

        let pattern_methods: Vec<ExtractionMethod> = request
            .methods
            .iter()
            .copied()
            .filter(|m| *m != ExtractionMethod::Ai)
            .collect();

        let mut pool = if pattern_methods.is_empty() {
            Vec::new()
        } else {
            self.engine.extract(text, &pattern_methods, &request.config)?
        };

        if request.methods.contains(&ExtractionMethod::Ai) {
            pool.extend(self.ai_candidates(text, request));
            pool = self.engine.postprocess(pool, &request.config);
        }

        pool.truncate(request.max_candidates);
        progress(&ExtractionProgress::complete(1, pool.len()));
        Ok(pool)
    }

    /// Chunk-at-a-time walk with boundary overlap and a global merge pass
    fn extract_lazy<S: ChunkSource>(
        &self,
        doc: &mut LazyDocument<S>,
        request: &ExtractionRequest,
        progress: &mut impl FnMut(&ExtractionProgress),
        cancel: &CancelFlag,
    ) -> Result<Vec<AnswerCandidate>, PipelineError> {
        let chunk_count = doc.chunk_count();
        let range = request.chunk_range.clone().unwrap_or(0..chunk_count);
        let total_chunks = range.len();

        let mut pool: Vec<AnswerCandidate> = Vec::new();
        let mut prev_tail = String::new();
        let mut cancelled = false;

        for (ordinal, chunk_id) in range.enumerate() {
            if cancel.is_cancelled() {
                info!(chunks_done = ordinal, "extraction cancelled; returning partial results");
                break;
            }

            let char_start = doc.index().chunks[chunk_id].char_start;
            let chunk_text = match doc.load_chunk(chunk_id) {
                Ok(text) => text.to_string(),
                Err(err) => {
                    warn!(chunk_id, error = %err, "skipping unreadable chunk");
                    prev_tail.clear();
                    continue;
                }
            };

            // Prepend the previous chunk's tail so boundary-straddling spans
            // are seen whole; the base offset keeps positions global.
            let (spliced, base) = if prev_tail.is_empty() {
                (chunk_text.clone(), char_start)
            } else {
                (
                    format!("{prev_tail}{chunk_text}"),
                    char_start - prev_tail.len(),
                )
            };

            let mut chunk_candidates: Vec<AnswerCandidate> = Vec::new();
            for method in &request.methods {
                // A mid-chunk cancel stops new method units; results from
                // units that already finished still join the pool below.
                if cancel.is_cancelled() {
                    info!("extraction cancelled mid-chunk; returning partial results");
                    cancelled = true;
                    break;
                }
                let mut found = match method {
                    ExtractionMethod::Ai => self.ai_candidates(&spliced, request),
                    _ => self.engine.extract(
                        &spliced,
                        std::slice::from_ref(method),
                        &request.config,
                    )?,
                };
                for candidate in &mut found {
                    candidate.shift(base);
                }
                chunk_candidates.extend(found);
                progress(&ExtractionProgress::unit(
                    ordinal + 1,
                    total_chunks,
                    pool.len() + chunk_candidates.len(),
                    method.as_str(),
                ));
            }

            let mut chunk_candidates = self.engine.postprocess(chunk_candidates, &request.config);
            chunk_candidates.truncate(self.pipeline.max_candidates_per_chunk);
            pool.extend(chunk_candidates);

            if cancelled {
                break;
            }

            prev_tail = tail_on_char_boundary(&chunk_text, self.pipeline.overlap_size);

            if pool.len() >= request.max_candidates {
                info!(
                    collected = pool.len(),
                    limit = request.max_candidates,
                    "candidate limit reached; stopping collection"
                );
                break;
            }
        }

        // Cross-chunk duplicates from the overlap splice resolve here.
        let mut result = self.engine.postprocess(pool, &request.config);
        result.truncate(request.max_candidates);
        progress(&ExtractionProgress::complete(total_chunks, result.len()));
        Ok(result)
    }

    /// Engine call for a batch-mode chunk: pattern methods only, capped
    pub(crate) fn extract_chunk_patterns(
        &self,
        text: &str,
        methods: &[ExtractionMethod],
        config: &ExtractorConfig,
        base: usize,
    ) -> Result<Vec<AnswerCandidate>, PipelineError> {
        let mut candidates = self.engine.extract(text, methods, config)?;
        for candidate in &mut candidates {
            candidate.shift(base);
        }
        candidates.truncate(self.pipeline.max_candidates_per_chunk);
        Ok(candidates)
    }

    /// Convert one chunk's generated pairs into located candidates
    ///
    /// Failures are contained: a failed generation call or an unlocatable
    /// answer costs only that chunk or pair.
    fn ai_candidates(&self, text: &str, request: &ExtractionRequest) -> Vec<AnswerCandidate> {
        let Some(generator) = &self.generator else {
            return Vec::new();
        };
        let default_opts = AiOptions::default();
        let opts = request.ai.as_ref().unwrap_or(&default_opts);

        let pairs = match generator.extract_qa_pairs(
            text,
            opts.max_pairs,
            opts.custom_prompt.as_deref(),
        ) {
            Ok(pairs) => pairs,
            Err(err) => {
                warn!(error = %err, "question generation failed; skipping this chunk");
                return Vec::new();
            }
        };

        let mut candidates = Vec::new();
        for pair in pairs {
            match locate_answer(text, &pair.answer) {
                Some(span) => {
                    let text_at_span = text[span.clone()].trim().to_string();
                    candidates.push(
                        AnswerCandidate::new(
                            text_at_span,
                            span.start,
                            span.end,
                            AI_CONFIDENCE,
                            ExtractionMethod::Ai,
                        )
                        .with_context(pair.question),
                    );
                }
                None => {
                    warn!(
                        answer = %pair.answer,
                        "generated answer not found in source text; dropping pair"
                    );
                }
            }
        }
        candidates
    }
}

/// Trailing `overlap` bytes of `text`, widened to a character boundary
fn tail_on_char_boundary(text: &str, overlap: usize) -> String {
    if overlap == 0 || text.is_empty() {
        return String::new();
    }
    let mut start = text.len().saturating_sub(overlap);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerforge_document::InMemorySource;

    fn eager(text: &str) -> Document<InMemorySource> {
        Document::eager(text)
    }

    #[test]
    fn test_empty_methods_rejected() {
        let extractor = DocumentExtractor::new();
        let request = ExtractionRequest {
            methods: vec![],
            ..ExtractionRequest::default()
        };
        let result = extractor.extract(
            &mut eager("text"),
            &request,
            |_| {},
            &CancelFlag::new(),
        );
        assert!(matches!(result, Err(PipelineError::EmptyMethods)));
    }

    #[test]
    fn test_ai_without_generator_rejected() {
        let extractor = DocumentExtractor::new();
        let request = ExtractionRequest {
            methods: vec![ExtractionMethod::Ai],
            ..ExtractionRequest::default()
        };
        let result = extractor.extract(
            &mut eager("text"),
            &request,
            |_| {},
            &CancelFlag::new(),
        );
        assert!(matches!(result, Err(PipelineError::MissingGenerator)));
    }

    #[test]
    fn test_bad_chunk_range_rejected() {
        let extractor = DocumentExtractor::new();
        let request = ExtractionRequest {
            chunk_range: Some(0..5),
            ..ExtractionRequest::default()
        };
        let result = extractor.extract(
            &mut eager("an eager document has exactly one chunk"),
            &request,
            |_| {},
            &CancelFlag::new(),
        );
        assert!(matches!(
            result,
            Err(PipelineError::InvalidChunkRange { chunk_count: 1, .. })
        ));
    }

    #[test]
    fn test_zero_max_candidates_rejected() {
        let extractor = DocumentExtractor::new();
        let request = ExtractionRequest {
            max_candidates: 0,
            ..ExtractionRequest::default()
        };
        let result = extractor.extract(
            &mut eager("text"),
            &request,
            |_| {},
            &CancelFlag::new(),
        );
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_eager_extraction_emits_one_completion() {
        let extractor = DocumentExtractor::new();
        let text = "Machine learning is a subset of artificial intelligence. \
                    It enables computers to learn from data without explicit programming.";
        let mut records = Vec::new();
        let candidates = extractor
            .extract(
                &mut eager(text),
                &ExtractionRequest::default(),
                |p| records.push(p.clone()),
                &CancelFlag::new(),
            )
            .unwrap();

        assert!(!candidates.is_empty());
        assert_eq!(records.len(), 1);
        assert!(records[0].is_complete);
        assert_eq!(records[0].candidates_found, candidates.len());
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        // Cutting 3 bytes off "ééé" would land mid-character.
        assert_eq!(tail_on_char_boundary("ééé", 3), "é");
        assert_eq!(tail_on_char_boundary("abcdef", 2), "ef");
        assert_eq!(tail_on_char_boundary("abc", 100), "abc");
        assert_eq!(tail_on_char_boundary("abc", 0), "");
    }
}
