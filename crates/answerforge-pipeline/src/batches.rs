//! Pull-based batch delivery of candidates

use crate::cancel::CancelFlag;
use crate::document::Document;
use crate::error::PipelineError;
use crate::orchestrator::{DocumentExtractor, ExtractionRequest};
use answerforge_domain::{AnswerCandidate, ChunkSource, ExtractionMethod, QuestionGenerator};
use tracing::warn;

/// Iterator yielding candidate batches as chunks are processed
///
/// Built by [`DocumentExtractor::extract_batches`]. Chunks are processed on
/// the caller's thread as the iterator is pulled; this is the progressive
/// display path, so batches skip the boundary overlap and the final
/// cross-chunk dedup that the full run performs. Pattern methods only.
pub struct CandidateBatches<'a, S: ChunkSource, G: QuestionGenerator> {
    extractor: &'a DocumentExtractor<G>,
    document: &'a mut Document<S>,
    methods: Vec<ExtractionMethod>,
    request: ExtractionRequest,
    batch_size: usize,
    next_chunk: usize,
    chunk_end: usize,
    collected: usize,
    buffer: Vec<AnswerCandidate>,
    cancel: CancelFlag,
    done: bool,
}

impl<G: QuestionGenerator> DocumentExtractor<G> {
    /// Walk the document chunk by chunk, yielding batches of roughly
    /// `batch_size` candidates as they are found
    ///
    /// Validation matches [`DocumentExtractor::extract`]; the `ai` method is
    /// not supported here and is dropped with a warning.
    pub fn extract_batches<'a, S: ChunkSource>(
        &'a self,
        document: &'a mut Document<S>,
        request: ExtractionRequest,
        batch_size: usize,
        cancel: CancelFlag,
    ) -> Result<CandidateBatches<'a, S, G>, PipelineError> {
        self.validate(document.chunk_count(), &request)?;
        if batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let methods: Vec<ExtractionMethod> = request
            .methods
            .iter()
            .copied()
            .filter(|m| {
                if *m == ExtractionMethod::Ai {
                    warn!("the ai method is not available in batch mode; dropping it");
                    false
                } else {
                    true
                }
            })
            .collect();
        if methods.is_empty() {
            return Err(PipelineError::EmptyMethods);
        }

        let range = request
            .chunk_range
            .clone()
            .unwrap_or(0..document.chunk_count());

        Ok(CandidateBatches {
            extractor: self,
            document,
            methods,
            batch_size,
            next_chunk: range.start,
            chunk_end: range.end,
            collected: 0,
            buffer: Vec::new(),
            cancel,
            request,
            done: false,
        })
    }
}

impl<S: ChunkSource, G: QuestionGenerator> CandidateBatches<'_, S, G> {
    /// Process one chunk into the buffer; returns false when exhausted
    fn advance(&mut self) -> bool {
        if self.next_chunk >= self.chunk_end || self.cancel.is_cancelled() {
            return false;
        }
        if self.collected >= self.request.max_candidates {
            return false;
        }

        let chunk_id = self.next_chunk;
        self.next_chunk += 1;

        let (text, base) = match self.document {
            Document::Eager(text) => (text.clone(), 0),
            Document::Lazy(doc) => {
                let char_start = doc.index().chunks[chunk_id].char_start;
                match doc.load_chunk(chunk_id) {
                    Ok(text) => (text.to_string(), char_start),
                    Err(err) => {
                        warn!(chunk_id, error = %err, "skipping unreadable chunk");
                        return true;
                    }
                }
            }
        };

        match self.extractor.extract_chunk_patterns(
            &text,
            &self.methods,
            &self.request.config,
            base,
        ) {
            Ok(candidates) => {
                self.collected += candidates.len();
                self.buffer.extend(candidates);
            }
            Err(err) => {
                // Config errors were caught in validation; nothing else
                // the engine reports is per-chunk recoverable.
                warn!(chunk_id, error = %err, "chunk extraction failed");
            }
        }
        true
    }
}

impl<S: ChunkSource, G: QuestionGenerator> Iterator for CandidateBatches<'_, S, G> {
    type Item = Vec<AnswerCandidate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while self.buffer.len() < self.batch_size {
            if !self.advance() {
                self.done = true;
                break;
            }
        }
        if self.buffer.is_empty() {
            return None;
        }
        if self.buffer.len() <= self.batch_size {
            return Some(std::mem::take(&mut self.buffer));
        }
        let rest = self.buffer.split_off(self.batch_size);
        Some(std::mem::replace(&mut self.buffer, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerforge_document::{flat_index_for_text, ChunkingConfig, InMemorySource};

    fn lazy_document(text: &str, chars_per_chunk: usize) -> Document<InMemorySource> {
        let config = ChunkingConfig {
            chars_per_chunk,
            ..ChunkingConfig::default()
        };
        let index = flat_index_for_text(text, &config);
        Document::lazy(index, InMemorySource::new(text)).unwrap()
    }

    #[test]
    fn test_batches_cover_all_chunks() {
        let text = "The compiler checks every borrow at compile time. \
                    Programs without data races are the reward for that work. "
            .repeat(8);
        let mut document = lazy_document(&text, 150);

        let extractor = DocumentExtractor::new();
        let batches: Vec<_> = extractor
            .extract_batches(
                &mut document,
                ExtractionRequest::default(),
                5,
                CancelFlag::new(),
            )
            .unwrap()
            .collect();

        assert!(batches.len() > 1);
        for batch in &batches[..batches.len() - 1] {
            assert_eq!(batch.len(), 5);
        }
        let total: usize = batches.iter().map(Vec::len).sum();
        assert!(total > 5);
    }

    #[test]
    fn test_batches_stop_on_cancel() {
        let text = "A sentence that is long enough to be extracted every time. ".repeat(50);
        let mut document = lazy_document(&text, 200);

        let extractor = DocumentExtractor::new();

        let full_total: usize = extractor
            .extract_batches(
                &mut lazy_document(&text, 200),
                ExtractionRequest::default(),
                3,
                CancelFlag::new(),
            )
            .unwrap()
            .map(|batch| batch.len())
            .sum();

        let cancel = CancelFlag::new();
        let mut batches = extractor
            .extract_batches(
                &mut document,
                ExtractionRequest::default(),
                3,
                cancel.clone(),
            )
            .unwrap();

        let mut cancelled_total = batches.next().map_or(0, |b| b.len());
        cancel.cancel();
        // Buffered leftovers may still arrive, but no new chunks are processed.
        for batch in batches {
            cancelled_total += batch.len();
        }
        assert!(cancelled_total < full_total);
    }

    #[test]
    fn test_batches_reject_ai_only_request() {
        let mut document = Document::<InMemorySource>::eager("text");
        let extractor = DocumentExtractor::new();
        let request = ExtractionRequest {
            methods: vec![ExtractionMethod::Ai],
            ..ExtractionRequest::default()
        };
        let result = extractor.extract_batches(&mut document, request, 5, CancelFlag::new());
        assert!(result.is_err());
    }
}
