//! Background extraction on a blocking worker thread

use crate::cancel::CancelFlag;
use crate::document::Document;
use crate::error::PipelineError;
use crate::orchestrator::{DocumentExtractor, ExtractionRequest};
use answerforge_domain::{AnswerCandidate, ChunkSource, ExtractionProgress, QuestionGenerator};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Run an extraction on a blocking worker thread
///
/// The core run is synchronous CPU and file work, so it goes through
/// `spawn_blocking` rather than an async task. The document moves into the
/// worker and is handed back through the join handle when the run ends.
/// Exactly one of `on_complete` / `on_error` fires; a fatal error is
/// delivered through `on_error` alone, never doubled as a failed progress
/// record (callers driving a progress display without an error channel can
/// forward it as [`ExtractionProgress::failed`] themselves). Cancel through
/// `cancel`; running one extraction per document at a time is the caller's
/// contract.
pub fn spawn_extraction<S, G>(
    extractor: Arc<DocumentExtractor<G>>,
    mut document: Document<S>,
    request: ExtractionRequest,
    cancel: CancelFlag,
    on_progress: impl Fn(&ExtractionProgress) + Send + 'static,
    on_complete: impl FnOnce(Vec<AnswerCandidate>) + Send + 'static,
    on_error: impl FnOnce(PipelineError) + Send + 'static,
) -> JoinHandle<Document<S>>
where
    S: ChunkSource + Send + 'static,
    G: QuestionGenerator + Send + Sync + 'static,
{
    tokio::task::spawn_blocking(move || {
        match extractor.extract(&mut document, &request, |p| on_progress(p), &cancel) {
            Ok(candidates) => on_complete(candidates),
            Err(err) => on_error(err),
        }
        document
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerforge_document::InMemorySource;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_background_extraction_completes() {
        let extractor = Arc::new(DocumentExtractor::new());
        let text = "Machine learning is a subset of artificial intelligence. \
                    It enables computers to learn from data without explicit programming.";
        let document = Document::<InMemorySource>::eager(text);

        let results = Arc::new(Mutex::new(Vec::new()));
        let results_in = results.clone();

        let handle = spawn_extraction(
            extractor,
            document,
            ExtractionRequest::default(),
            CancelFlag::new(),
            |_| {},
            move |candidates| results_in.lock().unwrap().extend(candidates),
            |err| panic!("unexpected error: {err}"),
        );

        handle.await.unwrap();
        assert!(!results.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_background_error_reported_once() {
        let extractor = Arc::new(DocumentExtractor::new());
        let document = Document::<InMemorySource>::eager("text");
        let request = ExtractionRequest {
            methods: vec![],
            ..ExtractionRequest::default()
        };

        let failures = Arc::new(Mutex::new(Vec::new()));
        let failures_in = failures.clone();
        let records = Arc::new(Mutex::new(Vec::new()));
        let records_in = records.clone();

        let handle = spawn_extraction(
            extractor,
            document,
            request,
            CancelFlag::new(),
            move |p| records_in.lock().unwrap().push(p.clone()),
            |_| panic!("should not complete"),
            move |err| failures_in.lock().unwrap().push(err.to_string()),
        );

        handle.await.unwrap();
        assert_eq!(failures.lock().unwrap().len(), 1);
        // The error callback is the only channel; no failed progress record.
        assert!(records.lock().unwrap().is_empty());
    }
}
