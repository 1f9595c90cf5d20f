//! End-to-end extraction scenarios over eager and lazy documents

use answerforge_document::{flat_index, flat_index_for_text, ChunkingConfig, InMemorySource, TextFileSource};
use answerforge_domain::{ExtractionMethod, ExtractionProgress, QaPair};
use answerforge_llm::MockGenerator;
use answerforge_pipeline::{
    CancelFlag, Document, DocumentExtractor, ExtractionRequest, PipelineError,
};
use std::io::Write;

fn chunking(chars_per_chunk: usize) -> ChunkingConfig {
    ChunkingConfig {
        chars_per_chunk,
        ..ChunkingConfig::default()
    }
}

fn lazy_document(text: &str, chars_per_chunk: usize) -> Document<InMemorySource> {
    let index = flat_index_for_text(text, &chunking(chars_per_chunk));
    Document::lazy(index, InMemorySource::new(text)).unwrap()
}

#[test]
fn boundary_sentence_extracted_exactly_once() {
    // Three 60-byte chunks. The second sentence starts at byte 47 and
    // straddles the chunk-0/1 boundary; the third starts at byte 102 and
    // straddles the chunk-1/2 boundary. Each fragment left inside the
    // earlier chunk is too short to survive alone.
    let text = "Alpha beta gamma delta epsilon zeta eta theta. \
                The quick brown fox jumps over the extremely lazy dog. \
                Observability beats guesswork when incidents strike loudly.";
    assert_eq!(flat_index_for_text(text, &chunking(60)).chunks.len(), 3);
    let mut document = lazy_document(text, 60);

    let extractor = DocumentExtractor::new();
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Sentences],
        ..ExtractionRequest::default()
    };
    let candidates = extractor
        .extract(&mut document, &request, |_| {}, &CancelFlag::new())
        .unwrap();

    let straddlers: Vec<_> = candidates
        .iter()
        .filter(|c| c.text.contains("extremely lazy dog"))
        .collect();
    assert_eq!(straddlers.len(), 1);
    assert_eq!(straddlers[0].start_pos, 47);

    // The middle-boundary sentence resolves the same way through the splice
    // of chunk 1's tail onto chunk 2.
    let middle: Vec<_> = candidates
        .iter()
        .filter(|c| c.text.contains("incidents strike loudly"))
        .collect();
    assert_eq!(middle.len(), 1);
    assert_eq!(middle[0].start_pos, 102);

    // Every candidate's span must slice the original text exactly.
    for candidate in &candidates {
        let slice = &text[candidate.start_pos..candidate.end_pos];
        assert_eq!(slice.trim(), candidate.text);
    }

    // The first sentence was seen by two chunk passes; dedup keeps one.
    let leaders: Vec<_> = candidates
        .iter()
        .filter(|c| c.text.starts_with("Alpha beta"))
        .collect();
    assert_eq!(leaders.len(), 1);
}

#[test]
fn lazy_candidates_match_document_text() {
    let text = "Machine learning is a subset of artificial intelligence. \
                It enables computers to learn from data without explicit programming. \
                According to the handbook, retries should use exponential backoff. \
                First, measure a baseline before changing any parameters. "
        .repeat(4);
    let mut document = lazy_document(&text, 128);

    let extractor = DocumentExtractor::new();
    let candidates = extractor
        .extract(
            &mut document,
            &ExtractionRequest::default(),
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();
    assert!(!candidates.is_empty());

    // Spans read back through the chunk loader are identical to eager slices.
    let Document::Lazy(doc) = &mut document else {
        panic!("expected a lazy document");
    };
    for candidate in &candidates {
        let through_loader = doc
            .get_text_at_position(candidate.start_pos, candidate.end_pos)
            .unwrap();
        assert_eq!(through_loader, &text[candidate.start_pos..candidate.end_pos]);
        assert_eq!(through_loader.trim(), candidate.text);
    }
}

#[test]
fn eager_and_lazy_agree_on_small_text() {
    let text = "Latency is the time between request and response. \
                According to the handbook, retries should use exponential backoff. \
                First, measure a baseline before changing any parameters.";

    let extractor = DocumentExtractor::new();
    let request = ExtractionRequest::default();

    let eager = extractor
        .extract(
            &mut Document::<InMemorySource>::eager(text),
            &request,
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();

    // One chunk wide enough to hold everything: same pool, same merge pass.
    let lazy = extractor
        .extract(
            &mut lazy_document(text, 10_000),
            &request,
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();

    assert_eq!(eager, lazy);
}

#[test]
fn candidate_limit_stops_collection_early() {
    let text = "The quick brown fox jumps over the notoriously lazy dog. ".repeat(40);
    let total_chunks = flat_index_for_text(&text, &chunking(120)).chunks.len();
    let mut document = lazy_document(&text, 120);

    let extractor = DocumentExtractor::new();
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Sentences],
        max_candidates: 4,
        ..ExtractionRequest::default()
    };

    let mut unit_chunks = std::collections::BTreeSet::new();
    let candidates = extractor
        .extract(
            &mut document,
            &request,
            |p: &ExtractionProgress| {
                if !p.is_complete {
                    unit_chunks.insert(p.current_chunk);
                }
            },
            &CancelFlag::new(),
        )
        .unwrap();

    // The limit is an early collection stop: later chunks were never visited,
    // and the ranked result is drawn only from what was collected before it.
    assert!(candidates.len() <= 4);
    assert!(unit_chunks.len() < total_chunks);
    for pair in candidates.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}

#[test]
fn ai_pairs_become_located_candidates() {
    let text = "Machine learning is a subset of artificial intelligence. \
                It enables computers to learn from data without explicit programming.";
    let generator = MockGenerator::new(vec![
        QaPair::new(
            "What is machine learning?",
            "a subset of artificial intelligence",
        ),
        // Case drift: the locator falls back to the normalized match.
        QaPair::new(
            "What does it enable?",
            "computers to learn from Data without explicit Programming",
        ),
        QaPair::new("Where is the moon?", "this answer appears nowhere in the text"),
    ]);

    let extractor = DocumentExtractor::new().with_generator(generator.clone());
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Ai],
        ..ExtractionRequest::default()
    };
    let candidates = extractor
        .extract(
            &mut Document::<InMemorySource>::eager(text),
            &request,
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();

    assert_eq!(generator.call_count(), 1);
    // The unlocatable pair is dropped; the located ones carry their question.
    assert_eq!(candidates.len(), 2);
    for candidate in &candidates {
        assert_eq!(candidate.method, ExtractionMethod::Ai);
        assert_eq!(candidate.confidence, 0.9);
        assert!(candidate.context.is_some());
        let slice = &text[candidate.start_pos..candidate.end_pos];
        assert_eq!(slice.trim(), candidate.text);
    }
    assert!(candidates
        .iter()
        .any(|c| c.context.as_deref() == Some("What is machine learning?")));
}

#[test]
fn failed_generation_costs_only_the_ai_method() {
    let text = "Machine learning is a subset of artificial intelligence. \
                It enables computers to learn from data without explicit programming.";
    let mut generator = MockGenerator::default();
    generator.add_failure(text);

    let extractor = DocumentExtractor::new().with_generator(generator);
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Sentences, ExtractionMethod::Ai],
        ..ExtractionRequest::default()
    };
    let candidates = extractor
        .extract(
            &mut Document::<InMemorySource>::eager(text),
            &request,
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();

    assert!(!candidates.is_empty());
    assert!(candidates.iter().all(|c| c.method != ExtractionMethod::Ai));
}

#[test]
fn ai_without_generator_fails_before_any_work() {
    let extractor = DocumentExtractor::new();
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Ai],
        ..ExtractionRequest::default()
    };
    let mut progress_calls = 0;
    let result = extractor.extract(
        &mut Document::<InMemorySource>::eager("some text"),
        &request,
        |_| progress_calls += 1,
        &CancelFlag::new(),
    );
    assert!(matches!(result, Err(PipelineError::MissingGenerator)));
    assert_eq!(progress_calls, 0);
}

#[test]
fn cancellation_returns_partial_results() {
    let text = "Machine learning is a subset of artificial intelligence. \
                It enables computers to learn from data without explicit programming. "
        .repeat(30);

    let extractor = DocumentExtractor::new();
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Sentences],
        ..ExtractionRequest::default()
    };

    let full = extractor
        .extract(
            &mut lazy_document(&text, 150),
            &request,
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();

    let cancel = CancelFlag::new();
    let cancel_inside = cancel.clone();
    let partial = extractor
        .extract(
            &mut lazy_document(&text, 150),
            &request,
            move |p: &ExtractionProgress| {
                if p.current_chunk >= 2 {
                    cancel_inside.cancel();
                }
            },
            &cancel,
        )
        .unwrap();

    assert!(!partial.is_empty());
    assert!(partial.len() < full.len());
}

#[test]
fn mid_chunk_cancellation_keeps_finished_methods() {
    // Cancel raised right after the sentences unit of the only chunk; its
    // candidates must still flow through the merge pass and be returned.
    let text = "Machine learning is a subset of artificial intelligence. \
                It enables computers to learn from data without explicit programming.";
    let mut document = lazy_document(text, 10_000);

    let extractor = DocumentExtractor::new();
    let request = ExtractionRequest {
        methods: vec![ExtractionMethod::Sentences, ExtractionMethod::Definitions],
        ..ExtractionRequest::default()
    };

    let cancel = CancelFlag::new();
    let cancel_inside = cancel.clone();
    let candidates = extractor
        .extract(
            &mut document,
            &request,
            move |p: &ExtractionProgress| {
                if p.current_method == "sentences" {
                    cancel_inside.cancel();
                }
            },
            &cancel,
        )
        .unwrap();

    assert!(!candidates.is_empty());
    // The definitions unit never ran.
    assert!(candidates
        .iter()
        .all(|c| c.method == ExtractionMethod::Sentences));
}

#[test]
fn file_backed_document_round_trip() {
    let text = "Latency is the time between request and response. \
                According to the handbook, retries should use exponential backoff. "
        .repeat(10);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();

    let source = TextFileSource::open(file.path()).unwrap();
    let total = source.len_bytes().unwrap() as usize;
    let index = flat_index(total, &chunking(200));
    let mut document = Document::lazy(index, source).unwrap();

    let extractor = DocumentExtractor::new();
    let candidates = extractor
        .extract(
            &mut document,
            &ExtractionRequest::default(),
            |_| {},
            &CancelFlag::new(),
        )
        .unwrap();

    assert!(!candidates.is_empty());
    for candidate in &candidates {
        let slice = &text[candidate.start_pos..candidate.end_pos];
        assert_eq!(slice.trim(), candidate.text);
    }
}
