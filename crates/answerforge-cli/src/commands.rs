//! Command implementations

use crate::cli::{ExtractArgs, OutputFormat, SearchArgs};
use answerforge_document::{
    flat_index, ChunkingConfig, LazyDocument, TextFileSource, LAZY_THRESHOLD_BYTES,
};
use answerforge_domain::{AnswerCandidate, ExtractionMethod, QuestionGenerator};
use answerforge_extractor::ExtractorConfig;
use answerforge_llm::{ChatCompletionsGenerator, GeneratorConfig};
use answerforge_pipeline::{
    AiOptions, CancelFlag, Document, DocumentExtractor, ExtractionRequest,
};
use anyhow::{bail, Context};
use std::path::Path;
use tracing::info;

/// Run the extract command
pub fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let methods = parse_methods(&args.methods)?;
    let wants_ai = methods.contains(&ExtractionMethod::Ai);

    let request = ExtractionRequest {
        methods,
        config: ExtractorConfig {
            min_answer_length: args.min_length,
            max_answer_length: args.max_length,
            min_confidence: args.min_confidence,
        },
        max_candidates: args.max_candidates,
        chunk_range: None,
        ai: wants_ai.then(|| AiOptions {
            max_pairs: args.max_pairs,
            custom_prompt: args.custom_prompt.clone(),
        }),
    };

    let mut document = open_document(&args.file)?;

    let candidates = if wants_ai {
        let Some(api_key) = args.api_key.clone() else {
            bail!("the ai method needs an API key (--api-key or ANSWERFORGE_API_KEY)");
        };
        let mut generator_config = GeneratorConfig {
            api_key,
            model: args.model.clone(),
            ..GeneratorConfig::default()
        };
        if let Some(base_url) = args.base_url.clone() {
            generator_config.base_url = base_url;
        }
        let generator = ChatCompletionsGenerator::new(generator_config)?;
        run_extraction(DocumentExtractor::new().with_generator(generator), &mut document, &request)?
    } else {
        run_extraction(DocumentExtractor::new(), &mut document, &request)?
    };

    write_candidates(&candidates, args.output)?;
    Ok(())
}

/// Run the search command
pub fn search(args: SearchArgs) -> anyhow::Result<()> {
    let total = std::fs::metadata(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?
        .len() as usize;
    let source = TextFileSource::open(&args.file)?;
    let index = flat_index(total, &ChunkingConfig::default());
    let mut document = LazyDocument::new(index, source)?;

    let hits = document.search(&args.term, |done, total| {
        eprint!("\rscanning chunk {done}/{total}");
    });
    eprintln!();

    for hit in &hits {
        println!("{}", serde_json::to_string(hit)?);
    }
    eprintln!("{} match(es)", hits.len());
    Ok(())
}

fn parse_methods(raw: &str) -> anyhow::Result<Vec<ExtractionMethod>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<ExtractionMethod>().map_err(anyhow::Error::msg))
        .collect()
}

/// Open a file eagerly below the lazy threshold, chunk-indexed above it
fn open_document(path: &Path) -> anyhow::Result<Document<TextFileSource>> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("cannot read {}", path.display()))?
        .len();
    if len >= LAZY_THRESHOLD_BYTES {
        info!(bytes = len, "large file; using chunked access");
        let source = TextFileSource::open(path)?;
        let index = flat_index(len as usize, &ChunkingConfig::default());
        Ok(Document::lazy(index, source)?)
    } else {
        Ok(Document::eager(std::fs::read_to_string(path)?))
    }
}

fn run_extraction<G: QuestionGenerator>(
    extractor: DocumentExtractor<G>,
    document: &mut Document<TextFileSource>,
    request: &ExtractionRequest,
) -> anyhow::Result<Vec<AnswerCandidate>> {
    let candidates = extractor.extract(
        document,
        request,
        |p| {
            if p.is_complete {
                eprintln!("\rdone: {} candidates", p.candidates_found);
            } else {
                eprint!(
                    "\rchunk {}/{} [{}] {} candidates",
                    p.current_chunk, p.total_chunks, p.current_method, p.candidates_found
                );
            }
        },
        &CancelFlag::new(),
    )?;
    Ok(candidates)
}

fn write_candidates(candidates: &[AnswerCandidate], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for candidate in candidates {
                println!("{}", serde_json::to_string(candidate)?);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(candidates)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_methods() {
        let methods = parse_methods("sentences, definitions,ai").unwrap();
        assert_eq!(
            methods,
            vec![
                ExtractionMethod::Sentences,
                ExtractionMethod::Definitions,
                ExtractionMethod::Ai
            ]
        );
    }

    #[test]
    fn test_parse_methods_rejects_unknown() {
        assert!(parse_methods("sentences,telepathy").is_err());
    }
}
