//! Answer candidates and the strategies that produce them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extraction strategy that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Individual sentences split on terminal punctuation
    Sentences,
    /// Paragraphs split on blank-line boundaries
    Paragraphs,
    /// Bulleted, numbered, and lettered list items
    Lists,
    /// Definitional statements ("X is Y", "X means Y", ...)
    Definitions,
    /// Factual claims ("Research shows...", "In 1969, ...")
    Facts,
    /// Procedural statements ("First, ...", "In order to ...")
    Procedures,
    /// Question/answer pairs produced by the generation service
    Ai,
}

impl ExtractionMethod {
    /// All pattern-based methods, in their conventional order.
    ///
    /// Excludes [`ExtractionMethod::Ai`], which requires the generation
    /// service and is driven by the document pipeline.
    pub const PATTERN_METHODS: [ExtractionMethod; 6] = [
        ExtractionMethod::Sentences,
        ExtractionMethod::Paragraphs,
        ExtractionMethod::Lists,
        ExtractionMethod::Definitions,
        ExtractionMethod::Facts,
        ExtractionMethod::Procedures,
    ];

    /// Stable lowercase name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Sentences => "sentences",
            ExtractionMethod::Paragraphs => "paragraphs",
            ExtractionMethod::Lists => "lists",
            ExtractionMethod::Definitions => "definitions",
            ExtractionMethod::Facts => "facts",
            ExtractionMethod::Procedures => "procedures",
            ExtractionMethod::Ai => "ai",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentences" => Ok(ExtractionMethod::Sentences),
            "paragraphs" => Ok(ExtractionMethod::Paragraphs),
            "lists" => Ok(ExtractionMethod::Lists),
            "definitions" => Ok(ExtractionMethod::Definitions),
            "facts" => Ok(ExtractionMethod::Facts),
            "procedures" => Ok(ExtractionMethod::Procedures),
            "ai" => Ok(ExtractionMethod::Ai),
            other => Err(format!("unknown extraction method '{}'", other)),
        }
    }
}

/// A span of source text proposed as a training answer
///
/// `start_pos`/`end_pos` are byte offsets into the global document coordinate
/// space. The invariant `text == document[start_pos..end_pos]` holds up to
/// the leading/trailing trim performed by the producing strategy. Positions
/// may be shifted when a chunk-local candidate is promoted to global
/// coordinates; the text itself is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    /// The extracted substring
    pub text: String,

    /// Global byte offset where the span starts
    pub start_pos: usize,

    /// Global byte offset where the span ends (exclusive)
    pub end_pos: usize,

    /// Confidence in [0.0, 1.0]; higher is better
    pub confidence: f64,

    /// Strategy that produced this candidate
    pub method: ExtractionMethod,

    /// Auxiliary text; the `ai` method stores the generated question here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AnswerCandidate {
    /// Create a candidate with no context
    pub fn new(
        text: impl Into<String>,
        start_pos: usize,
        end_pos: usize,
        confidence: f64,
        method: ExtractionMethod,
    ) -> Self {
        Self {
            text: text.into(),
            start_pos,
            end_pos,
            confidence,
            method,
            context: None,
        }
    }

    /// Attach auxiliary context (the generated question for `ai` candidates)
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Promote chunk-local offsets to global coordinates
    pub fn shift(&mut self, offset: usize) {
        self.start_pos += offset;
        self.end_pos += offset;
    }

    /// Length of the candidate text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the candidate text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
