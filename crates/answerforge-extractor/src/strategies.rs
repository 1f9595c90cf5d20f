//! The six pattern-based extraction strategies and their scoring heuristics
//!
//! Sentences, paragraphs, and list items are found by splitting, which
//! discards separator positions, so their offsets are reconstructed by
//! searching the original text. Sentences and paragraphs search forward from
//! a moving cursor seeded at the previous match's end, which keeps repeated
//! substrings attributed to the right occurrence. List items keep the
//! whole-document first-occurrence lookup of the original design: a repeated
//! item maps to its first occurrence. Definitions, facts, and procedures take
//! their spans directly from regex matches.

use crate::config::ExtractorConfig;
use answerforge_domain::{AnswerCandidate, ExtractionMethod};
use regex::Regex;

/// Advance `i` to the next char boundary at or after it
pub(crate) fn next_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hardcoded pattern compiles")
}

/// Compiled patterns shared by all strategies
///
/// Compiled once per engine instance; matching is read-only and thread-safe.
pub(crate) struct Patterns {
    sentence_split: Regex,
    paragraph_split: Regex,
    sentence_terminals: Regex,
    list_lines: Vec<Regex>,
    definitions: Vec<Regex>,
    facts: Vec<Regex>,
    procedures: Vec<Regex>,
    modal: Regex,
    causal: Regex,
    discourse: Regex,
    statistic: Regex,
    pub(crate) uppercase_run: Regex,
}

impl Patterns {
    pub(crate) fn new() -> Self {
        Self {
            sentence_split: re(r"[.!?]+\s+"),
            paragraph_split: re(r"\n\s*\n"),
            sentence_terminals: re(r"[.!?]+"),
            list_lines: vec![
                re(r"^\s*[-*+]\s+(.+)$"),      // bullet points
                re(r"^\s*\d+\.\s+(.+)$"),      // numbered lists
                re(r"^\s*[a-zA-Z]\.\s+(.+)$"), // lettered lists
                re(r"^\s*•\s+(.+)$"),          // unicode bullets
            ],
            definitions: vec![
                re(r"(?i)(.+?)\s+is\s+(.+?)[.!?]"),
                re(r"(?i)(.+?)\s+are\s+(.+?)[.!?]"),
                re(r"(?i)(.+?)\s+means\s+(.+?)[.!?]"),
                re(r"(?i)(.+?)\s+refers to\s+(.+?)[.!?]"),
                re(r"(?i)(.+?):\s+(.+?)[.!?]"),
                re(r"(?i)(.+?)\s+can be defined as\s+(.+?)[.!?]"),
            ],
            facts: vec![
                re(r"(?i)According to\s+.+?,\s+(.+?)[.!?]"),
                re(r"(?i)Research shows\s+(.+?)[.!?]"),
                re(r"(?i)Studies indicate\s+(.+?)[.!?]"),
                re(r"(?i)It is known that\s+(.+?)[.!?]"),
                re(r"(?i)The fact is\s+(.+?)[.!?]"),
                re(r"(?i)\d+%\s+of\s+(.+?)[.!?]"),
                re(r"(?i)In\s+\d{4},\s+(.+?)[.!?]"),
            ],
            procedures: vec![
                re(r"(?i)First,\s+(.+?)[.!?]"),
                re(r"(?i)Then,\s+(.+?)[.!?]"),
                re(r"(?i)Next,\s+(.+?)[.!?]"),
                re(r"(?i)Finally,\s+(.+?)[.!?]"),
                re(r"(?i)To\s+.+?,\s+(.+?)[.!?]"),
                re(r"(?i)In order to\s+.+?,\s+(.+?)[.!?]"),
            ],
            modal: re(r"(?i)\b(is|are|was|were|will|can|could|should|must)\b"),
            causal: re(r"(?i)\b(because|since|due to|as a result)\b"),
            discourse: re(r"(?i)\b(therefore|thus|consequently|however)\b"),
            statistic: re(r"\d+%|\d+\s+(percent|million|billion|thousand)"),
            uppercase_run: re(r"[A-Z]{5,}"),
        }
    }

    /// Extract individual sentences as answer candidates
    pub(crate) fn extract_sentences(
        &self,
        text: &str,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        let mut candidates = Vec::new();
        let mut cursor = 0;

        for part in self.sentence_split.split(text) {
            let sentence = part.trim();
            if sentence.is_empty() {
                continue;
            }

            // Forward search from the previous match end keeps duplicate
            // sentences attributed to the right occurrence.
            let Some(rel) = text[cursor..].find(sentence) else {
                cursor = next_boundary(text, cursor + sentence.len() + 1);
                continue;
            };
            let start = cursor + rel;
            let end = start + sentence.len();

            let confidence = self.score_sentence(sentence, config);
            if confidence > 0.0 {
                candidates.push(AnswerCandidate::new(
                    sentence,
                    start,
                    end,
                    confidence,
                    ExtractionMethod::Sentences,
                ));
            }

            cursor = next_boundary(text, end + 1);
        }

        candidates
    }

    /// Extract paragraphs as answer candidates
    pub(crate) fn extract_paragraphs(
        &self,
        text: &str,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        let mut candidates = Vec::new();
        let mut cursor = 0;

        for part in self.paragraph_split.split(text) {
            let paragraph = part.trim();
            if paragraph.is_empty() {
                continue;
            }

            let Some(rel) = text[cursor..].find(paragraph) else {
                cursor = next_boundary(text, cursor + paragraph.len() + 2);
                continue;
            };
            let start = cursor + rel;
            let end = start + paragraph.len();

            let confidence = self.score_paragraph(paragraph, config);
            let in_bounds = (config.min_answer_length..=config.max_answer_length)
                .contains(&paragraph.len());
            if confidence > 0.0 && in_bounds {
                candidates.push(AnswerCandidate::new(
                    paragraph,
                    start,
                    end,
                    confidence,
                    ExtractionMethod::Paragraphs,
                ));
            }

            cursor = next_boundary(text, end + 2);
        }

        candidates
    }

    /// Extract list items and numbered points
    ///
    /// Offsets come from the first occurrence of the item text anywhere in
    /// the document, not the current line; a repeated item is attributed to
    /// its first occurrence.
    pub(crate) fn extract_list_items(
        &self,
        text: &str,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        let mut candidates = Vec::new();

        for line in text.lines() {
            for pattern in &self.list_lines {
                let Some(captures) = pattern.captures(line) else {
                    continue;
                };
                let item = captures[1].trim().to_string();

                if !(config.min_answer_length..=config.max_answer_length).contains(&item.len()) {
                    continue;
                }
                let Some(start) = text.find(&item) else {
                    continue;
                };
                let end = start + item.len();

                let confidence = self.score_list_item(&item);
                candidates.push(AnswerCandidate::new(
                    item,
                    start,
                    end,
                    confidence,
                    ExtractionMethod::Lists,
                ));
            }
        }

        candidates
    }

    /// Extract definitions and explanatory statements
    pub(crate) fn extract_definitions(
        &self,
        text: &str,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        self.extract_by_patterns(
            text,
            config,
            &self.definitions,
            ExtractionMethod::Definitions,
            |s| self.score_definition(s),
        )
    }

    /// Extract factual statements
    pub(crate) fn extract_facts(
        &self,
        text: &str,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        self.extract_by_patterns(text, config, &self.facts, ExtractionMethod::Facts, |s| {
            self.score_fact(s)
        })
    }

    /// Extract procedural or how-to statements
    pub(crate) fn extract_procedures(
        &self,
        text: &str,
        config: &ExtractorConfig,
    ) -> Vec<AnswerCandidate> {
        self.extract_by_patterns(
            text,
            config,
            &self.procedures,
            ExtractionMethod::Procedures,
            |s| self.score_procedure(s),
        )
    }

    /// Shared driver for the regex-alternation strategies
    ///
    /// Spans come straight from the match; the candidate text is the trimmed
    /// match, so offsets are exact up to that trim.
    fn extract_by_patterns(
        &self,
        text: &str,
        config: &ExtractorConfig,
        patterns: &[Regex],
        method: ExtractionMethod,
        score: impl Fn(&str) -> f64,
    ) -> Vec<AnswerCandidate> {
        let mut candidates = Vec::new();

        for pattern in patterns {
            for m in pattern.find_iter(text) {
                let matched = m.as_str().trim();
                if !(config.min_answer_length..=config.max_answer_length).contains(&matched.len())
                {
                    continue;
                }
                candidates.push(AnswerCandidate::new(
                    matched,
                    m.start(),
                    m.end(),
                    score(matched),
                    method,
                ));
            }
        }

        candidates
    }

    fn score_sentence(&self, sentence: &str, config: &ExtractorConfig) -> f64 {
        let mut score: f64 = 0.5;

        let len = sentence.len();
        if (50..=200).contains(&len) {
            score += 0.2;
        } else if len < config.min_answer_length {
            return 0.0;
        }

        if self.modal.is_match(sentence) {
            score += 0.1;
        }
        if self.causal.is_match(sentence) {
            score += 0.1;
        }
        if self.discourse.is_match(sentence) {
            score += 0.1;
        }

        // Questions make poor answers
        if sentence.trim_end().ends_with('?') {
            score -= 0.3;
        }

        if sentence.matches(',').count() > 3 {
            score += 0.1;
        }

        score.min(1.0)
    }

    fn score_paragraph(&self, paragraph: &str, config: &ExtractorConfig) -> f64 {
        let mut score: f64 = 0.4;

        let len = paragraph.len();
        if (100..=400).contains(&len) {
            score += 0.3;
        } else if len > config.max_answer_length {
            return 0.0;
        }

        let sentence_count = self.sentence_terminals.split(paragraph).count();
        if (2..=5).contains(&sentence_count) {
            score += 0.2;
        }

        if !paragraph.contains('\n') {
            score += 0.1;
        }

        score.min(1.0)
    }

    fn score_list_item(&self, item: &str) -> f64 {
        let mut score: f64 = 0.6;

        if (30..=150).contains(&item.len()) {
            score += 0.2;
        }

        // Truncated or header-like items
        if item.ends_with("...") || item.ends_with(':') {
            score -= 0.3;
        }

        score.min(1.0)
    }

    fn score_definition(&self, definition: &str) -> f64 {
        let mut score: f64 = 0.8;

        if (40..=200).contains(&definition.len()) {
            score += 0.1;
        }

        score.min(1.0)
    }

    fn score_fact(&self, fact: &str) -> f64 {
        let mut score: f64 = 0.7;

        if (30..=150).contains(&fact.len()) {
            score += 0.1;
        }

        if self.statistic.is_match(fact) {
            score += 0.1;
        }

        score.min(1.0)
    }

    fn score_procedure(&self, procedure: &str) -> f64 {
        let mut score: f64 = 0.6;

        if (40..=200).contains(&procedure.len()) {
            score += 0.2;
        }

        score.min(1.0)
    }
}
