//! Deduplication, filtering, and ranking of pooled candidates

use crate::config::ExtractorConfig;
use answerforge_domain::AnswerCandidate;
use regex::Regex;
use std::cmp::Ordering;

/// Overlap ratio above which two candidates count as duplicates
pub(crate) const OVERLAP_THRESHOLD: f64 = 0.7;

/// Remove overlapping candidates, keeping the higher-confidence span
///
/// Candidates are compared in position order against the already-accepted
/// list; within a cluster that overlaps by more than 70% of the shorter
/// span, the higher confidence wins (a winning newcomer replaces the loser
/// at the end of the accepted list). This is an intentional O(n²) heuristic,
/// order-dependent and not a maximal-independent-set solution; it is
/// idempotent on its own output.
pub(crate) fn deduplicate(mut candidates: Vec<AnswerCandidate>) -> Vec<AnswerCandidate> {
    if candidates.is_empty() {
        return candidates;
    }

    candidates.sort_by_key(|c| c.start_pos);

    let mut accepted: Vec<AnswerCandidate> = Vec::new();
    'next_candidate: for candidate in candidates {
        for i in 0..accepted.len() {
            let existing = &accepted[i];
            let overlap_start = candidate.start_pos.max(existing.start_pos);
            let overlap_end = candidate.end_pos.min(existing.end_pos);
            let overlap_len = overlap_end.saturating_sub(overlap_start);

            let min_len = candidate.len().min(existing.len());
            let overlap_ratio = if min_len > 0 {
                overlap_len as f64 / min_len as f64
            } else {
                0.0
            };

            if overlap_ratio > OVERLAP_THRESHOLD {
                if candidate.confidence > existing.confidence {
                    accepted.remove(i);
                    accepted.push(candidate);
                }
                continue 'next_candidate;
            }
        }
        accepted.push(candidate);
    }

    accepted
}

/// Drop candidates that fail the quality thresholds
///
/// A pure predicate over each candidate: thresholds on confidence and
/// length, an alphanumeric-residue check that screens out punctuation-heavy
/// junk, and a consecutive-uppercase check that screens out headers and
/// acronym blocks.
pub(crate) fn filter(
    candidates: Vec<AnswerCandidate>,
    config: &ExtractorConfig,
    uppercase_run: &Regex,
) -> Vec<AnswerCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| {
            if candidate.confidence < config.min_confidence {
                return false;
            }
            if candidate.len() < config.min_answer_length
                || candidate.len() > config.max_answer_length
            {
                return false;
            }

            let residue: String = candidate
                .text
                .chars()
                .filter(|c| c.is_alphanumeric() || c.is_whitespace())
                .collect();
            if (residue.trim().len() as f64) < config.min_answer_length as f64 * 0.7 {
                return false;
            }

            if uppercase_run.is_match(&candidate.text) {
                return false;
            }

            true
        })
        .collect()
}

/// Sort by confidence descending; ties keep their prior relative order
pub(crate) fn rank(candidates: &mut [AnswerCandidate]) {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
}
