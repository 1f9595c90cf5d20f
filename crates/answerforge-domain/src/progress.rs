//! Progress snapshots emitted during an extraction run

use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of an extraction run
///
/// Produced repeatedly during one run and consumed by a progress callback.
/// Carries no state between calls. "No candidates found" and "extraction
/// failed" are distinct terminal states: both complete, only the latter
/// carries an `error_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionProgress {
    /// 1-based index of the chunk being processed
    pub current_chunk: usize,

    /// Total chunks in the run
    pub total_chunks: usize,

    /// Running count of candidates collected so far
    pub candidates_found: usize,

    /// Name of the method being applied ("complete"/"error" at the end)
    pub current_method: String,

    /// Whether the run has finished (normally, cancelled, or erroring)
    pub is_complete: bool,

    /// Set on the final record when the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ExtractionProgress {
    /// Snapshot for one (chunk, method) unit of work
    pub fn unit(
        current_chunk: usize,
        total_chunks: usize,
        candidates_found: usize,
        method: impl Into<String>,
    ) -> Self {
        Self {
            current_chunk,
            total_chunks,
            candidates_found,
            current_method: method.into(),
            is_complete: false,
            error_message: None,
        }
    }

    /// Final snapshot for a run that finished normally (or was cancelled)
    pub fn complete(total_chunks: usize, candidates_found: usize) -> Self {
        Self {
            current_chunk: total_chunks,
            total_chunks,
            candidates_found,
            current_method: "complete".to_string(),
            is_complete: true,
            error_message: None,
        }
    }

    /// Final snapshot for a run that ended with a fatal error
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            current_chunk: 0,
            total_chunks: 0,
            candidates_found: 0,
            current_method: "error".to_string(),
            is_complete: true,
            error_message: Some(error_message.into()),
        }
    }

    /// Completed fraction in [0.0, 1.0], for progress bars
    pub fn fraction(&self) -> f64 {
        if self.total_chunks == 0 {
            return if self.is_complete { 1.0 } else { 0.0 };
        }
        self.current_chunk as f64 / self.total_chunks as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_snapshot() {
        let progress = ExtractionProgress::unit(3, 10, 42, "sentences");
        assert_eq!(progress.current_chunk, 3);
        assert!(!progress.is_complete);
        assert!(progress.error_message.is_none());
    }

    #[test]
    fn test_complete_vs_failed_are_distinct() {
        let ok = ExtractionProgress::complete(5, 0);
        let bad = ExtractionProgress::failed("boom");
        assert!(ok.is_complete && ok.error_message.is_none());
        assert!(bad.is_complete && bad.error_message.is_some());
    }

    #[test]
    fn test_fraction() {
        assert_eq!(ExtractionProgress::unit(5, 10, 0, "lists").fraction(), 0.5);
        assert_eq!(ExtractionProgress::failed("x").fraction(), 1.0);
    }
}
