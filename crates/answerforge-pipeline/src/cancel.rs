//! Cooperative cancellation for extraction runs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag polled by the pipeline between units of work
///
/// Cloning shares the flag. Cancellation is cooperative: the run stops after
/// the current (chunk, method) unit and returns the candidates collected so
/// far, which still go through the final dedup/filter/rank pass.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; idempotent
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }
}
