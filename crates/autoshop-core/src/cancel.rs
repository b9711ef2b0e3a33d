//! Cooperative cancellation between stages.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A cloneable flag the caller sets to stop a run.
///
/// The pipeline checks it only at stage boundaries: a stage that has
/// started (including its retries) always runs to success or failure.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next stage boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
