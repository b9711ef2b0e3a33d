//! Per-stage delegate wiring.

use std::sync::Arc;

use autoshop_contracts::stage::StageId;

use crate::traits::Delegate;

/// The delegate each of the five stages calls.
///
/// Built once and handed to `Pipeline::new`. Cloning shares the underlying
/// delegates, which hold no per-run state.
#[derive(Clone)]
pub struct StageDelegates {
    slots: [Arc<dyn Delegate>; 5],
}

impl StageDelegates {
    /// Every stage uses the same delegate.
    pub fn uniform(delegate: Arc<dyn Delegate>) -> Self {
        Self {
            slots: std::array::from_fn(|_| Arc::clone(&delegate)),
        }
    }

    /// Build each stage's delegate from its `StageId`.
    pub fn from_fn(make: impl FnMut(StageId) -> Arc<dyn Delegate>) -> Self {
        Self {
            slots: StageId::ALL.map(make),
        }
    }

    /// Replace the delegate for one stage.
    pub fn with(mut self, stage: StageId, delegate: Arc<dyn Delegate>) -> Self {
        self.slots[stage.index()] = delegate;
        self
    }

    pub fn get(&self, stage: StageId) -> &dyn Delegate {
        self.slots[stage.index()].as_ref()
    }
}
