//! Trait seams of the pipeline.
//!
//! - `Delegate`: the text-generation capability a stage hands its prompt to
//!   (untrusted, may be a remote service)
//! - `RunObserver`: receives incremental run events in order
//!
//! Both are injected from outside; the pipeline holds no other collaborators.

use autoshop_contracts::{
    error::{DelegateError, ShopResult},
    execution::RunEvent,
};

/// A capability that turns a prompt into a reply.
///
/// Implementations must be stateless from the pipeline's point of view: the
/// same delegate may serve several runs on different threads at once, and
/// the only thing it receives is the immutable prompt string.
pub trait Delegate: Send + Sync {
    /// Produce a reply for `prompt`, or report why none could be produced.
    ///
    /// The pipeline treats an `Ok` reply that is empty or whitespace-only
    /// as `DelegateError::EmptyReply`.
    fn generate_reply(&self, prompt: &str) -> Result<String, DelegateError>;
}

/// Receives run events as they happen.
///
/// The pipeline calls `notify` synchronously, before moving on to the next
/// stage. An error stops the run: an event that cannot be delivered (for
/// example because the journal write failed) is not silently dropped.
pub trait RunObserver {
    fn notify(&self, event: &RunEvent) -> ShopResult<()>;
}

/// An observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn notify(&self, _event: &RunEvent) -> ShopResult<()> {
        Ok(())
    }
}

/// Fans one event stream out to several observers, in order.
///
/// Delivery stops at the first observer that fails.
#[derive(Default)]
pub struct Tee<'a> {
    observers: Vec<&'a dyn RunObserver>,
}

impl<'a> Tee<'a> {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn with(mut self, observer: &'a dyn RunObserver) -> Self {
        self.observers.push(observer);
        self
    }
}

impl RunObserver for Tee<'_> {
    fn notify(&self, event: &RunEvent) -> ShopResult<()> {
        for observer in &self.observers {
            observer.notify(event)?;
        }
        Ok(())
    }
}
