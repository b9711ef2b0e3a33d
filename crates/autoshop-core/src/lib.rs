//! # autoshop-core
//!
//! The sequential orchestrator behind the auto shop intake pipeline.
//!
//! This crate provides:
//! - The two trait seams (`Delegate`, `RunObserver`)
//! - The five `StageDescriptor`s and their prompt builders
//! - The `Pipeline` that runs them in order over a `ValidatedIntake`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use autoshop_core::{CancellationToken, NoopObserver, Pipeline, StageDelegates};
//!
//! let pipeline = Pipeline::new(StageDelegates::uniform(delegate));
//! let outcome = pipeline.run(&accepted, &CancellationToken::new(), &NoopObserver)?;
//! ```

pub mod cancel;
pub mod delegates;
pub mod pipeline;
pub mod retry;
pub mod stages;
pub mod traits;

pub use cancel::CancellationToken;
pub use delegates::StageDelegates;
pub use pipeline::Pipeline;
pub use retry::RetryPolicy;
pub use traits::{Delegate, NoopObserver, RunObserver, Tee};
