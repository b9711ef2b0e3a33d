//! Error types for the intake pipeline.
//!
//! All fallible operations return `ShopResult<T>`. The variants keep "bad
//! input", "a stage failed mid-run" and "the caller cancelled" apart so the
//! presentation layer can react to each differently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{stage::StageId, violation::Violation};

/// Failure reported by a delegate capability for a single call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DelegateError {
    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// The service did not answer within the configured budget.
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The service answered with a non-success HTTP status.
    #[error("service answered with HTTP status {code}")]
    Status { code: u16 },

    /// The reply arrived but could not be interpreted as text.
    #[error("malformed reply: {reason}")]
    Malformed { reason: String },

    /// The reply was empty or whitespace only.
    #[error("empty reply")]
    EmptyReply,
}

impl DelegateError {
    /// Whether a retry of the same prompt has a reasonable chance to succeed.
    ///
    /// Rate limiting (429) and server-side errors (5xx) are transient; other
    /// statuses and unparseable replies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            DelegateError::Transport { .. } | DelegateError::Timeout { .. } => true,
            DelegateError::Status { code } => *code == 429 || (500..600).contains(code),
            DelegateError::EmptyReply => true,
            DelegateError::Malformed { .. } => false,
        }
    }
}

/// The unified error type for the intake pipeline.
#[derive(Debug, Error)]
pub enum ShopError {
    /// An intake record broke a validation rule. No stage has run.
    #[error("validation failed: {0}")]
    Validation(Violation),

    /// A stage's delegate failed; the run was aborted at that stage.
    #[error("stage '{stage}' failed after {attempts} attempt(s): {cause}")]
    StageExecution {
        stage: StageId,
        attempts: u32,
        cause: DelegateError,
    },

    /// The caller cancelled the run between stages.
    #[error("run cancelled after {completed} completed stage(s)")]
    Cancelled { completed: usize },

    /// Raw intake input could not be turned into records.
    #[error("invalid intake: {reason}")]
    Intake { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The run journal could not record an event.
    ///
    /// Fatal for the run: an event that cannot be journaled stops execution.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },

    /// The pipeline's ordering invariant was broken.
    #[error("state machine error: {reason}")]
    StateMachine { reason: String },
}

/// Convenience alias used throughout the workspace.
pub type ShopResult<T> = Result<T, ShopError>;
