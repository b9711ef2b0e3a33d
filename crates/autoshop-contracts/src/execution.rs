//! Run events and terminal outcomes.
//!
//! `RunEvent` is what observers receive while a run is in progress: one per
//! completed or failed stage, then a final `RunFinished`.
//! `RunOutcome` is what the orchestrator returns to the caller at the end.

use serde::{Deserialize, Serialize};

use crate::{
    context::{PipelineContext, RunId, StageRecord},
    error::{DelegateError, ShopError, ShopResult},
    stage::StageId,
};

/// How a run ended, without the context payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// All five stages completed.
    Done,
    /// A stage failed and no further stages ran.
    Aborted { stage: StageId, cause: String },
    /// The caller cancelled between stages.
    Cancelled { completed: usize },
}

/// An incremental notification emitted during a run, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// A stage produced a result and it was appended to the context.
    StageCompleted { run_id: RunId, record: StageRecord },

    /// A stage's delegate failed; the run is about to abort.
    StageFailed {
        run_id: RunId,
        stage: StageId,
        attempts: u32,
        cause: DelegateError,
    },

    /// The run reached a terminal state. Always the last event of a run.
    RunFinished { run_id: RunId, status: RunStatus },
}

impl RunEvent {
    pub fn run_id(&self) -> &RunId {
        match self {
            RunEvent::StageCompleted { run_id, .. }
            | RunEvent::StageFailed { run_id, .. }
            | RunEvent::RunFinished { run_id, .. } => run_id,
        }
    }

    /// The stage this event is about, if any.
    pub fn stage(&self) -> Option<StageId> {
        match self {
            RunEvent::StageCompleted { record, .. } => Some(record.stage),
            RunEvent::StageFailed { stage, .. } => Some(*stage),
            RunEvent::RunFinished { .. } => None,
        }
    }
}

/// Details of the stage that aborted a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: StageId,
    pub attempts: u32,
    pub cause: DelegateError,
}

/// The terminal result of one pipeline run.
///
/// Every variant hands the run's context back to the caller. Results of
/// stages that completed before an abort or cancellation stay valid.
#[derive(Debug)]
pub enum RunOutcome {
    /// All stages completed; `final_text` is the Storage stage's result.
    Done {
        final_text: String,
        context: PipelineContext,
    },

    /// A stage failed. `context` holds every stage that completed before it.
    Aborted {
        failure: StageFailure,
        context: PipelineContext,
    },

    /// Cancelled at a stage boundary. `context` is the last completed state.
    Cancelled { context: PipelineContext },
}

impl RunOutcome {
    pub fn context(&self) -> &PipelineContext {
        match self {
            RunOutcome::Done { context, .. }
            | RunOutcome::Aborted { context, .. }
            | RunOutcome::Cancelled { context } => context,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Done { .. } => RunStatus::Done,
            RunOutcome::Aborted { failure, .. } => RunStatus::Aborted {
                stage: failure.stage,
                cause: failure.cause.to_string(),
            },
            RunOutcome::Cancelled { context } => RunStatus::Cancelled {
                completed: context.entries().len(),
            },
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RunOutcome::Done { .. })
    }

    /// Collapse the outcome into the final text or a structured error.
    ///
    /// - `Done` → `Ok(final_text)`
    /// - `Aborted` → `Err(ShopError::StageExecution)`
    /// - `Cancelled` → `Err(ShopError::Cancelled)`
    pub fn into_result(self) -> ShopResult<String> {
        match self {
            RunOutcome::Done { final_text, .. } => Ok(final_text),
            RunOutcome::Aborted { failure, .. } => Err(ShopError::StageExecution {
                stage: failure.stage,
                attempts: failure.attempts,
                cause: failure.cause,
            }),
            RunOutcome::Cancelled { context } => Err(ShopError::Cancelled {
                completed: context.entries().len(),
            }),
        }
    }
}
