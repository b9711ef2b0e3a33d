//! The pipeline orchestrator: the sequential five-stage runner.
//!
//! Every run follows the same state machine:
//!
//!   Intake → Scanning → Analysis → QualityControl → Storage → Done
//!
//! and for each stage:
//!
//!   Cancel check → Build prompt → Delegate → Reply check → Append → Notify
//!
//! Stage N+1 never starts before stage N's result is appended to the
//! context and its event delivered. A delegate failure ends the run as
//! `Aborted`; nothing after the failed stage is invoked.

use chrono::Utc;
use tracing::{debug, info, warn};

use autoshop_contracts::{
    context::{PipelineContext, RunId, StageRecord},
    error::{DelegateError, ShopError, ShopResult},
    execution::{RunEvent, RunOutcome, StageFailure},
    records::Intake,
    stage::StageId,
};
use autoshop_validate::ValidatedIntake;

use crate::{
    cancel::CancellationToken,
    delegates::StageDelegates,
    retry::RetryPolicy,
    stages::{StageDescriptor, STAGES},
    traits::{Delegate, RunObserver},
};

/// The orchestrator.
///
/// Holds only immutable configuration, so one `Pipeline` can serve any
/// number of concurrent runs; each run owns its own `PipelineContext`.
pub struct Pipeline {
    delegates: StageDelegates,
    retry: RetryPolicy,
}

impl Pipeline {
    /// Create a pipeline with the given per-stage delegates and no retries.
    pub fn new(delegates: StageDelegates) -> Self {
        Self {
            delegates,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Validate raw intake records and run the pipeline on them.
    ///
    /// # Errors
    ///
    /// `ShopError::Validation` if the records are rejected; no stage runs in
    /// that case. Otherwise the same as `run`.
    pub fn submit(
        &self,
        intake: Intake,
        cancel: &CancellationToken,
        observer: &dyn RunObserver,
    ) -> ShopResult<RunOutcome> {
        let accepted = ValidatedIntake::new(intake).map_err(ShopError::Validation)?;
        self.run(&accepted, cancel, observer)
    }

    /// Run all five stages against an accepted intake.
    ///
    /// # Outcomes
    ///
    /// - `Done`: every stage completed; carries the Storage result
    /// - `Aborted`: a stage's delegate failed (after any retries)
    /// - `Cancelled`: `cancel` was set before some stage started
    ///
    /// `observer` receives one `StageCompleted` per completed stage, a
    /// `StageFailed` if a stage fails, and always a final `RunFinished`.
    ///
    /// # Errors
    ///
    /// `Err` is reserved for failures outside the stage contract: an
    /// observer that cannot accept an event, or a broken ordering
    /// invariant. Aborted and Cancelled runs are NOT errors.
    pub fn run(
        &self,
        intake: &ValidatedIntake,
        cancel: &CancellationToken,
        observer: &dyn RunObserver,
    ) -> ShopResult<RunOutcome> {
        let run_id = RunId::new();
        let mut context = PipelineContext::new(run_id.clone(), intake.intake().clone());

        info!(run_id = %run_id, "pipeline run starting");

        for descriptor in &STAGES {
            let stage = descriptor.stage;

            // ── Stage boundary: the only place cancellation is honoured ──────
            if cancel.is_cancelled() {
                info!(
                    run_id = %run_id,
                    next_stage = %stage,
                    completed = context.entries().len(),
                    "run cancelled at stage boundary"
                );
                return finish(observer, RunOutcome::Cancelled { context });
            }

            match self.execute_stage(&run_id, descriptor, &context)? {
                Ok(record) => {
                    context.append(record.clone())?;
                    observer.notify(&RunEvent::StageCompleted {
                        run_id: run_id.clone(),
                        record,
                    })?;
                }
                Err(failure) => {
                    observer.notify(&RunEvent::StageFailed {
                        run_id: run_id.clone(),
                        stage: failure.stage,
                        attempts: failure.attempts,
                        cause: failure.cause.clone(),
                    })?;
                    return finish(observer, RunOutcome::Aborted { failure, context });
                }
            }
        }

        let final_text = context
            .result_of(StageId::Storage)
            .map(str::to_owned)
            .ok_or_else(|| ShopError::StateMachine {
                reason: "all stages ran but no Storage result was recorded".to_string(),
            })?;

        info!(run_id = %run_id, "pipeline run complete");
        finish(observer, RunOutcome::Done { final_text, context })
    }

    /// Run one stage to success or final failure.
    ///
    /// The prompt is rebuilt from the same, unchanged context on every
    /// attempt; nothing is appended here.
    fn execute_stage(
        &self,
        run_id: &RunId,
        descriptor: &StageDescriptor,
        context: &PipelineContext,
    ) -> ShopResult<Result<StageRecord, StageFailure>> {
        let stage = descriptor.stage;
        let delegate = self.delegates.get(stage);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let prompt = (descriptor.build_prompt)(context)?;

            debug!(
                run_id = %run_id,
                stage = %stage,
                attempt,
                prompt_len = prompt.len(),
                "calling stage delegate"
            );

            match call_delegate(delegate, &prompt) {
                Ok(result) => {
                    info!(run_id = %run_id, stage = %stage, attempt, "stage completed");
                    return Ok(Ok(StageRecord {
                        stage,
                        prompt,
                        result,
                        attempts: attempt,
                        completed_at: Utc::now(),
                    }));
                }
                Err(cause) if cause.is_transient() && self.retry.allows_retry(attempt) => {
                    let wait = self.retry.backoff_after(attempt);
                    warn!(
                        run_id = %run_id,
                        stage = %stage,
                        attempt,
                        cause = %cause,
                        wait_ms = wait.as_millis() as u64,
                        "stage attempt failed, retrying"
                    );
                    std::thread::sleep(wait);
                }
                Err(cause) => {
                    warn!(
                        run_id = %run_id,
                        stage = %stage,
                        attempt,
                        cause = %cause,
                        "stage failed, aborting run"
                    );
                    return Ok(Err(StageFailure {
                        stage,
                        attempts: attempt,
                        cause,
                    }));
                }
            }
        }
    }
}

/// Call the delegate and reject blank replies.
fn call_delegate(delegate: &dyn Delegate, prompt: &str) -> Result<String, DelegateError> {
    let reply = delegate.generate_reply(prompt)?;
    if reply.trim().is_empty() {
        return Err(DelegateError::EmptyReply);
    }
    Ok(reply)
}

/// Deliver the terminal event and hand the outcome back.
fn finish(observer: &dyn RunObserver, outcome: RunOutcome) -> ShopResult<RunOutcome> {
    observer.notify(&RunEvent::RunFinished {
        run_id: outcome.context().run_id().clone(),
        status: outcome.status(),
    })?;
    Ok(outcome)
}

// ── Tests ────────────────────────────────────────────────────────────────────
