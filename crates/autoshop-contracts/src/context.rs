//! The per-run pipeline context.
//!
//! A `PipelineContext` is created at the start of a run, seeded with the
//! intake records, and grows by exactly one `StageRecord` per completed stage.
//! There is no API to remove or edit an entry once appended, and appends must
//! follow stage order.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ShopError, ShopResult},
    records::Intake,
    stage::StageId,
};

/// Unique identifier for one pipeline run.
///
/// Appears in every log line and journal entry produced by the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    /// Create a new, unique run ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What one completed stage contributed to the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: StageId,
    /// The exact prompt handed to the delegate.
    pub prompt: String,
    /// The delegate's reply.
    pub result: String,
    /// How many delegate calls it took, including the successful one.
    pub attempts: u32,
    pub completed_at: DateTime<Utc>,
}

/// Append-only log of a single run's stage results.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineContext {
    run_id: RunId,
    intake: Intake,
    entries: Vec<StageRecord>,
}

impl PipelineContext {
    /// Start an empty context for `run_id`, seeded with the intake records.
    pub fn new(run_id: RunId, intake: Intake) -> Self {
        Self {
            run_id,
            intake,
            entries: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn intake(&self) -> &Intake {
        &self.intake
    }

    /// All completed stages, in execution order.
    pub fn entries(&self) -> &[StageRecord] {
        &self.entries
    }

    /// The reply recorded for `stage`, if it has completed.
    pub fn result_of(&self, stage: StageId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.stage == stage)
            .map(|e| e.result.as_str())
    }

    /// The most recently completed stage.
    pub fn last_completed(&self) -> Option<StageId> {
        self.entries.last().map(|e| e.stage)
    }

    /// The stage that must be appended next, or `None` once all five are in.
    pub fn next_stage(&self) -> Option<StageId> {
        StageId::ALL.get(self.entries.len()).copied()
    }

    pub fn completed_stages(&self) -> Vec<StageId> {
        self.entries.iter().map(|e| e.stage).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.next_stage().is_none()
    }

    /// Append a completed stage.
    ///
    /// Returns `ShopError::StateMachine` if `record.stage` is not the next
    /// stage in order; the context is left untouched in that case.
    pub fn append(&mut self, record: StageRecord) -> ShopResult<()> {
        match self.next_stage() {
            Some(expected) if expected == record.stage => {
                self.entries.push(record);
                Ok(())
            }
            Some(expected) => Err(ShopError::StateMachine {
                reason: format!(
                    "stage '{}' appended out of order; expected '{}'",
                    record.stage, expected
                ),
            }),
            None => Err(ShopError::StateMachine {
                reason: format!(
                    "stage '{}' appended after the pipeline already completed",
                    record.stage
                ),
            }),
        }
    }
}
