//! In-memory run journal.
//!
//! `InMemoryJournal` is a `RunObserver` that chains every event it receives.
//! One journal records one run: it adopts the run id of the first event,
//! refuses events from any other run, and refuses everything after the
//! run's `RunFinished` entry.
//!
//! Use `export_log()` after the run to obtain a `JournalLog`, and
//! `verify_integrity()` at any time to confirm the chain has not been
//! tampered with in memory.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use autoshop_contracts::{
    error::{ShopError, ShopResult},
    execution::{RunEvent, RunStatus},
};
use autoshop_core::traits::RunObserver;

use crate::{
    chain::{hash_entry, verify_chain},
    event::{JournalEntry, JournalLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct JournalState {
    /// Set from the first recorded event.
    pub(crate) run_id: Option<String>,

    pub(crate) entries: Vec<JournalEntry>,

    /// `this_hash` of the last entry, or `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,

    /// Set once `RunFinished` is recorded; the journal is sealed after that.
    pub(crate) status: Option<RunStatus>,
}

// ── Public journal ────────────────────────────────────────────────────────────

/// An append-only journal backed by a SHA-256 hash chain.
///
/// Cloning shares the same underlying chain, so a clone can be handed to a
/// run on another thread and inspected afterwards.
#[derive(Clone)]
pub struct InMemoryJournal {
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl Default for InMemoryJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryJournal {
    pub fn new() -> Self {
        let state = JournalState {
            run_id: None,
            entries: Vec::new(),
            last_hash: JournalEntry::GENESIS_HASH.to_string(),
            status: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export a copy of every entry recorded so far.
    pub fn export_log(&self) -> JournalLog {
        let state = self.read();
        JournalLog {
            run_id: state.run_id.clone().unwrap_or_default(),
            entries: state.entries.clone(),
            status: state.status.clone(),
            exported_at: Utc::now(),
            terminal_hash: state
                .entries
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        }
    }

    /// Verify prev-hash linkage and hash correctness of every entry.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().entries)
    }

    // Read-only access tolerates a poisoned lock: entries are only ever
    // pushed whole, so the chain is still consistent.
    fn read(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── RunObserver impl ──────────────────────────────────────────────────────────

impl RunObserver for InMemoryJournal {
    /// Append one event to the chain.
    ///
    /// Returns `Err(JournalWriteFailed)` if the lock is poisoned, the journal
    /// is already sealed, or the event belongs to a different run.
    fn notify(&self, event: &RunEvent) -> ShopResult<()> {
        let mut state = self.state.lock().map_err(|e| ShopError::JournalWriteFailed {
            reason: format!("journal state lock poisoned: {}", e),
        })?;

        let run_id = event.run_id().to_string();

        if state.status.is_some() {
            return Err(ShopError::JournalWriteFailed {
                reason: format!("journal for run {} is already sealed", run_id),
            });
        }
        match &state.run_id {
            Some(existing) if *existing != run_id => {
                return Err(ShopError::JournalWriteFailed {
                    reason: format!(
                        "journal belongs to run {}, refusing event from run {}",
                        existing, run_id
                    ),
                });
            }
            Some(_) => {}
            None => state.run_id = Some(run_id.clone()),
        }

        let prev_hash = state.last_hash.clone();
        let sequence = state.entries.len() as u64;
        let this_hash = hash_entry(&run_id, sequence, event, &prev_hash);

        debug!(run_id = %run_id, sequence, "journal entry appended");

        state.entries.push(JournalEntry {
            sequence,
            run_id: run_id.clone(),
            event: event.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        if let RunEvent::RunFinished { status, .. } = event {
            state.status = Some(status.clone());
            info!(
                run_id = %run_id,
                entry_count = state.entries.len(),
                terminal_hash = %state.last_hash,
                "run journal sealed"
            );
        }

        Ok(())
    }
}
