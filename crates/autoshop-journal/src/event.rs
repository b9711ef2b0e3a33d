//! Journal entry and sealed log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use autoshop_contracts::execution::{RunEvent, RunStatus};

/// One run event, linked into the chain.
///
/// Changing any field, including those inside `event`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The run this entry belongs to.
    pub run_id: String,

    pub event: RunEvent,

    /// `this_hash` of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// SHA-256 (hex) over (run_id, sequence, prev_hash, event JSON).
    pub this_hash: String,
}

impl JournalEntry {
    /// The `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// An exported copy of one run's journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLog {
    /// Empty if no event has been recorded yet.
    pub run_id: String,

    pub entries: Vec<JournalEntry>,

    /// How the run ended, once its `RunFinished` event has been recorded.
    pub status: Option<RunStatus>,

    pub exported_at: DateTime<Utc>,

    /// The last entry's `this_hash`; empty for an empty journal.
    pub terminal_hash: String,
}

impl JournalLog {
    /// Whether the journal holds a terminal `RunFinished` entry.
    pub fn is_sealed(&self) -> bool {
        self.status.is_some()
    }
}
