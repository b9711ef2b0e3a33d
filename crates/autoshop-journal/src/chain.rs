//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. run_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the run event

use sha2::{Digest, Sha256};

use autoshop_contracts::execution::RunEvent;

use crate::event::JournalEntry;

/// Compute the SHA-256 hash for a single journal entry.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `event` cannot be serialized to JSON, which cannot happen for
/// `RunEvent`: every field is a string, number, enum or timestamp.
pub fn hash_entry(run_id: &str, sequence: u64, event: &RunEvent, prev_hash: &str) -> String {
    let event_json = serde_json::to_vec(event).expect("RunEvent must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(run_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&event_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// Every entry must link to its predecessor's `this_hash` (or
/// `GENESIS_HASH` for the first), carry the next sequence number, and its
/// `this_hash` must match the value recomputed from its own fields. An empty
/// chain is valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    let mut expected_prev = JournalEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.prev_hash != expected_prev || entry.sequence != position as u64 {
            return false;
        }

        let recomputed = hash_entry(&entry.run_id, entry.sequence, &entry.event, &entry.prev_hash);
        if entry.this_hash != recomputed {
            return false;
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
