//! # autoshop-journal
//!
//! Append-only, SHA-256 hash-chained journal of one pipeline run.
//!
//! Every event the pipeline emits is wrapped in a `JournalEntry` that links
//! to the previous entry via its hash. Editing any recorded event breaks the
//! chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use autoshop_journal::InMemoryJournal;
//!
//! let journal = InMemoryJournal::new();
//! let outcome = pipeline.run(&accepted, &cancel, &journal)?;
//!
//! assert!(journal.verify_integrity());
//! let log = journal.export_log();
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use event::{JournalEntry, JournalLog};
pub use memory::InMemoryJournal;

// ── Tests ─────────────────────────────────────────────────────────────────────
