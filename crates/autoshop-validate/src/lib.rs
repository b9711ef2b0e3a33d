//! # autoshop-validate
//!
//! The validation gate in front of the intake pipeline.
//!
//! [`validate`] checks the three intake records against a fixed, ordered rule
//! list and reports the first violation. [`ValidatedIntake`] is the only
//! value the pipeline will run, and it can only be obtained by passing
//! validation.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use autoshop_validate::ValidatedIntake;
//!
//! let accepted = ValidatedIntake::new(intake)?;
//! pipeline.run(&accepted, &cancel, &observer)?;
//! ```

pub mod engine;
pub mod rules;

pub use engine::{validate, validate_all, ValidatedIntake};

// ── Tests ─────────────────────────────────────────────────────────────────────
