//! Auto shop intake pipeline: command-line front end.
//!
//! Reads one intake form from a TOML file, validates it, and runs it through
//! the five shop stages, printing each stage's result as it completes.
//!
//! Usage:
//!   autoshop template > intake.toml
//!   autoshop validate intake.toml [--all]
//!   autoshop run intake.toml [--config autoshop.toml] [--offline] [--journal-out run.json]

mod console;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use autoshop_contracts::{
    error::{ShopError, ShopResult},
    execution::RunOutcome,
    records::Intake,
};
use autoshop_core::{CancellationToken, Pipeline, Tee};
use autoshop_delegate::{offline_delegates, stage_delegates, ShopConfig};
use autoshop_journal::InMemoryJournal;
use autoshop_validate::{validate_all, ValidatedIntake};

use crate::console::ConsoleObserver;

const SAMPLE_INTAKE: &str = include_str!("../intake.sample.toml");

// ── CLI definition ────────────────────────────────────────────────────────────

/// Auto shop intake pipeline.
#[derive(Parser)]
#[command(
    name = "autoshop",
    about = "Validate a vehicle intake form and run it through the shop pipeline",
    long_about = "Validates a vehicle/customer/service intake form, then runs it through\n\
                  Client Intake, Vehicle Scanning, Mechanics Analysis, Quality Control\n\
                  and Data Storage, in that order."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an intake file without running the pipeline.
    Validate {
        /// Intake TOML with [vehicle], [customer] and [service] tables.
        intake: PathBuf,
        /// Report every violation instead of stopping at the first.
        #[arg(long)]
        all: bool,
    },
    /// Validate an intake file and run all five stages on it.
    Run {
        intake: PathBuf,
        /// Delegate configuration TOML. Built-in defaults when omitted.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Use deterministic local replies instead of the chat service.
        #[arg(long)]
        offline: bool,
        /// Write the run journal as JSON to this file.
        #[arg(long, value_name = "FILE")]
        journal_out: Option<PathBuf>,
    },
    /// Print a filled-in intake file to start from.
    Template,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-stage and per-attempt detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate { intake, all } => run_validate(&intake, all),
        Command::Run {
            intake,
            config,
            offline,
            journal_out,
        } => run_pipeline(&intake, config.as_deref(), offline, journal_out.as_deref()),
        Command::Template => {
            print!("{}", SAMPLE_INTAKE);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("autoshop: {}", e);
        std::process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn load_intake(path: &Path) -> ShopResult<Intake> {
    let contents = std::fs::read_to_string(path).map_err(|e| ShopError::Intake {
        reason: format!("failed to read intake file '{}': {}", path.display(), e),
    })?;
    Intake::from_toml_str(&contents)
}

fn run_validate(path: &Path, all: bool) -> ShopResult<()> {
    let intake = load_intake(path)?;

    if all {
        let violations = validate_all(&intake);
        if let Some(first) = violations.first() {
            for violation in &violations {
                println!("  {:<20} {}", violation.field, violation.message);
            }
            println!();
            return Err(ShopError::Validation(first.clone()));
        }
    } else {
        ValidatedIntake::new(intake).map_err(ShopError::Validation)?;
    }

    println!("Intake accepted.");
    Ok(())
}

fn run_pipeline(
    path: &Path,
    config_path: Option<&Path>,
    offline: bool,
    journal_out: Option<&Path>,
) -> ShopResult<()> {
    let intake = load_intake(path)?;
    let accepted = ValidatedIntake::new(intake).map_err(ShopError::Validation)?;

    let config = match config_path {
        Some(p) => ShopConfig::from_file(p)?,
        None => ShopConfig::default(),
    };
    let delegates = if offline {
        offline_delegates()
    } else {
        stage_delegates(&config)?
    };
    let pipeline = Pipeline::new(delegates).with_retry(config.retry.clone());
    debug!(
        offline,
        max_attempts = pipeline.retry_policy().max_attempts,
        "pipeline configured"
    );

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || on_interrupt(&handler_token)) {
        warn!(error = %e, "could not install Ctrl-C handler; the run cannot be interrupted");
    }

    let journal = InMemoryJournal::new();
    let console = ConsoleObserver;
    let observer = Tee::new().with(&journal).with(&console);

    println!("Intake accepted. Running the shop pipeline (Ctrl-C stops after the current stage)...");
    println!();

    let outcome = pipeline.run(&accepted, &cancel, &observer)?;

    let log = journal.export_log();
    println!(
        "Run {}: {} journal entries, chain {}",
        log.run_id,
        log.entries.len(),
        if journal.verify_integrity() { "verified" } else { "BROKEN" }
    );

    if let Some(out) = journal_out {
        let json = serde_json::to_string_pretty(&log).map_err(|e| ShopError::JournalWriteFailed {
            reason: format!("failed to serialize journal: {}", e),
        })?;
        std::fs::write(out, json).map_err(|e| ShopError::JournalWriteFailed {
            reason: format!("failed to write journal to '{}': {}", out.display(), e),
        })?;
        println!("Journal written to {}", out.display());
    }

    match outcome {
        RunOutcome::Done { .. } => {
            println!("All five stages completed.");
            Ok(())
        }
        other => other.into_result().map(|_| ()),
    }
}

/// Ctrl-C: stop at the next stage boundary. The stage in flight finishes.
fn on_interrupt(cancel: &CancellationToken) {
    eprintln!("Interrupted: stopping after the current stage.");
    cancel.cancel();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
