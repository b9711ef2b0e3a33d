//! Terminal rendering of run events.

use autoshop_contracts::{error::ShopResult, execution::RunEvent};
use autoshop_core::RunObserver;

/// Prints each stage's result under its heading as soon as it arrives.
pub struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn notify(&self, event: &RunEvent) -> ShopResult<()> {
        match event {
            RunEvent::StageCompleted { record, .. } => {
                println!("── {} ──", record.stage.title());
                if record.attempts > 1 {
                    println!("  (succeeded on attempt {})", record.attempts);
                }
                println!("{}", record.result.trim_end());
                println!();
            }
            RunEvent::StageFailed {
                stage,
                attempts,
                cause,
                ..
            } => {
                println!("── {} ──", stage.title());
                println!("  FAILED after {} attempt(s): {}", attempts, cause);
                println!();
            }
            RunEvent::RunFinished { .. } => {}
        }
        Ok(())
    }
}
