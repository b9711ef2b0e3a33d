//! A deterministic stand-in for the chat service.
//!
//! Used for dry runs (`autoshop run --offline`) and anywhere a run must not
//! leave the machine. Replies depend only on the stage and the prompt.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use autoshop_contracts::{error::DelegateError, stage::StageId};
use autoshop_core::{Delegate, StageDelegates};

/// Replies with a short, reproducible summary of what it was asked.
#[derive(Debug, Clone, Copy)]
pub struct OfflineDelegate {
    stage: StageId,
}

impl OfflineDelegate {
    pub fn new(stage: StageId) -> Self {
        Self { stage }
    }
}

impl Delegate for OfflineDelegate {
    fn generate_reply(&self, prompt: &str) -> Result<String, DelegateError> {
        let digest = hex::encode(Sha256::digest(prompt.as_bytes()));
        Ok(format!(
            "[offline {}] prompt {} ({} chars) acknowledged.",
            self.stage.title(),
            &digest[..12],
            prompt.chars().count()
        ))
    }
}

/// One `OfflineDelegate` per stage.
pub fn offline_delegates() -> StageDelegates {
    StageDelegates::from_fn(|stage| Arc::new(OfflineDelegate::new(stage)))
}

#[cfg(test)]
mod tests {
    use autoshop_contracts::stage::StageId;
    use autoshop_core::Delegate;

    use super::OfflineDelegate;

    #[test]
    fn replies_are_deterministic() {
        let delegate = OfflineDelegate::new(StageId::Analysis);
        let first = delegate.generate_reply("Review the diagnostic report").unwrap();
        let second = delegate.generate_reply("Review the diagnostic report").unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("[offline Mechanics Analysis]"));
    }

    #[test]
    fn different_prompts_differ() {
        let delegate = OfflineDelegate::new(StageId::Storage);
        assert_ne!(
            delegate.generate_reply("a").unwrap(),
            delegate.generate_reply("b").unwrap()
        );
    }
}
