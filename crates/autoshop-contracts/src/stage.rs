//! The five pipeline stages.
//!
//! The stage list is fixed: every run walks `Intake → Scanning → Analysis →
//! QualityControl → Storage` in that order and never skips or repeats one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StageId {
    Intake,
    Scanning,
    Analysis,
    QualityControl,
    Storage,
}

impl StageId {
    /// Every stage in execution order.
    pub const ALL: [StageId; 5] = [
        StageId::Intake,
        StageId::Scanning,
        StageId::Analysis,
        StageId::QualityControl,
        StageId::Storage,
    ];

    /// Stable machine name, used in events, logs and config keys.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Intake => "Intake",
            StageId::Scanning => "Scanning",
            StageId::Analysis => "Analysis",
            StageId::QualityControl => "QualityControl",
            StageId::Storage => "Storage",
        }
    }

    /// Heading shown to the user next to the stage's result.
    pub fn title(&self) -> &'static str {
        match self {
            StageId::Intake => "Client Intake",
            StageId::Scanning => "Vehicle Scanning",
            StageId::Analysis => "Mechanics Analysis",
            StageId::QualityControl => "Quality Control",
            StageId::Storage => "Data Storage",
        }
    }

    /// Zero-based position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            StageId::Intake => 0,
            StageId::Scanning => 1,
            StageId::Analysis => 2,
            StageId::QualityControl => 3,
            StageId::Storage => 4,
        }
    }

    /// The stage that runs after this one, or `None` after `Storage`.
    pub fn next(&self) -> Option<StageId> {
        StageId::ALL.get(self.index() + 1).copied()
    }

    /// Look a stage up by its machine name.
    pub fn from_name(name: &str) -> Option<StageId> {
        StageId::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
