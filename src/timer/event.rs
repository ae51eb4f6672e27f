//! Events produced by timer recomputation

use serde::{Deserialize, Serialize};

/// Something that became due during a recompute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// An intermediate reminder offset was reached
    Reminder { offset_minutes: u64, label: String },
    /// The countdown reached zero
    Completed { label: String },
}

impl TimerEvent {
    pub fn label(&self) -> &str {
        match self {
            Self::Reminder { label, .. } | Self::Completed { label } => label,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}
