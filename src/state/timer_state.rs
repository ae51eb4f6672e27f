//! Serializable views of the timer board

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::Authorization;
use crate::timer::{format_clock, Timer, TimerEvent, TimerKind, TimerStatus};

/// Display state of one timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub kind: TimerKind,
    pub status: TimerStatus,
    pub remaining_seconds: u64,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub duration_seconds: u64,
    pub pausable: bool,
    pub fired_offsets: Vec<u64>,
    /// Absolute end in epoch millis, only while running
    pub ends_at_ms: Option<u64>,
}

impl TimerSnapshot {
    pub fn new(kind: TimerKind, timer: &Timer) -> Self {
        let ends_at_ms = match timer.status() {
            TimerStatus::Running => Some(timer.end_timestamp_ms()),
            _ => None,
        };

        Self {
            kind,
            status: timer.status(),
            remaining_seconds: timer.remaining_seconds(),
            display: format_clock(timer.remaining_seconds()),
            duration_seconds: timer.duration_seconds(),
            pausable: timer.is_pausable(),
            fired_offsets: timer.fired_offsets(),
            ends_at_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

/// All wizard timers at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub timers: Vec<TimerSnapshot>,
    pub authorization: Authorization,
    pub taken_at: DateTime<Utc>,
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self {
            timers: Vec::new(),
            authorization: Authorization::Default,
            taken_at: Utc::now(),
        }
    }

    pub fn get(&self, kind: TimerKind) -> Option<&TimerSnapshot> {
        self.timers.iter().find(|t| t.kind == kind)
    }

    pub fn any_running(&self) -> bool {
        self.timers.iter().any(TimerSnapshot::is_running)
    }
}

/// A reminder or completion that fired, for in-app display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub kind: TimerKind,
    pub event: TimerEvent,
    pub fired_at: DateTime<Utc>,
}
