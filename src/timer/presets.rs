//! The three bake-wizard timers and their notification texts

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Reminder, ReminderSchedule, Timer, TimerEvent};
use crate::error::TimerError;

/// Stretch-and-fold reminder offsets for bulk ferment, in minutes
pub const BULK_REMINDER_MINUTES: [u64; 6] = [30, 60, 90, 120, 150, 180];

const APP_NAME: &str = "Crumb";

/// Which wizard timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Autolyse,
    Bulk,
    Bake,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::Autolyse, TimerKind::Bulk, TimerKind::Bake];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autolyse => "autolyse",
            Self::Bulk => "bulk",
            Self::Bake => "bake",
        }
    }

    /// Whether the caller may choose the length at start
    pub fn accepts_length(&self) -> bool {
        !matches!(self, Self::Autolyse)
    }

    fn completion_label(&self) -> &'static str {
        match self {
            Self::Autolyse => "Autolyse complete! 🍞",
            Self::Bulk => "Proofing complete! 🎉",
            Self::Bake => "Bake complete!",
        }
    }

    /// Build an idle timer of `minutes` for this kind
    pub fn build(&self, minutes: u64) -> Result<Timer, TimerError> {
        let seconds = minutes.checked_mul(60).ok_or(TimerError::InvalidDuration)?;
        let timer = Timer::new(seconds).with_completion_label(self.completion_label());
        Ok(match self {
            Self::Autolyse => timer.pausable(),
            Self::Bulk => timer.with_reminders(bulk_schedule()?),
            Self::Bake => timer,
        })
    }

    /// Title and body of the system notification for `event`
    pub fn notification(&self, duration_minutes: u64, event: &TimerEvent) -> (String, String) {
        let body = match (self, event) {
            (_, TimerEvent::Reminder { offset_minutes, .. }) => format!(
                "{} minutes remaining.",
                duration_minutes.saturating_sub(*offset_minutes)
            ),
            (Self::Autolyse, TimerEvent::Completed { .. }) => {
                "Time to add your starter.".to_string()
            }
            (Self::Bulk, TimerEvent::Completed { .. }) => {
                "Your dough is ready to shape.".to_string()
            }
            (Self::Bake, TimerEvent::Completed { .. }) => {
                "Take your loaf out of the oven.".to_string()
            }
        };
        (format!("{} — {}", APP_NAME, event.label()), body)
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autolyse" => Ok(Self::Autolyse),
            "bulk" => Ok(Self::Bulk),
            "bake" => Ok(Self::Bake),
            other => Err(format!("unknown timer: {}", other)),
        }
    }
}

/// Stretch-and-fold reminders, one every half hour up to three hours
pub fn bulk_schedule() -> Result<ReminderSchedule, TimerError> {
    ReminderSchedule::new(
        BULK_REMINDER_MINUTES
            .iter()
            .map(|m| Reminder::new(*m, format!("Proofing check: {} min", m)))
            .collect(),
    )
}
