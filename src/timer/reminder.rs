//! Reminder schedules fired relative to a timer's elapsed active time

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// A single reminder, `offset_minutes` after the timer started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub offset_minutes: u64,
    pub label: String,
}

impl Reminder {
    pub fn new(offset_minutes: u64, label: impl Into<String>) -> Self {
        Self {
            offset_minutes,
            label: label.into(),
        }
    }

    pub fn offset_seconds(&self) -> u64 {
        self.offset_minutes.saturating_mul(60)
    }
}

/// Ordered reminder offsets plus the set already fired in the current run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    reminders: Vec<Reminder>,
    fired: BTreeSet<u64>,
}

impl ReminderSchedule {
    /// Build a schedule, rejecting zero and duplicate offsets.
    /// Reminders are kept in ascending offset order regardless of input order.
    pub fn new(mut reminders: Vec<Reminder>) -> Result<Self, TimerError> {
        reminders.sort_by_key(|r| r.offset_minutes);

        for (i, reminder) in reminders.iter().enumerate() {
            if reminder.offset_minutes == 0 {
                return Err(TimerError::InvalidOffset(0));
            }
            if i > 0 && reminders[i - 1].offset_minutes == reminder.offset_minutes {
                return Err(TimerError::DuplicateOffset(reminder.offset_minutes));
            }
        }

        Ok(Self {
            reminders,
            fired: BTreeSet::new(),
        })
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Offsets fired so far in this run, ascending
    pub fn fired(&self) -> Vec<u64> {
        self.fired.iter().copied().collect()
    }

    pub fn label_for(&self, offset_minutes: u64) -> Option<&str> {
        self.reminders
            .iter()
            .find(|r| r.offset_minutes == offset_minutes)
            .map(|r| r.label.as_str())
    }

    /// Clear the fired set for a new run
    pub fn reset(&mut self) {
        self.fired.clear();
    }

    /// Every offset due at `elapsed_seconds` that has not fired yet, ascending.
    /// Returned offsets are recorded as fired and never returned again this run.
    pub fn on_fired_reminders(&mut self, elapsed_seconds: u64) -> Vec<u64> {
        let due: Vec<u64> = self
            .reminders
            .iter()
            .take_while(|r| r.offset_seconds() <= elapsed_seconds)
            .map(|r| r.offset_minutes)
            .filter(|offset| !self.fired.contains(offset))
            .collect();

        self.fired.extend(due.iter().copied());
        due
    }
}
