//! Countdown anchored to an absolute end timestamp
//!
//! Remaining time is always derived from `end_timestamp_ms` and the caller's
//! notion of "now", so a host that stops ticking for minutes or hours loses
//! nothing: the next recompute catches up in one step.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ReminderSchedule, TimerEvent};
use crate::error::TimerError;

/// Lifecycle status of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// A single countdown timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    duration_seconds: u64,
    end_timestamp_ms: u64,
    remaining_seconds: u64,
    status: TimerStatus,
    pausable: bool,
    schedule: Option<ReminderSchedule>,
    completion_label: String,
}

impl Timer {
    /// Create an idle timer showing `duration_seconds`
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            duration_seconds,
            end_timestamp_ms: 0,
            remaining_seconds: duration_seconds,
            status: TimerStatus::Idle,
            pausable: false,
            schedule: None,
            completion_label: "Timer complete".to_string(),
        }
    }

    /// Allow pause/resume on this timer
    pub fn pausable(mut self) -> Self {
        self.pausable = true;
        self
    }

    pub fn with_reminders(mut self, schedule: ReminderSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_completion_label(mut self, label: impl Into<String>) -> Self {
        self.completion_label = label.into();
        self
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn end_timestamp_ms(&self) -> u64 {
        self.end_timestamp_ms
    }

    pub fn is_pausable(&self) -> bool {
        self.pausable
    }

    /// Active time consumed by the current run, excluding paused spans
    pub fn elapsed_seconds(&self) -> u64 {
        self.duration_seconds.saturating_sub(self.remaining_seconds)
    }

    pub fn schedule(&self) -> Option<&ReminderSchedule> {
        self.schedule.as_ref()
    }

    /// Reminder offsets fired in the current run
    pub fn fired_offsets(&self) -> Vec<u64> {
        self.schedule
            .as_ref()
            .map(ReminderSchedule::fired)
            .unwrap_or_default()
    }

    /// Begin a new run of `duration_seconds` from `now_ms`.
    ///
    /// Valid from any state; a running timer is restarted and its fired
    /// reminders are forgotten.
    pub fn start(&mut self, duration_seconds: u64, now_ms: u64) -> Result<(), TimerError> {
        if duration_seconds == 0 {
            return Err(TimerError::InvalidDuration);
        }
        let end_timestamp_ms = duration_seconds
            .checked_mul(1000)
            .and_then(|ms| now_ms.checked_add(ms))
            .ok_or(TimerError::InvalidDuration)?;

        self.duration_seconds = duration_seconds;
        self.end_timestamp_ms = end_timestamp_ms;
        self.remaining_seconds = duration_seconds;
        self.status = TimerStatus::Running;
        if let Some(schedule) = &mut self.schedule {
            schedule.reset();
        }

        info!("Timer started for {}s, ends at {}", duration_seconds, self.end_timestamp_ms);
        Ok(())
    }

    /// Freeze the countdown. Events that became due right before the pause
    /// are returned; if the timer completed in that recompute it stays completed.
    pub fn pause(&mut self, now_ms: u64) -> Result<Vec<TimerEvent>, TimerError> {
        if self.status != TimerStatus::Running {
            return Err(TimerError::NotRunning);
        }
        if !self.pausable {
            return Err(TimerError::PauseUnsupported);
        }

        let events = self.recompute(now_ms);
        if self.status == TimerStatus::Running {
            self.end_timestamp_ms = 0;
            self.status = TimerStatus::Paused;
            info!("Timer paused with {}s remaining", self.remaining_seconds);
        }
        Ok(events)
    }

    /// Continue a paused countdown; paused time does not count as elapsed
    pub fn resume(&mut self, now_ms: u64) -> Result<(), TimerError> {
        if self.status != TimerStatus::Paused {
            return Err(TimerError::NotPaused);
        }

        // Remaining never exceeds a duration that `start` proved fits in millis.
        self.end_timestamp_ms = now_ms.saturating_add(self.remaining_seconds * 1000);
        self.status = TimerStatus::Running;
        info!("Timer resumed with {}s remaining", self.remaining_seconds);
        Ok(())
    }

    /// Stop the current run. Nothing fires for this run afterwards.
    pub fn cancel(&mut self) {
        if self.status != TimerStatus::Idle {
            info!("Timer cancelled with {}s remaining", self.remaining_seconds);
        }
        self.end_timestamp_ms = 0;
        self.status = TimerStatus::Idle;
    }

    /// Derive remaining time from the end timestamp and report what became due.
    ///
    /// Only a running timer changes. Reminders come out in ascending offset
    /// order, followed by the completion event when the countdown hits zero.
    /// A reminder whose offset equals the full duration is folded into the
    /// completion event.
    pub fn recompute(&mut self, now_ms: u64) -> Vec<TimerEvent> {
        if self.status != TimerStatus::Running {
            return Vec::new();
        }

        let duration_ms = self.duration_seconds * 1000;
        // A wall clock moved backwards can put `end - now` past the full
        // duration; clamp so remaining never exceeds the configured length.
        let left_ms = self.end_timestamp_ms.saturating_sub(now_ms).min(duration_ms);
        self.remaining_seconds = left_ms.div_ceil(1000);
        let elapsed_seconds = (duration_ms - left_ms) / 1000;

        let mut events = Vec::new();
        if let Some(schedule) = &mut self.schedule {
            for offset in schedule.on_fired_reminders(elapsed_seconds) {
                if offset.saturating_mul(60) >= self.duration_seconds {
                    continue;
                }
                let label = schedule.label_for(offset).unwrap_or_default().to_string();
                events.push(TimerEvent::Reminder {
                    offset_minutes: offset,
                    label,
                });
            }
        }

        if self.remaining_seconds == 0 {
            self.status = TimerStatus::Completed;
            self.end_timestamp_ms = 0;
            info!("Timer completed after {}s", self.duration_seconds);
            events.push(TimerEvent::Completed {
                label: self.completion_label.clone(),
            });
        }

        if !events.is_empty() {
            debug!("Recompute at {} produced {} event(s)", now_ms, events.len());
        }
        events
    }
}

/// Format seconds as `MM:SS`, minutes unbounded
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Reminder;

    const T0: u64 = 1_700_000_000_000;
    const MIN: u64 = 60_000;

    fn bulk(offsets: &[u64]) -> Timer {
        let reminders = offsets
            .iter()
            .map(|m| Reminder::new(*m, format!("Proofing check: {m} min")))
            .collect();
        Timer::new(0)
            .with_reminders(ReminderSchedule::new(reminders).unwrap())
            .with_completion_label("Proofing complete!")
    }

    fn reminder_offsets(events: &[TimerEvent]) -> Vec<u64> {
        events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::Reminder { offset_minutes, .. } => Some(*offset_minutes),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_sets_running_with_full_duration() {
        for duration in [1, 59, 1800, 10_800] {
            let mut timer = Timer::new(0);
            timer.start(duration, T0).unwrap();
            assert_eq!(timer.status(), TimerStatus::Running);
            assert_eq!(timer.remaining_seconds(), duration);
            assert_eq!(timer.end_timestamp_ms(), T0 + duration * 1000);
        }
    }

    #[test]
    fn test_start_rejects_zero_duration() {
        let mut timer = Timer::new(30);
        assert_eq!(timer.start(0, T0), Err(TimerError::InvalidDuration));
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.end_timestamp_ms(), 0);
    }

    #[test]
    fn test_start_rejects_duration_past_clock_range() {
        let mut timer = Timer::new(30);
        assert_eq!(timer.start(u64::MAX / 10, T0), Err(TimerError::InvalidDuration));
        assert_eq!(timer.start(u64::MAX / 1000, T0), Err(TimerError::InvalidDuration));
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.end_timestamp_ms(), 0);
        assert_eq!(timer.remaining_seconds(), 30);
    }

    #[test]
    fn test_elapsed_excludes_paused_time() {
        let mut timer = Timer::new(0).pausable();
        timer.start(30 * 60, T0).unwrap();
        timer.recompute(T0 + 4 * MIN);
        assert_eq!(timer.elapsed_seconds(), 4 * 60);

        timer.pause(T0 + 5 * MIN).unwrap();
        timer.resume(T0 + 65 * MIN).unwrap();
        timer.recompute(T0 + 67 * MIN);
        assert_eq!(timer.elapsed_seconds(), 7 * 60);
    }

    #[test]
    fn test_remaining_rounds_up_partial_seconds() {
        let mut timer = Timer::new(0);
        timer.start(10, T0).unwrap();
        timer.recompute(T0 + 1);
        assert_eq!(timer.remaining_seconds(), 10);
        timer.recompute(T0 + 1000);
        assert_eq!(timer.remaining_seconds(), 9);
        timer.recompute(T0 + 9_999);
        assert_eq!(timer.remaining_seconds(), 1);
    }

    #[test]
    fn test_remaining_is_monotonic_while_running() {
        let mut timer = Timer::new(0);
        timer.start(600, T0).unwrap();
        let mut last = timer.remaining_seconds();
        for step in (0..600_000).step_by(777) {
            timer.recompute(T0 + step);
            assert!(timer.remaining_seconds() <= last);
            last = timer.remaining_seconds();
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut timer = bulk(&[30, 60]);
        timer.start(90 * 60, T0).unwrap();
        let now = T0 + 45 * MIN + 250;

        let first = timer.recompute(now);
        let after_first = timer.clone();
        let second = timer.recompute(now);

        assert_eq!(reminder_offsets(&first), vec![30]);
        assert!(second.is_empty());
        assert_eq!(timer, after_first);
    }

    #[test]
    fn test_catch_up_after_long_suspension() {
        let mut timer = bulk(&[30, 60, 90]);
        timer.start(180 * 60, T0).unwrap();

        let events = timer.recompute(T0 + 95 * MIN);
        assert_eq!(reminder_offsets(&events), vec![30, 60, 90]);
        assert!(timer.recompute(T0 + 95 * MIN).is_empty());
        assert!(timer.recompute(T0 + 96 * MIN).is_empty());
        assert_eq!(timer.status(), TimerStatus::Running);
    }

    #[test]
    fn test_three_hour_bulk_ferment() {
        let mut timer = bulk(&[30, 60, 90, 120, 150, 180]);
        timer.start(10_800, T0).unwrap();

        timer.recompute(T0 + 125 * MIN);
        assert_eq!(timer.fired_offsets(), vec![30, 60, 90, 120]);
        assert_eq!(timer.remaining_seconds(), (180 - 125) * 60);
        assert_eq!(timer.remaining_seconds(), 3300);
    }

    #[test]
    fn test_terminal_offset_becomes_completion() {
        let mut timer = bulk(&[30, 60, 90, 120, 150, 180]);
        timer.start(180 * 60, T0).unwrap();

        let events = timer.recompute(T0 + 200 * MIN);
        assert_eq!(reminder_offsets(&events), vec![30, 60, 90, 120, 150]);
        assert_eq!(
            events.last(),
            Some(&TimerEvent::Completed {
                label: "Proofing complete!".to_string()
            })
        );
        assert_eq!(events.iter().filter(|e| e.is_completion()).count(), 1);
        assert_eq!(timer.status(), TimerStatus::Completed);
    }

    #[test]
    fn test_offsets_beyond_duration_never_fire() {
        let mut timer = bulk(&[30, 60, 90, 120, 150, 180]);
        timer.start(90 * 60, T0).unwrap();

        let events = timer.recompute(T0 + 300 * MIN);
        assert_eq!(reminder_offsets(&events), vec![30, 60]);
        assert_eq!(timer.fired_offsets(), vec![30, 60, 90]);
    }

    #[test]
    fn test_completion_is_terminal() {
        let mut timer = Timer::new(0).with_completion_label("Bake complete!");
        timer.start(60, T0).unwrap();

        let events = timer.recompute(T0 + 60_000);
        assert_eq!(events.len(), 1);
        assert_eq!(timer.status(), TimerStatus::Completed);
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.end_timestamp_ms(), 0);

        for later in [T0 + 61_000, T0 + 3_600_000, T0] {
            assert!(timer.recompute(later).is_empty());
            assert_eq!(timer.remaining_seconds(), 0);
            assert_eq!(timer.status(), TimerStatus::Completed);
        }
    }

    #[test]
    fn test_pause_and_resume_preserve_remaining() {
        let mut timer = Timer::new(0).pausable();
        timer.start(90 * 60, T0).unwrap();

        timer.pause(T0 + 10 * MIN).unwrap();
        assert_eq!(timer.status(), TimerStatus::Paused);
        assert_eq!(timer.remaining_seconds(), 80 * 60);
        assert_eq!(timer.end_timestamp_ms(), 0);

        // Paused timers ignore recompute entirely.
        assert!(timer.recompute(T0 + 500 * MIN).is_empty());
        assert_eq!(timer.remaining_seconds(), 80 * 60);

        let resumed_at = T0 + 600 * MIN;
        timer.resume(resumed_at).unwrap();
        assert_eq!(timer.status(), TimerStatus::Running);
        assert_eq!(timer.remaining_seconds(), 80 * 60);

        timer.recompute(resumed_at);
        assert_eq!(timer.remaining_seconds(), 80 * 60);
        timer.recompute(resumed_at + 5 * MIN);
        assert_eq!(timer.remaining_seconds(), 75 * 60);
    }

    #[test]
    fn test_pause_stretches_reminder_schedule() {
        let mut timer = bulk(&[30, 60]).pausable();
        timer.start(90 * 60, T0).unwrap();

        timer.pause(T0 + 20 * MIN).unwrap();
        timer.resume(T0 + 120 * MIN).unwrap();

        // 20 active minutes before the pause, 9 after: not yet due.
        assert!(timer.recompute(T0 + 129 * MIN).is_empty());
        let events = timer.recompute(T0 + 130 * MIN);
        assert_eq!(reminder_offsets(&events), vec![30]);
    }

    #[test]
    fn test_pause_rejected_when_unsupported_or_idle() {
        let mut idle = Timer::new(60).pausable();
        assert_eq!(idle.pause(T0), Err(TimerError::NotRunning));

        let mut bake = Timer::new(0).with_completion_label("Bake complete!");
        bake.start(60, T0).unwrap();
        assert_eq!(bake.pause(T0 + 1000), Err(TimerError::PauseUnsupported));
        assert_eq!(bake.status(), TimerStatus::Running);
    }

    #[test]
    fn test_resume_requires_paused() {
        let mut timer = Timer::new(0).pausable();
        assert_eq!(timer.resume(T0), Err(TimerError::NotPaused));
        timer.start(60, T0).unwrap();
        assert_eq!(timer.resume(T0), Err(TimerError::NotPaused));
    }

    #[test]
    fn test_pause_after_overdue_completes_instead() {
        let mut timer = Timer::new(0).pausable();
        timer.start(60, T0).unwrap();
        let events = timer.pause(T0 + 120_000).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(timer.status(), TimerStatus::Completed);
    }

    #[test]
    fn test_cancel_stops_fired_set_growth() {
        let mut timer = bulk(&[30, 60, 90]);
        timer.start(120 * 60, T0).unwrap();
        timer.recompute(T0 + 31 * MIN);
        assert_eq!(timer.fired_offsets(), vec![30]);

        timer.cancel();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.end_timestamp_ms(), 0);

        for later in [T0 + 61 * MIN, T0 + 91 * MIN, T0 + 500 * MIN] {
            assert!(timer.recompute(later).is_empty());
        }
        assert_eq!(timer.fired_offsets(), vec![30]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = Timer::new(60);
        timer.cancel();
        let once = timer.clone();
        timer.cancel();
        assert_eq!(timer, once);
    }

    #[test]
    fn test_restart_resets_fired_set() {
        let mut timer = bulk(&[30]);
        timer.start(60 * 60, T0).unwrap();
        timer.recompute(T0 + 40 * MIN);
        assert_eq!(timer.fired_offsets(), vec![30]);

        timer.start(60 * 60, T0 + 50 * MIN).unwrap();
        assert!(timer.fired_offsets().is_empty());
        let events = timer.recompute(T0 + 80 * MIN);
        assert_eq!(reminder_offsets(&events), vec![30]);
    }

    #[test]
    fn test_clock_moved_backwards_is_clamped() {
        let mut timer = bulk(&[30]);
        timer.start(60 * 60, T0).unwrap();
        timer.recompute(T0 - 10 * MIN);
        assert_eq!(timer.remaining_seconds(), 60 * 60);
        assert!(timer.fired_offsets().is_empty());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(30 * 60), "30:00");
        assert_eq!(format_clock(180 * 60), "180:00");
    }
}
