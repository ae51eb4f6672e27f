//! Wall-clock countdown timers
//!
//! This module contains the timer state machine, reminder schedules and the
//! presets used by the bake wizard.

pub mod clock;
pub mod countdown;
pub mod event;
pub mod presets;
pub mod reminder;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{format_clock, Timer, TimerStatus};
pub use event::TimerEvent;
pub use presets::{bulk_schedule, TimerKind, BULK_REMINDER_MINUTES};
pub use reminder::{Reminder, ReminderSchedule};
