//! State management module
//!
//! This module contains the timer board and its serializable snapshots.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerDefaults};
pub use timer_state::{BoardSnapshot, FiredEvent, TimerSnapshot};
