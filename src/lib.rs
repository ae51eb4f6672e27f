//! Proof Timer - wall-clock reconciling bake timers
//!
//! This library provides the countdown timers used while baking sourdough
//! (autolyse, bulk ferment with stretch-and-fold reminders, oven bake). Timers
//! are anchored to absolute end timestamps so they stay correct across host
//! suspension, and reminders are delivered through an injected notifier.

pub mod api;
pub mod config;
pub mod error;
pub mod recipe;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use timer::{Timer, TimerEvent, TimerKind, TimerStatus};
pub use utils::signals::shutdown_signal;
