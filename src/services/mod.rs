//! Notification services module
//! 
//! This module contains the notification capability used by the timers and
//! its concrete implementations.

pub mod desktop;
pub mod notifier;

// Re-export main types
pub use desktop::{build_notifier, DesktopNotifier, DisabledNotifier, LogNotifier, NotifierKind};
pub use notifier::{Authorization, Notifier, ReminderDispatcher};
