//! Timer error types

use thiserror::Error;

/// Errors raised by timer configuration and state transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("invalid duration: timer length must be at least one second and fit the clock range")]
    InvalidDuration,
    #[error("invalid reminder offset: {0} minutes")]
    InvalidOffset(u64),
    #[error("duplicate reminder offset: {0} minutes")]
    DuplicateOffset(u64),
    #[error("timer does not support pause")]
    PauseUnsupported,
    #[error("timer is not running")]
    NotRunning,
    #[error("timer is not paused")]
    NotPaused,
}

impl TimerError {
    /// Configuration errors are the caller's fault, transition errors are conflicts
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration | Self::InvalidOffset(_) | Self::DuplicateOffset(_)
        )
    }
}
