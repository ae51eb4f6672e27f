//! Wall-clock sources

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of absolute time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Reads the system wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Before 1970 is treated as the epoch.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Hand-driven clock, used to simulate suspension and clock jumps
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.now.fetch_add(secs * 1000, Ordering::SeqCst);
    }

    pub fn rewind_secs(&self, secs: u64) {
        let now = self.now.load(Ordering::SeqCst);
        self.now.store(now.saturating_sub(secs * 1000), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
