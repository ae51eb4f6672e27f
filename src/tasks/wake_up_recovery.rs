//! Wake-up recovery background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Instant};
use tracing::info;

use crate::state::AppState;

/// Wall-clock surplus over monotonic time that counts as a suspension
const SUSPEND_THRESHOLD_MS: u64 = 2_000;

/// How long the host slept, if the wall clock ran ahead of the monotonic
/// clock by more than the threshold between two checks
pub fn suspended_for(wall_elapsed_ms: u64, monotonic_elapsed_ms: u64) -> Option<u64> {
    let gap = wall_elapsed_ms.saturating_sub(monotonic_elapsed_ms);
    (gap > SUSPEND_THRESHOLD_MS).then_some(gap)
}

/// Background task that detects system wake-up and reconciles the timers
/// immediately instead of waiting for the next tick
pub async fn wake_up_recovery_task(state: Arc<AppState>, check_every: Duration) {
    info!("Starting wake-up recovery task");

    let mut interval = interval(check_every);
    let mut last_monotonic = Instant::now();
    let mut last_wall = state.now_ms();

    loop {
        interval.tick().await;

        let monotonic_elapsed = last_monotonic.elapsed().as_millis() as u64;
        let wall_elapsed = state.now_ms().saturating_sub(last_wall);

        if let Some(gap) = suspended_for(wall_elapsed, monotonic_elapsed) {
            info!("System wake-up detected after ~{}s, reconciling timers", gap / 1000);
            state.reconcile("wake-up").await;
        }

        last_monotonic = Instant::now();
        last_wall = state.now_ms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspension_detection() {
        assert_eq!(suspended_for(5_000, 5_000), None);
        assert_eq!(suspended_for(6_900, 5_000), None);
        assert_eq!(suspended_for(3_605_000, 5_000), Some(3_600_000));
    }

    #[test]
    fn test_clock_set_backwards_is_not_a_wake_up() {
        assert_eq!(suspended_for(0, 5_000), None);
    }
}
