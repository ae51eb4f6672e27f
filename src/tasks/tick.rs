//! Periodic timer recompute task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that recomputes every timer on a fixed period.
///
/// Missed ticks are skipped rather than replayed: the next tick reads the
/// wall clock and catches up in one pass.
pub async fn tick_task(state: Arc<AppState>, period: Duration) {
    info!("Starting timer tick task every {}ms", period.as_millis());

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut was_running = false;
    loop {
        interval.tick().await;

        let board = state.reconcile("tick").await;
        let running = board.any_running();
        if running != was_running {
            debug!("Timers running: {}", running);
            was_running = running;
        }
    }
}
