//! Main application state management

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex as StdMutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

use super::{BoardSnapshot, FiredEvent, TimerSnapshot};
use crate::{
    error::TimerError,
    recipe::DisplaySettings,
    services::{Authorization, Notifier, ReminderDispatcher},
    timer::{Clock, Timer, TimerEvent, TimerKind},
};

/// How many fired events are kept for `/events`
const EVENT_HISTORY: usize = 100;

/// Default lengths, in minutes, for the wizard timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDefaults {
    pub autolyse_minutes: u64,
    pub bulk_minutes: u64,
    pub bake_minutes: u64,
}

impl TimerDefaults {
    pub fn minutes_for(&self, kind: TimerKind) -> u64 {
        match kind {
            TimerKind::Autolyse => self.autolyse_minutes,
            TimerKind::Bulk => self.bulk_minutes,
            TimerKind::Bake => self.bake_minutes,
        }
    }
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            autolyse_minutes: 30,
            bulk_minutes: 90,
            bake_minutes: 35,
        }
    }
}

/// Main application state that owns the wizard timers
pub struct AppState {
    /// One independent timer per kind. Held across notification delivery so a
    /// cancel cannot slip in between an event becoming due and its delivery.
    board: Mutex<BTreeMap<TimerKind, Timer>>,
    pub defaults: TimerDefaults,
    pub display: DisplaySettings,
    clock: Arc<dyn Clock>,
    dispatcher: ReminderDispatcher,
    /// Server metadata
    pub start_time: Instant,
    /// Last reconcile tracking
    last_reconcile: StdMutex<Option<(String, DateTime<Utc>)>>,
    history: StdMutex<VecDeque<FiredEvent>>,
    /// Fired reminders and completions
    pub event_tx: broadcast::Sender<FiredEvent>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<BoardSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<BoardSnapshot>,
}

impl AppState {
    /// Create the state with every timer idle at its default length
    pub fn new(
        defaults: TimerDefaults,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, TimerError> {
        let mut board = BTreeMap::new();
        for kind in TimerKind::ALL {
            board.insert(kind, kind.build(defaults.minutes_for(kind))?);
        }

        let (event_tx, _) = broadcast::channel(100);
        let (timer_update_tx, timer_update_rx) = watch::channel(BoardSnapshot::empty());

        let state = Self {
            board: Mutex::new(board),
            defaults,
            display: DisplaySettings::default(),
            clock,
            dispatcher: ReminderDispatcher::new(notifier),
            start_time: Instant::now(),
            last_reconcile: StdMutex::new(None),
            history: StdMutex::new(VecDeque::with_capacity(EVENT_HISTORY)),
            event_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        };
        Ok(state)
    }

    pub fn with_display(mut self, display: DisplaySettings) -> Self {
        self.display = display;
        self
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn authorization(&self) -> Authorization {
        self.dispatcher.authorization()
    }

    /// Start a fresh run. Only bulk and bake accept a custom length.
    pub async fn start(
        &self,
        kind: TimerKind,
        minutes: Option<u64>,
    ) -> Result<TimerSnapshot, TimerError> {
        let minutes = match minutes {
            Some(m) if kind.accepts_length() => m,
            Some(m) => {
                debug!("Ignoring requested length {}min for fixed {} timer", m, kind);
                self.defaults.minutes_for(kind)
            }
            None => self.defaults.minutes_for(kind),
        };

        let mut board = self.board.lock().await;
        let mut timer = kind.build(minutes)?;
        timer.start(timer.duration_seconds(), self.now_ms())?;
        info!("Started {} timer for {} minutes", kind, minutes);

        self.dispatcher.prepare_run().await;

        board.insert(kind, timer);
        Ok(self.snapshot_of(&mut board, kind))
    }

    pub async fn pause(&self, kind: TimerKind) -> Result<TimerSnapshot, TimerError> {
        let mut board = self.board.lock().await;
        let now = self.now_ms();
        let (events, duration_minutes) = {
            let timer = Self::timer_mut(&mut board, kind);
            (timer.pause(now)?, timer.duration_seconds() / 60)
        };
        info!("Paused {} timer", kind);

        self.handle_events(kind, duration_minutes, &events).await;
        Ok(self.snapshot_of(&mut board, kind))
    }

    pub async fn resume(&self, kind: TimerKind) -> Result<TimerSnapshot, TimerError> {
        let mut board = self.board.lock().await;
        let now = self.now_ms();
        Self::timer_mut(&mut board, kind).resume(now)?;
        info!("Resumed {} timer", kind);
        Ok(self.snapshot_of(&mut board, kind))
    }

    /// Stop a timer. Once this returns nothing more is delivered for the run.
    pub async fn cancel(&self, kind: TimerKind) -> TimerSnapshot {
        let mut board = self.board.lock().await;
        Self::timer_mut(&mut board, kind).cancel();
        info!("Cancelled {} timer", kind);
        self.snapshot_of(&mut board, kind)
    }

    pub async fn snapshot(&self, kind: TimerKind) -> TimerSnapshot {
        let mut board = self.board.lock().await;
        TimerSnapshot::new(kind, Self::timer_mut(&mut board, kind))
    }

    pub async fn snapshots(&self) -> BoardSnapshot {
        let board = self.board.lock().await;
        self.board_snapshot(&board)
    }

    /// Recompute every timer against the clock and deliver whatever became due.
    /// Safe to call redundantly; each reminder fires at most once per run.
    pub async fn reconcile(&self, reason: &str) -> BoardSnapshot {
        let mut board = self.board.lock().await;
        let now = self.now_ms();

        let mut fired = Vec::new();
        for (kind, timer) in board.iter_mut() {
            let events = timer.recompute(now);
            if !events.is_empty() {
                fired.push((*kind, timer.duration_seconds() / 60, events));
            }
        }

        for (kind, duration_minutes, events) in &fired {
            info!("{} {} event(s) fired on {}", events.len(), kind, reason);
            self.handle_events(*kind, *duration_minutes, events).await;
        }

        if reason != "tick" {
            debug!("Reconciled timers on {}", reason);
            if let Ok(mut last) = self.last_reconcile.lock() {
                *last = Some((reason.to_string(), Utc::now()));
            }
        }

        self.publish(&board)
    }

    /// Most recent fired events, oldest first
    pub fn recent_events(&self) -> Vec<FiredEvent> {
        self.history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Last out-of-band reconcile (wake-up or visibility)
    pub fn last_reconcile(&self) -> Option<(String, DateTime<Utc>)> {
        self.last_reconcile.lock().ok().and_then(|r| r.clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    fn timer_mut(board: &mut BTreeMap<TimerKind, Timer>, kind: TimerKind) -> &mut Timer {
        // Every kind is inserted in `new` and only ever replaced.
        board.entry(kind).or_insert_with(|| Timer::new(0))
    }

    fn snapshot_of(
        &self,
        board: &mut BTreeMap<TimerKind, Timer>,
        kind: TimerKind,
    ) -> TimerSnapshot {
        let snapshot = TimerSnapshot::new(kind, Self::timer_mut(board, kind));
        self.publish(board);
        snapshot
    }

    async fn handle_events(&self, kind: TimerKind, duration_minutes: u64, events: &[TimerEvent]) {
        if events.is_empty() {
            return;
        }

        let fired_at = Utc::now();
        for event in events {
            let fired = FiredEvent {
                kind,
                event: event.clone(),
                fired_at,
            };

            if let Ok(mut history) = self.history.lock() {
                if history.len() == EVENT_HISTORY {
                    history.pop_front();
                }
                history.push_back(fired.clone());
            }

            // No subscribers is fine.
            let _ = self.event_tx.send(fired);
        }

        let delivered = self.dispatcher.dispatch(kind, duration_minutes, events).await;
        debug!("Delivered {}/{} {} notification(s)", delivered, events.len(), kind);
    }

    fn board_snapshot(&self, board: &BTreeMap<TimerKind, Timer>) -> BoardSnapshot {
        BoardSnapshot {
            timers: board
                .iter()
                .map(|(kind, timer)| TimerSnapshot::new(*kind, timer))
                .collect(),
            authorization: self.dispatcher.authorization(),
            taken_at: Utc::now(),
        }
    }

    fn publish(&self, board: &BTreeMap<TimerKind, Timer>) -> BoardSnapshot {
        let snapshot = self.board_snapshot(board);
        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }
        snapshot
    }
}
