//! Notification capability and reminder dispatch

use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::timer::{TimerEvent, TimerKind};

/// Permission to show system notifications, shared by every timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Authorization {
    /// Not asked yet
    Default,
    Granted,
    Denied,
}

/// Something that can show a user-facing alert
#[async_trait]
pub trait Notifier: Send + Sync {
    fn current_authorization(&self) -> Authorization;

    /// Ask for permission, returning the resulting state
    async fn request_authorization(&self) -> Authorization;

    async fn deliver(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

/// Turns timer events into notifications, honouring authorization
#[derive(Clone)]
pub struct ReminderDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl ReminderDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn authorization(&self) -> Authorization {
        self.notifier.current_authorization()
    }

    /// Called once when a run starts. Asks for permission only if it was
    /// never asked before.
    pub async fn prepare_run(&self) -> Authorization {
        match self.notifier.current_authorization() {
            Authorization::Default => {
                info!("Requesting notification authorization");
                let result = self.notifier.request_authorization().await;
                info!("Notification authorization is now {:?}", result);
                result
            }
            current => current,
        }
    }

    /// Deliver each event as a notification if authorized.
    /// Returns how many notifications went out.
    pub async fn dispatch(
        &self,
        kind: TimerKind,
        duration_minutes: u64,
        events: &[TimerEvent],
    ) -> usize {
        if events.is_empty() {
            return 0;
        }

        let authorization = self.notifier.current_authorization();
        if authorization != Authorization::Granted {
            debug!(
                "Skipping {} {} notification(s), authorization is {:?}",
                events.len(),
                kind,
                authorization
            );
            return 0;
        }

        let mut delivered = 0;
        for event in events {
            let (title, body) = kind.notification(duration_minutes, event);
            match self.notifier.deliver(&title, &body).await {
                Ok(()) => {
                    debug!("Delivered notification: {}", title);
                    delivered += 1;
                }
                Err(e) => warn!("Failed to deliver notification '{}': {}", title, e),
            }
        }
        delivered
    }
}
