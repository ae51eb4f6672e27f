//! Concrete notifiers

use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::ValueEnum;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::notifier::{Authorization, Notifier};

/// Which notifier to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotifierKind {
    /// Desktop notifications through notify-send
    Desktop,
    /// Write notifications to the log only
    Log,
    /// No notifications
    Off,
}

/// Build the notifier selected on the command line
pub fn build_notifier(kind: NotifierKind, initial: Authorization) -> Arc<dyn Notifier> {
    match kind {
        NotifierKind::Desktop => Arc::new(DesktopNotifier::new(initial)),
        NotifierKind::Log => Arc::new(LogNotifier),
        NotifierKind::Off => Arc::new(DisabledNotifier),
    }
}

/// Shows notifications with `notify-send`
#[derive(Debug)]
pub struct DesktopNotifier {
    authorization: Mutex<Authorization>,
}

impl DesktopNotifier {
    pub fn new(initial: Authorization) -> Self {
        Self {
            authorization: Mutex::new(initial),
        }
    }

    fn set_authorization(&self, value: Authorization) {
        match self.authorization.lock() {
            Ok(mut authorization) => *authorization = value,
            Err(e) => warn!("Failed to lock authorization state: {}", e),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn current_authorization(&self) -> Authorization {
        self.authorization
            .lock()
            .map(|a| *a)
            .unwrap_or(Authorization::Denied)
    }

    /// Granted when notify-send is installed and runs
    async fn request_authorization(&self) -> Authorization {
        debug!("Probing for notify-send");

        let result = match Command::new("notify-send").arg("--version").output().await {
            Ok(output) if output.status.success() => Authorization::Granted,
            Ok(output) => {
                warn!(
                    "notify-send probe failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                );
                Authorization::Denied
            }
            Err(e) => {
                warn!("notify-send is not available: {}", e);
                Authorization::Denied
            }
        };

        self.set_authorization(result);
        result
    }

    async fn deliver(&self, title: &str, body: &str) -> anyhow::Result<()> {
        let output = Command::new("notify-send")
            .args(["--app-name", "Crumb", title, body])
            .output()
            .await
            .context("Failed to execute notify-send")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("notify-send failed: {}", stderr);
        }

        info!("Notification shown: {}", title);
        Ok(())
    }
}

/// Logs notifications instead of showing them
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn current_authorization(&self) -> Authorization {
        Authorization::Granted
    }

    async fn request_authorization(&self) -> Authorization {
        Authorization::Granted
    }

    async fn deliver(&self, title: &str, body: &str) -> anyhow::Result<()> {
        info!("{}: {}", title, body);
        Ok(())
    }
}

/// Never authorized; reminders are still tracked and broadcast in-app
#[derive(Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    fn current_authorization(&self) -> Authorization {
        Authorization::Denied
    }

    async fn request_authorization(&self) -> Authorization {
        Authorization::Denied
    }

    async fn deliver(&self, _title: &str, _body: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
