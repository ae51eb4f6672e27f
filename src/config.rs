//! Configuration and CLI argument handling

use std::time::Duration;

use anyhow::ensure;
use clap::Parser;

use crate::{
    recipe::{DisplaySettings, TempUnit},
    services::{Authorization, NotifierKind},
    state::TimerDefaults,
};

/// Longest default length accepted on the command line, one week
const MAX_TIMER_MINUTES: u64 = 7 * 24 * 60;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "proof-timer")]
#[command(about = "Bake timers that keep counting while the host sleeps")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20580")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timer recompute period in milliseconds
    #[arg(long, default_value = "250")]
    pub tick_ms: u64,

    /// Seconds between checks for a system wake-up
    #[arg(long, default_value = "5")]
    pub wake_check_secs: u64,

    /// Autolyse length in minutes
    #[arg(long, default_value = "30")]
    pub autolyse_minutes: u64,

    /// Default bulk ferment length in minutes
    #[arg(long, default_value = "90")]
    pub bulk_minutes: u64,

    /// Default bake length in minutes
    #[arg(long, default_value = "35")]
    pub bake_minutes: u64,

    /// How reminders are delivered
    #[arg(long, value_enum, default_value = "desktop")]
    pub notifier: NotifierKind,

    /// Initial notification permission for the desktop notifier
    #[arg(long, value_enum, default_value = "default")]
    pub authorization: Authorization,

    /// Temperature unit for display
    #[arg(long, value_enum, default_value = "c")]
    pub temp_unit: TempUnit,

    /// Oven temperature in Celsius
    #[arg(long, default_value = "250")]
    pub oven_temp: i32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject settings the timers cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=1000).contains(&self.tick_ms),
            "--tick-ms must be between 1 and 1000, got {}",
            self.tick_ms
        );
        ensure!(self.wake_check_secs > 0, "--wake-check-secs must be positive");
        ensure!(
            self.autolyse_minutes > 0 && self.bulk_minutes > 0 && self.bake_minutes > 0,
            "timer lengths must be positive"
        );
        ensure!(
            [self.autolyse_minutes, self.bulk_minutes, self.bake_minutes]
                .iter()
                .all(|m| *m <= MAX_TIMER_MINUTES),
            "timer lengths must be at most {} minutes",
            MAX_TIMER_MINUTES
        );
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn wake_check_period(&self) -> Duration {
        Duration::from_secs(self.wake_check_secs)
    }

    pub fn timer_defaults(&self) -> TimerDefaults {
        TimerDefaults {
            autolyse_minutes: self.autolyse_minutes,
            bulk_minutes: self.bulk_minutes,
            bake_minutes: self.bake_minutes,
        }
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            temp_unit: self.temp_unit,
            oven_temp_c: self.oven_temp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["proof-timer"]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.address(), "127.0.0.1:20580");
        assert_eq!(config.tick_period(), Duration::from_millis(250));
        assert_eq!(config.timer_defaults(), TimerDefaults::default());
        assert_eq!(config.notifier, NotifierKind::Desktop);
        assert_eq!(config.authorization, Authorization::Default);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_rejects_coarse_tick() {
        let config = Config::try_parse_from(["proof-timer", "--tick-ms", "2000"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overlong_lengths() {
        let args = ["proof-timer", "--bake-minutes", "400000000000000000"];
        let config = Config::try_parse_from(args).unwrap();
        assert!(config.validate().is_err());

        let config = Config::try_parse_from(["proof-timer", "--bulk-minutes", "10080"]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parses_enums() {
        let config = Config::try_parse_from([
            "proof-timer",
            "--notifier",
            "log",
            "--temp-unit",
            "f",
            "--authorization",
            "granted",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.notifier, NotifierKind::Log);
        assert_eq!(config.display_settings().oven_temp(), "482°F");
        assert_eq!(config.authorization, Authorization::Granted);
        assert_eq!(config.log_level(), "debug");
    }
}
