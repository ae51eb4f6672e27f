//! API request and response structures

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    recipe::{BakersPercentages, TempUnit},
    services::Authorization,
    state::{FiredEvent, TimerSnapshot},
};

/// Body of `POST /timers/:kind/start`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    /// Length in minutes; ignored by the fixed-length autolyse timer
    pub minutes: Option<u64>,
}

/// Response for timer operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl TimerResponse {
    pub fn ok(message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Error body returned with a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build an error response with `code`
pub fn api_error(code: StatusCode, message: impl Into<String>) -> ApiError {
    (code, Json(ErrorResponse::new(message.into())))
}

impl From<TimerError> for ErrorResponse {
    fn from(e: TimerError) -> Self {
        Self::new(e.to_string())
    }
}

/// Map a timer error to 400 (bad configuration) or 409 (bad transition)
pub fn timer_error(e: TimerError) -> ApiError {
    let code = if e.is_configuration() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CONFLICT
    };
    (code, Json(e.into()))
}

/// Recently fired reminders and completions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<FiredEvent>,
    pub authorization: Authorization,
}

/// Display and timer settings the client renders with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub temp_unit: TempUnit,
    pub oven_temp: String,
    pub autolyse_minutes: u64,
    pub bulk_minutes: u64,
    pub bake_minutes: u64,
    pub bulk_choices: Vec<u64>,
}

/// Baker's percentages for a posted recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentagesResponse {
    #[serde(flatten)]
    pub percentages: BakersPercentages,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub last_reconcile: Option<String>,
    pub last_reconcile_time: Option<DateTime<Utc>>,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String, last_reconcile: Option<(String, DateTime<Utc>)>) -> Self {
        let (last_reconcile, last_reconcile_time) = match last_reconcile {
            Some((reason, at)) => (Some(reason), Some(at)),
            None => (None, None),
        };

        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            last_reconcile,
            last_reconcile_time,
        }
    }
}
