//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::{
    recipe::Recipe,
    state::{AppState, BoardSnapshot, TimerSnapshot},
    timer::{TimerKind, BULK_REMINDER_MINUTES},
};
use super::responses::{
    api_error, timer_error, ApiError, EventsResponse, HealthResponse, PercentagesResponse,
    SettingsResponse, StartRequest, TimerResponse,
};

fn parse_kind(kind: &str) -> Result<TimerKind, ApiError> {
    kind.parse().map_err(|e: String| {
        warn!("{}", e);
        api_error(StatusCode::NOT_FOUND, e)
    })
}

/// Handle POST /timers/:kind/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    body: Option<Json<StartRequest>>,
) -> Result<Json<TimerResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let minutes = body.and_then(|Json(request)| request.minutes);

    let timer = state.start(kind, minutes).await.map_err(timer_error)?;
    info!("Start endpoint called - {} timer running", kind);
    Ok(Json(TimerResponse::ok(format!("{} timer started", kind), timer)))
}

/// Handle POST /timers/:kind/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let timer = state.pause(kind).await.map_err(timer_error)?;
    Ok(Json(TimerResponse::ok(format!("{} timer paused", kind), timer)))
}

/// Handle POST /timers/:kind/resume
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let timer = state.resume(kind).await.map_err(timer_error)?;
    Ok(Json(TimerResponse::ok(format!("{} timer resumed", kind), timer)))
}

/// Handle POST /timers/:kind/cancel
pub async fn cancel_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let timer = state.cancel(kind).await;
    Ok(Json(TimerResponse::ok(format!("{} timer cancelled", kind), timer)))
}

/// Handle GET /timers
pub async fn timers_handler(State(state): State<Arc<AppState>>) -> Json<BoardSnapshot> {
    Json(state.snapshots().await)
}

/// Handle GET /timers/:kind
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.snapshot(kind).await))
}

/// Handle POST /visibility - the client came back to the foreground.
/// Reconciles before responding so the client renders caught-up state.
pub async fn visibility_handler(State(state): State<Arc<AppState>>) -> Json<BoardSnapshot> {
    Json(state.reconcile("visibility").await)
}

/// Handle GET /events
pub async fn events_handler(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    Json(EventsResponse {
        events: state.recent_events(),
        authorization: state.authorization(),
    })
}

/// Handle GET /settings
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        temp_unit: state.display.temp_unit,
        oven_temp: state.display.oven_temp(),
        autolyse_minutes: state.defaults.autolyse_minutes,
        bulk_minutes: state.defaults.bulk_minutes,
        bake_minutes: state.defaults.bake_minutes,
        bulk_choices: BULK_REMINDER_MINUTES.to_vec(),
    })
}

/// Handle POST /recipe/percentages
pub async fn percentages_handler(Json(recipe): Json<Recipe>) -> Json<PercentagesResponse> {
    Json(PercentagesResponse {
        percentages: recipe.percentages(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime(), state.last_reconcile()))
}
