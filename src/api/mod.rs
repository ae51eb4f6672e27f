//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(timers_handler))
        .route("/timers/:kind", get(timer_handler))
        .route("/timers/:kind/start", post(start_handler))
        .route("/timers/:kind/pause", post(pause_handler))
        .route("/timers/:kind/resume", post(resume_handler))
        .route("/timers/:kind/cancel", post(cancel_handler))
        .route("/visibility", post(visibility_handler))
        .route("/events", get(events_handler))
        .route("/settings", get(settings_handler))
        .route("/recipe/percentages", post(percentages_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
