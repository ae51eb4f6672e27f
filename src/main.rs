//! Proof Timer - bake timers that keep counting while the host sleeps
//!
//! This is the main entry point for the proof-timer daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use proof_timer::{
    api::create_router,
    config::Config,
    services::build_notifier,
    state::AppState,
    tasks::{tick_task, wake_up_recovery_task},
    timer::SystemClock,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("proof_timer={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting proof-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, notifier={:?}",
        config.host, config.port, config.tick_ms, config.notifier
    );

    let notifier = build_notifier(config.notifier, config.authorization);
    let state = Arc::new(
        AppState::new(config.timer_defaults(), Arc::new(SystemClock), notifier)?
            .with_display(config.display_settings()),
    );

    // Periodic recompute
    let tick_state = Arc::clone(&state);
    let tick_period = config.tick_period();
    tokio::spawn(async move {
        tick_task(tick_state, tick_period).await;
    });

    // Immediate reconcile after the host wakes up
    let wake_state = Arc::clone(&state);
    let wake_period = config.wake_check_period();
    tokio::spawn(async move {
        wake_up_recovery_task(wake_state, wake_period).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timers/:kind/start   - Start autolyse, bulk or bake");
    info!("  POST /timers/:kind/pause   - Pause (autolyse only)");
    info!("  POST /timers/:kind/resume  - Resume a paused timer");
    info!("  POST /timers/:kind/cancel  - Cancel a timer");
    info!("  GET  /timers               - All timers");
    info!("  POST /visibility           - Client regained focus, reconcile now");
    info!("  GET  /events               - Fired reminders");
    info!("  GET  /health               - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
