//! Workout Timer - A state-managed HTTP server hosting interval timers
//! 
//! This is the main entry point for the workout-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use workout_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "workout_timer={},notification=info,tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting workout-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, notifications={:?}",
          config.host, config.port, config.work_minutes, config.notifications);

    let state = Arc::new(AppState::new(config.server_settings(), config.notifier()));

    if !config.no_default_timer {
        let timer = state.mount(Some(config.title.clone()), Some(config.work_minutes))?;
        info!("Default timer mounted: {} ({})", timer.id, timer.title);
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers              - List timers");
    info!("  POST   /timers              - Mount a timer");
    info!("  GET    /timers/:id          - Timer snapshot");
    info!("  DELETE /timers/:id          - Unmount a timer");
    info!("  POST   /timers/:id/start    - Start");
    info!("  POST   /timers/:id/toggle   - Pause / resume");
    info!("  POST   /timers/:id/reset    - Reset current phase");
    info!("  PUT    /timers/:id/duration - Change work duration");
    info!("  GET    /timers/:id/events   - Snapshot stream (SSE)");
    info!("  GET    /status              - Server status");
    info!("  GET    /health              - Health check");

    // Setup graceful shutdown
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

    state.unmount_all().await;
    info!("Server shutdown complete");
    Ok(())
}
