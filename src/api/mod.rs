//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(mount_timer_handler))
        .route("/timers/:id", get(get_timer_handler).delete(unmount_timer_handler))
        .route("/timers/:id/start", post(start_handler))
        .route("/timers/:id/toggle", post(toggle_handler))
        .route("/timers/:id/reset", post(reset_handler))
        .route("/timers/:id/duration", put(duration_handler))
        .route("/timers/:id/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
