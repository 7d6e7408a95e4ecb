//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc, time::Duration};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{validate_work_minutes, TimerError, TimerResult},
    state::{AppState, TimerSnapshot},
};
use super::responses::{HealthResponse, MountTimerRequest, StatusResponse, WorkDurationRequest};

/// Handle GET /timers - List every mounted timer
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> TimerResult<Json<Vec<TimerSnapshot>>> {
    Ok(Json(state.list()?))
}

/// Handle POST /timers - Mount a new timer
///
/// An empty body mounts a timer with the configured defaults.
pub async fn mount_timer_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> TimerResult<(StatusCode, Json<TimerSnapshot>)> {
    let request = parse_mount_request(&body)?;
    let snapshot = state.mount(request.title, request.work_duration_minutes)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

fn parse_mount_request(body: &[u8]) -> TimerResult<MountTimerRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MountTimerRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| TimerError::InvalidBody(e.to_string()))
}

/// Handle GET /timers/:id - Current snapshot
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> TimerResult<Json<TimerSnapshot>> {
    Ok(Json(state.get(id)?))
}

/// Handle DELETE /timers/:id - Unmount a timer
pub async fn unmount_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> TimerResult<StatusCode> {
    state.unmount(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle POST /timers/:id/start - Start a timer that has not been started
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> TimerResult<Json<TimerSnapshot>> {
    let snapshot = state.handle(id)?.start().await?;
    state.record_action("start");
    info!("Start called on timer {}", id);
    Ok(Json(snapshot))
}

/// Handle POST /timers/:id/toggle - Pause or resume
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> TimerResult<Json<TimerSnapshot>> {
    let snapshot = state.handle(id)?.toggle().await?;
    state.record_action(if snapshot.running { "resume" } else { "pause" });
    info!("Timer {} {}", id, if snapshot.running { "resumed" } else { "paused" });
    Ok(Json(snapshot))
}

/// Handle POST /timers/:id/reset - Rewind the current phase
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> TimerResult<Json<TimerSnapshot>> {
    let snapshot = state.handle(id)?.reset().await?;
    state.record_action("reset");
    info!("Timer {} reset in {} phase", id, snapshot.phase.as_str());
    Ok(Json(snapshot))
}

/// Handle PUT /timers/:id/duration - Change the work duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<WorkDurationRequest>,
) -> TimerResult<Json<TimerSnapshot>> {
    let minutes = validate_work_minutes(request.work_duration_minutes)?;
    let snapshot = state.handle(id)?.set_work_duration(minutes).await?;
    state.record_action("duration");
    info!("Timer {} work duration set to {} min", id, minutes);
    Ok(Json(snapshot))
}

/// Handle GET /timers/:id/events - Stream snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> TimerResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let mut rx = state.handle(id)?.subscribe();
    rx.mark_changed();

    let stream = stream::unfold(rx, |mut rx| async move {
        if rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        let event = match Event::default().event("timer").json_data(&snapshot) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode timer snapshot: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };
        Some((Ok::<_, Infallible>(event), rx))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timers: state.timer_count(),
        uptime: state.get_uptime(),
        port: state.settings.port,
        host: state.settings.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
