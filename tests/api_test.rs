//! End-to-end tests driving the router in-process

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

use workout_timer::{
    create_router,
    notify::NoopNotifier,
    state::{AppState, ServerSettings},
};

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(ServerSettings::default(), Arc::new(NoopNotifier)));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mount(app: &Router, body: Value) -> String {
    let (status, snapshot) = send(app, "POST", "/timers", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    snapshot["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn mount_with_defaults() {
    let (app, _) = app();
    let (status, snapshot) = send(&app, "POST", "/timers", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snapshot["title"], "Workout Timer");
    assert_eq!(snapshot["display"], "25:00");
    assert_eq!(snapshot["running"], false);
    assert_eq!(snapshot["started"], false);
    assert_eq!(snapshot["controls"], json!(["start"]));
}

#[tokio::test]
async fn start_toggle_reset_flow() {
    let (app, _) = app();
    let id = mount(&app, json!({ "title": "Legs", "workDurationMinutes": 1 })).await;

    let (status, snapshot) = send(&app, "POST", &format!("/timers/{id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["running"], true);
    assert_eq!(snapshot["started"], true);
    assert_eq!(snapshot["controls"], json!(["toggle", "reset"]));

    let (_, snapshot) = send(&app, "POST", &format!("/timers/{id}/toggle"), None).await;
    assert_eq!(snapshot["running"], false);
    assert_eq!(snapshot["started"], true);

    let (_, snapshot) = send(&app, "POST", &format!("/timers/{id}/reset"), None).await;
    assert_eq!(snapshot["phase"], "work");
    assert_eq!(snapshot["remainingSeconds"], 60);
    assert_eq!(snapshot["running"], false);
    assert_eq!(snapshot["started"], false);

    let (status, snapshot) = send(&app, "GET", &format!("/timers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["title"], "Legs");
}

#[tokio::test]
async fn duration_change_reinitializes() {
    let (app, _) = app();
    let id = mount(&app, json!({ "workDurationMinutes": 10 })).await;
    send(&app, "POST", &format!("/timers/{id}/start"), None).await;

    let (status, snapshot) = send(
        &app,
        "PUT",
        &format!("/timers/{id}/duration"),
        Some(json!({ "workDurationMinutes": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["display"], "30:00");
    assert_eq!(snapshot["running"], false);
    assert_eq!(snapshot["started"], false);
}

#[tokio::test]
async fn rejects_invalid_durations() {
    let (app, state) = app();
    let (status, body) =
        send(&app, "POST", "/timers", Some(json!({ "workDurationMinutes": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_duration");
    assert_eq!(state.timer_count(), 0);

    let id = mount(&app, json!({})).await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/timers/{id}/duration"),
        Some(json!({ "workDurationMinutes": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_timer_is_not_found() {
    let (app, _) = app();
    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "POST", &format!("/timers/{missing}/start"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn unmount_and_status() {
    let (app, _) = app();
    let id = mount(&app, json!({ "title": "Core" })).await;
    mount(&app, json!({ "title": "Arms" })).await;

    let (_, list) = send(&app, "GET", "/timers", None).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Arms", "Core"]);

    let (status, _) = send(&app, "DELETE", &format!("/timers/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, status_body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status_body["timers"], 1);
    assert_eq!(status_body["lastAction"], "unmount");
}

#[tokio::test]
async fn malformed_mount_bodies_are_rejected() {
    let (app, state) = app();
    for body in [
        r#"{"workDurationMinutes": -5}"#,
        r#"{"workDurationMinutes": 99999999999}"#,
        r#"{"workDurationMinutes": "ten"}"#,
        "not json",
    ] {
        let (status, error) = send_raw(&app, "/timers", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error["error"], "invalid_body");
    }
    assert_eq!(state.timer_count(), 0);
}

async fn next_frame<S>(frames: &mut S) -> Option<String>
where
    S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    let frame = timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("no server-sent event within 5s")?;
    Some(String::from_utf8_lossy(&frame.unwrap()).into_owned())
}

#[tokio::test]
async fn events_stream_follows_the_timer() {
    let (app, _) = app();
    let id = mount(&app, json!({})).await;

    let request = Request::builder()
        .uri(format!("/timers/{id}/events"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let mut frames = Box::pin(response.into_body().into_data_stream());

    let first = next_frame(&mut frames).await.unwrap();
    assert!(first.starts_with("event: timer"), "{first}");
    assert!(first.contains(r#""remainingSeconds":1500"#), "{first}");
    assert!(first.contains(r#""running":false"#), "{first}");

    send(&app, "POST", &format!("/timers/{id}/start"), None).await;
    let started = next_frame(&mut frames).await.unwrap();
    assert!(started.starts_with("event: timer"), "{started}");
    assert!(started.contains(r#""running":true"#), "{started}");

    let (status, _) = send(&app, "DELETE", &format!("/timers/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Ticks published before the task stopped may still be queued
    let mut ended = false;
    for _ in 0..5 {
        if next_frame(&mut frames).await.is_none() {
            ended = true;
            break;
        }
    }
    assert!(ended, "event stream kept going after unmount");
}
