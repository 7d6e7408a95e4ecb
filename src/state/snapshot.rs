//! Observable view of a timer, as rendered to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timer_state::{PhaseKind, TimerState, BREAK_DURATION_MINUTES};

/// Everything a client needs to draw the timer card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub id: Uuid,
    pub title: String,
    pub phase: PhaseKind,
    pub remaining_seconds: u64,
    /// Remaining time as `mm:ss`
    pub display: String,
    pub running: bool,
    pub started: bool,
    pub work_duration_minutes: u32,
    pub break_duration_minutes: u32,
    pub headline: String,
    /// Controls the client should offer in this state
    pub controls: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl TimerSnapshot {
    pub fn capture(id: Uuid, title: &str, state: &TimerState) -> Self {
        let controls = if state.started {
            vec!["toggle".to_string(), "reset".to_string()]
        } else {
            vec!["start".to_string()]
        };

        Self {
            id,
            title: title.to_string(),
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            display: state.display(),
            running: state.running,
            started: state.started,
            work_duration_minutes: state.work_duration_minutes,
            break_duration_minutes: BREAK_DURATION_MINUTES,
            headline: state.phase.headline().to_string(),
            controls,
            updated_at: Utc::now(),
        }
    }
}
