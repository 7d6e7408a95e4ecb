//! Error types shared by the registry, timer tasks, and HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Longest work phase the server accepts (one day)
pub const MAX_WORK_MINUTES: u32 = 24 * 60;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer {0} not found")]
    NotFound(Uuid),

    #[error("work duration must be between 1 and 1440 minutes, got {0}")]
    InvalidDuration(u32),

    #[error("timer {0} is no longer running its task")]
    Stopped(Uuid),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),
}

impl TimerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TimerError::NotFound(_) => StatusCode::NOT_FOUND,
            TimerError::InvalidDuration(_) | TimerError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            TimerError::Stopped(_) | TimerError::LockPoisoned(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable name for the error body
    pub fn kind(&self) -> &'static str {
        match self {
            TimerError::NotFound(_) => "not_found",
            TimerError::InvalidDuration(_) => "invalid_duration",
            TimerError::InvalidBody(_) => "invalid_body",
            TimerError::Stopped(_) => "timer_stopped",
            TimerError::LockPoisoned(_) => "internal",
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Validate a caller-supplied work duration
pub fn validate_work_minutes(minutes: u32) -> Result<u32, TimerError> {
    if minutes == 0 || minutes > MAX_WORK_MINUTES {
        return Err(TimerError::InvalidDuration(minutes));
    }
    Ok(minutes)
}

pub type TimerResult<T> = Result<T, TimerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kind() {
        assert_eq!(TimerError::NotFound(Uuid::nil()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(TimerError::InvalidDuration(0).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            TimerError::InvalidBody("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TimerError::Stopped(Uuid::nil()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn work_minutes_bounds() {
        assert!(validate_work_minutes(0).is_err());
        assert_eq!(validate_work_minutes(1).ok(), Some(1));
        assert_eq!(validate_work_minutes(MAX_WORK_MINUTES).ok(), Some(MAX_WORK_MINUTES));
        assert!(validate_work_minutes(MAX_WORK_MINUTES + 1).is_err());
    }
}
