use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::error::InterviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid transition: {0}")]
    Transition(String),

    #[error("Upstream validation error: {0}")]
    UpstreamValidation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Interview station is not running")]
    StationUnavailable,
}

impl From<InterviewError> for AppError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::Input(msg) => AppError::Input(msg),
            InterviewError::Transition(e) => AppError::Transition(e.to_string()),
            InterviewError::Validation(msg) => AppError::UpstreamValidation(msg),
            InterviewError::Transport(msg) => AppError::Upstream(msg),
            InterviewError::StationUnavailable => AppError::StationUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Input(msg) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", msg.clone()),
            AppError::Transition(msg) => (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone()),
            AppError::UpstreamValidation(msg) => {
                tracing::warn!("Upstream validation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::StationUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STATION_UNAVAILABLE",
                "The interview station is not running".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::{SessionStatus, TransitionError};

    #[test]
    fn test_interview_errors_map_to_statuses() {
        let cases = [
            (InterviewError::Input("x".into()), StatusCode::BAD_REQUEST),
            (
                InterviewError::Transition(TransitionError::NotAccepted {
                    status: SessionStatus::Completed,
                    event: "answer_submitted",
                }),
                StatusCode::CONFLICT,
            ),
            (InterviewError::Validation("x".into()), StatusCode::BAD_GATEWAY),
            (InterviewError::Transport("x".into()), StatusCode::BAD_GATEWAY),
            (InterviewError::StationUnavailable, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }
}
