use thiserror::Error;

use crate::interview::session::TransitionError;

/// Failures surfaced to the candidate without advancing the session.
///
/// Every variant is recoverable: the session stays in a well-defined status
/// and the user can retry or reset.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// An external service answered with the wrong shape, count or range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The external service could not be reached or returned a failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Blank required field, unsupported upload, empty document and the like.
    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid transition: {0}")]
    Transition(TransitionError),

    #[error("Interview station is not running")]
    StationUnavailable,
}

impl From<TransitionError> for InterviewError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::BlankValue(field) => {
                InterviewError::Input(format!("{field} cannot be blank"))
            }
            other => InterviewError::Transition(other),
        }
    }
}

impl From<reqwest::Error> for InterviewError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InterviewError::Validation(err.to_string())
        } else {
            InterviewError::Transport(err.to_string())
        }
    }
}
