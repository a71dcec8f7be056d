//! Shared error types for the services crate.

use thiserror::Error;

use civics_core::model::{SessionError, SubmitRejection};

/// Failures reaching the grading classifier or reading its reply.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UpstreamError {
    #[error("grading request failed with status {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("grading request timed out")]
    Timeout,
    #[error("grading reply could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Http(err)
        }
    }
}

/// Errors emitted by graders.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradingError {
    /// The grader cannot reach the classifier at all, typically a missing credential.
    ///
    /// Retrying will not help.
    #[error("grading is not configured: {0}")]
    Configuration(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl GradingError {
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, GradingError::Configuration(_))
    }
}

impl From<reqwest::Error> for GradingError {
    fn from(err: reqwest::Error) -> Self {
        GradingError::Upstream(err.into())
    }
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question pool has {available} questions, a quiz needs {required}")]
    PoolTooSmall { available: usize, required: usize },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Why `QuizHandle::submit_answer` did not record an outcome.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    /// The submission was refused and the session is unchanged.
    #[error(transparent)]
    Rejected(#[from] SubmitRejection),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl SubmitError {
    #[must_use]
    pub fn rejection(&self) -> Option<SubmitRejection> {
        match self {
            SubmitError::Rejected(rejection) => Some(*rejection),
            SubmitError::Session(_) => None,
        }
    }
}
