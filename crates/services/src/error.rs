//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::{SessionIdError, StageError};

/// Errors emitted by `PracticeApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("could not reach the server: {0}")]
    Connection(String),
    #[error("server responded with {status}")]
    Status {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    #[error("server response did not include a session id")]
    MissingSessionId,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Human-readable reason sent by the server, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}

/// Errors emitted by `SubmissionGateway`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the interview and assessment runners.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    #[error(transparent)]
    InvalidSessionId(#[from] SessionIdError),
    #[error("failed to load session")]
    Load(#[source] ApiError),
    #[error("runner was stopped or restarted before the result arrived")]
    Superseded,
    #[error("session is not loaded")]
    NotReady,
    #[error("session already completed")]
    Completed,
    #[error("no question at index {0}")]
    NoSuchQuestion(usize),
    #[error("submit is not available on this page")]
    SubmitUnavailable,
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Errors emitted by `SessionStarter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error("blank topic")]
    BlankTopic,
    #[error("a session is already being started")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `FlashcardSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error(transparent)]
    InvalidRoadmap(#[from] SessionIdError),
    #[error("generated deck has no cards")]
    EmptyDeck,
    #[error("failed to generate deck")]
    Load(#[source] ApiError),
    #[error("deck session was stopped before the deck arrived")]
    Superseded,
}

/// Errors emitted by `ChallengeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HintError {
    #[error("a hint request is already in flight")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}
