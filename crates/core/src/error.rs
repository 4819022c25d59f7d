use thiserror::Error;

use crate::model::Stage;

/// Errors raised while interpreting a session identifier taken from navigation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionIdError {
    #[error("session id is missing")]
    Missing,

    #[error("session id is not usable: {raw:?}")]
    Placeholder { raw: String },

    #[error("session id cannot be used as a path segment: {raw:?}")]
    NotPathSafe { raw: String },
}

/// Errors raised by the assessment stage controller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StageError {
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },
}
