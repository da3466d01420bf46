use thiserror::Error;

use crate::api::ApiError;
use crate::error::FailureKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Match not found: {0}")]
    NotFound(String),

    #[error("Screen closed; result discarded")]
    SessionClosed,

    #[error("Temporary failure: {0}")]
    Transient(String),

    #[error("Remote error: {0}")]
    Remote(String),
}

impl MatchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MatchError::SessionClosed => FailureKind::Validation,
            MatchError::Transient(_) => FailureKind::Transient,
            MatchError::NotFound(_) | MatchError::Remote(_) => FailureKind::Remote,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MatchError::NotFound(_) => "MATCH_NOT_FOUND",
            MatchError::SessionClosed => "SESSION_CLOSED",
            MatchError::Transient(_) => "TRANSIENT",
            MatchError::Remote(_) => "REMOTE_ERROR",
        }
    }

    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<ApiError> for MatchError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(msg) => MatchError::NotFound(msg),
            ApiError::Transport(_) | ApiError::Unavailable { .. } => {
                MatchError::Transient(e.to_string())
            }
            // a read cannot conflict; treat it like any other refusal
            ApiError::Conflict { .. }
            | ApiError::Rejected { .. }
            | ApiError::Decode(_)
            | ApiError::InvalidUrl(_) => MatchError::Remote(e.to_string()),
        }
    }
}
