//! API Error Types

use thiserror::Error;

use crate::error::FailureKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Service unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("State conflict ({status}): {message}")]
    Conflict { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            409 | 412 => ApiError::Conflict { status, message },
            404 => ApiError::NotFound(message),
            408 | 429 | 500..=599 => ApiError::Unavailable { status, message },
            _ => ApiError::Rejected { status, message },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) | ApiError::Unavailable { .. } => FailureKind::Transient,
            ApiError::Conflict { .. } => FailureKind::Conflict,
            ApiError::NotFound(_)
            | ApiError::Rejected { .. }
            | ApiError::Decode(_)
            | ApiError::InvalidUrl(_) => FailureKind::Remote,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "TRANSPORT",
            ApiError::Unavailable { .. } => "SERVICE_UNAVAILABLE",
            ApiError::Conflict { .. } => "STATE_CONFLICT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Rejected { .. } => "REJECTED",
            ApiError::Decode(_) => "DECODE",
            ApiError::InvalidUrl(_) => "INVALID_URL",
        }
    }

    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::from_status(status.as_u16(), e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
