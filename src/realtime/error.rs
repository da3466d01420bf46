use thiserror::Error;

use crate::error::FailureKind;

/// Realtime channel failures. None of them is fatal to a screen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RealtimeError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Malformed message: {0}")]
    Malformed(String),
}

impl RealtimeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RealtimeError::Connect(_) => FailureKind::Transient,
            RealtimeError::Malformed(_) => FailureKind::Remote,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RealtimeError::Connect(_) => "REALTIME_CONNECT",
            RealtimeError::Malformed(_) => "REALTIME_MALFORMED",
        }
    }
}
