//! Reprogram Error Types

use thiserror::Error;

use crate::api::ApiError;
use crate::error::FailureKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReprogramError {
    // === Validation ===
    #[error("No open proposal for match {0}")]
    NotProposed(String),

    #[error("Proposal for match {0} does not match the one last proposed")]
    StaleProposal(String),

    #[error("Proposal for match {match_id} expired after {age_secs}s")]
    Expired { match_id: String, age_secs: u64 },

    #[error("Confirmation for match {0} is still in flight")]
    ConfirmInFlight(String),

    // === Remote ===
    #[error("Schedule conflict: {0}")]
    Conflict(String),

    #[error("Temporary failure: {0}")]
    Transient(String),

    #[error("Remote error: {0}")]
    Remote(String),
}

impl ReprogramError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ReprogramError::NotProposed(_)
            | ReprogramError::StaleProposal(_)
            | ReprogramError::Expired { .. }
            | ReprogramError::ConfirmInFlight(_) => FailureKind::Validation,
            ReprogramError::Conflict(_) => FailureKind::Conflict,
            ReprogramError::Transient(_) => FailureKind::Transient,
            ReprogramError::Remote(_) => FailureKind::Remote,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ReprogramError::NotProposed(_) => "NOT_PROPOSED",
            ReprogramError::StaleProposal(_) => "STALE_PROPOSAL",
            ReprogramError::Expired { .. } => "PROPOSAL_EXPIRED",
            ReprogramError::ConfirmInFlight(_) => "CONFIRM_IN_FLIGHT",
            ReprogramError::Conflict(_) => "SCHEDULE_CONFLICT",
            ReprogramError::Transient(_) => "TRANSIENT",
            ReprogramError::Remote(_) => "REMOTE_ERROR",
        }
    }

    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<ApiError> for ReprogramError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Conflict { message, .. } => ReprogramError::Conflict(message),
            ApiError::Transport(_) | ApiError::Unavailable { .. } => {
                ReprogramError::Transient(e.to_string())
            }
            ApiError::NotFound(_)
            | ApiError::Rejected { .. }
            | ApiError::Decode(_)
            | ApiError::InvalidUrl(_) => ReprogramError::Remote(e.to_string()),
        }
    }
}
