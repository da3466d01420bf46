//! Transfer Error Types

use thiserror::Error;

use super::state::TransferStatus;
use super::types::{ActingRole, Approval, RequestType};
use crate::api::ApiError;
use crate::error::FailureKind;

/// Failures surfaced by the transfer store and action gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation (decided locally, never sent) ===
    #[error("Role {role} has no approval on a {request_type} request")]
    RoleNotApplicable {
        role: ActingRole,
        request_type: RequestType,
    },

    #[error("Approval for {role} is already {current}")]
    AlreadyResolved { role: ActingRole, current: Approval },

    #[error("Request is already {0}")]
    TerminalState(TransferStatus),

    #[error("Only pending requests can be withdrawn (status: {0})")]
    NotWithdrawable(TransferStatus),

    #[error("Only the initiator ({expected}) can withdraw this request")]
    NotInitiator { expected: ActingRole },

    #[error("Another action on transfer {0} is still in flight")]
    ActionInFlight(String),

    #[error("Screen closed; result discarded")]
    SessionClosed,

    // === Remote ===
    #[error("State conflict: {0}")]
    Conflict(String),

    #[error("Temporary failure: {0}")]
    Transient(String),

    #[error("Transfer not found: {0}")]
    NotFound(String),

    #[error("Remote error: {0}")]
    Remote(String),
}

impl TransferError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransferError::RoleNotApplicable { .. }
            | TransferError::AlreadyResolved { .. }
            | TransferError::TerminalState(_)
            | TransferError::NotWithdrawable(_)
            | TransferError::NotInitiator { .. }
            | TransferError::ActionInFlight(_)
            | TransferError::SessionClosed => FailureKind::Validation,
            TransferError::Conflict(_) => FailureKind::Conflict,
            TransferError::Transient(_) => FailureKind::Transient,
            TransferError::NotFound(_) | TransferError::Remote(_) => FailureKind::Remote,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransferError::RoleNotApplicable { .. } => "ROLE_NOT_APPLICABLE",
            TransferError::AlreadyResolved { .. } => "ALREADY_RESOLVED",
            TransferError::TerminalState(_) => "TERMINAL_STATE",
            TransferError::NotWithdrawable(_) => "NOT_WITHDRAWABLE",
            TransferError::NotInitiator { .. } => "NOT_INITIATOR",
            TransferError::ActionInFlight(_) => "ACTION_IN_FLIGHT",
            TransferError::SessionClosed => "SESSION_CLOSED",
            TransferError::Conflict(_) => "STATE_CONFLICT",
            TransferError::Transient(_) => "TRANSIENT",
            TransferError::NotFound(_) => "TRANSFER_NOT_FOUND",
            TransferError::Remote(_) => "REMOTE_ERROR",
        }
    }

    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<ApiError> for TransferError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(msg) => TransferError::NotFound(msg),
            ApiError::Conflict { message, .. } => TransferError::Conflict(message),
            ApiError::Transport(_) | ApiError::Unavailable { .. } => {
                TransferError::Transient(e.to_string())
            }
            ApiError::Rejected { .. } | ApiError::Decode(_) | ApiError::InvalidUrl(_) => {
                TransferError::Remote(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            TransferError::AlreadyResolved {
                role: ActingRole::Player,
                current: Approval::Approved
            }
            .kind(),
            FailureKind::Validation
        );
        assert_eq!(
            TransferError::Conflict("x".into()).kind(),
            FailureKind::Conflict
        );
        assert!(TransferError::Transient("x".into()).is_retryable());
        assert!(!TransferError::Remote("x".into()).is_retryable());
    }

    #[test]
    fn test_from_api_error_preserves_kind() {
        let cases = [
            ApiError::Transport("reset".into()),
            ApiError::from_status(409, "resolved".into()),
            ApiError::from_status(503, "down".into()),
            ApiError::from_status(404, "gone".into()),
            ApiError::from_status(422, "bad".into()),
            ApiError::Decode("eof".into()),
        ];
        for api in cases {
            let kind = api.kind();
            assert_eq!(TransferError::from(api).kind(), kind);
        }
    }

    #[test]
    fn test_display() {
        let err = TransferError::RoleNotApplicable {
            role: ActingRole::DestinationClubPresident,
            request_type: RequestType::PresidentInitiated,
        };
        assert_eq!(
            err.to_string(),
            "Role destination_president has no approval on a president_initiated request"
        );
        assert_eq!(err.code(), "ROLE_NOT_APPLICABLE");
    }
}
