//! Failure taxonomy shared by all subsystem errors.

use std::fmt;

/// How a failure should be handled by the calling screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Illegal action for the current state or role. Decided locally,
    /// never reaches the network.
    Validation,
    /// The remote state moved under us (another actor resolved the field,
    /// the proposal went stale). Callers must re-fetch before retrying.
    Conflict,
    /// Timeout, connection drop or server-side outage. Safe to retry.
    Transient,
    /// Any other remote refusal or malformed response.
    Remote,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Validation => "VALIDATION",
            FailureKind::Conflict => "CONFLICT",
            FailureKind::Transient => "TRANSIENT",
            FailureKind::Remote => "REMOTE",
        }
    }

    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Transient)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
