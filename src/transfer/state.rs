//! Aggregate transfer status and its classifier

use std::fmt;

use super::types::{Approval, DebtStatus, TransferRequest};

/// Human-facing aggregate status of a transfer request
///
/// Terminal states: `Rejected`, `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStatus {
    /// At least one required approval is still pending
    Pending,
    /// Terminal: some required party refused
    Rejected,
    /// All parties approved, settlement not finalized yet
    InProgress,
    /// Terminal: all parties approved and debt finalized
    Completed,
}

impl TransferStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Rejected | TransferStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::Rejected => "REJECTED",
            TransferStatus::InProgress => "IN_PROGRESS",
            TransferStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the aggregate status from a snapshot.
///
/// Rejection of any required approval dominates everything else, including a
/// finalized debt. Pure; safe to call from any task.
pub fn classify(record: &TransferRequest) -> TransferStatus {
    let required = record.approvals.required();

    if required.iter().any(|(_, a)| *a == Approval::Rejected) {
        return TransferStatus::Rejected;
    }
    if required.iter().any(|(_, a)| *a == Approval::Pending) {
        return TransferStatus::Pending;
    }
    match record.debt_status {
        DebtStatus::Finalized => TransferStatus::Completed,
        DebtStatus::Pending => TransferStatus::InProgress,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use super::super::types::*;

    pub fn player_initiated(
        id: &str,
        origin: Approval,
        destination: Approval,
        debt: DebtStatus,
    ) -> TransferRequest {
        record(
            id,
            Approvals::PlayerInitiated {
                origin_president: origin,
                destination_president: destination,
            },
            debt,
        )
    }

    pub fn president_initiated(
        id: &str,
        player: Approval,
        origin: Approval,
        debt: DebtStatus,
    ) -> TransferRequest {
        record(
            id,
            Approvals::PresidentInitiated {
                player,
                origin_president: origin,
            },
            debt,
        )
    }

    fn record(id: &str, approvals: Approvals, debt_status: DebtStatus) -> TransferRequest {
        TransferRequest {
            id: id.to_string(),
            player: PlayerRef {
                id: "p-1".to_string(),
                name: "Ana Rojas".to_string(),
            },
            origin_club: Some(ClubRef {
                id: "club-a".to_string(),
                name: "Club Atlético".to_string(),
            }),
            destination_club: ClubRef {
                id: "club-b".to_string(),
                name: "Club Bolívar".to_string(),
            },
            approvals,
            debt_status,
            requested_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            championship_id: "champ-1".to_string(),
        }
    }
}
