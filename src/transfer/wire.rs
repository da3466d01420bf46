//! Transfer wire format
//!
//! Remote payloads carry all three approval columns regardless of request
//! type. Conversion keeps only the columns applicable to the type; a missing
//! or null applicable column reads as `PENDING`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Approval, Approvals, ClubRef, DebtStatus, PlayerRef, TransferRequest};
use crate::api::wire::id_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestTypeDto {
    PlayerInitiated,
    PresidentInitiated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDto {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtStatusDto {
    #[default]
    Pending,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubDto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub request_type: RequestTypeDto,
    pub player: PlayerDto,
    #[serde(default)]
    pub origin_club: Option<ClubDto>,
    pub destination_club: ClubDto,
    #[serde(default)]
    pub player_approval: Option<ApprovalDto>,
    #[serde(default)]
    pub origin_president_approval: Option<ApprovalDto>,
    #[serde(default)]
    pub destination_president_approval: Option<ApprovalDto>,
    #[serde(default)]
    pub debt_status: DebtStatusDto,
    pub requested_at: DateTime<Utc>,
    #[serde(deserialize_with = "id_string")]
    pub championship_id: String,
}

/// Body of every approve / reject / withdraw call
#[derive(Debug, Clone, Serialize)]
pub struct ActionBody<'a> {
    pub role: &'a str,
    pub actor_id: &'a str,
}

impl From<ApprovalDto> for Approval {
    fn from(dto: ApprovalDto) -> Self {
        match dto {
            ApprovalDto::Pending => Approval::Pending,
            ApprovalDto::Approved => Approval::Approved,
            ApprovalDto::Rejected => Approval::Rejected,
        }
    }
}

fn approval(dto: Option<ApprovalDto>) -> Approval {
    dto.map(Approval::from).unwrap_or(Approval::Pending)
}

impl From<TransferDto> for TransferRequest {
    fn from(dto: TransferDto) -> Self {
        let approvals = match dto.request_type {
            RequestTypeDto::PlayerInitiated => Approvals::PlayerInitiated {
                origin_president: approval(dto.origin_president_approval),
                destination_president: approval(dto.destination_president_approval),
            },
            RequestTypeDto::PresidentInitiated => Approvals::PresidentInitiated {
                player: approval(dto.player_approval),
                origin_president: approval(dto.origin_president_approval),
            },
        };

        TransferRequest {
            id: dto.id,
            player: PlayerRef {
                id: dto.player.id,
                name: dto.player.name,
            },
            origin_club: dto.origin_club.map(|c| ClubRef {
                id: c.id,
                name: c.name,
            }),
            destination_club: ClubRef {
                id: dto.destination_club.id,
                name: dto.destination_club.name,
            },
            approvals,
            debt_status: match dto.debt_status {
                DebtStatusDto::Pending => DebtStatus::Pending,
                DebtStatusDto::Finalized => DebtStatus::Finalized,
            },
            requested_at: dto.requested_at,
            championship_id: dto.championship_id,
        }
    }
}
