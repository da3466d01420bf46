//! Transfer Core Types
//!
//! The approval fields a request carries depend on who started it, so the
//! request kind is a sum type and each variant holds only its applicable
//! approvals. There is no way to read an inapplicable field.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::core_types::{ChampionshipId, ClubId, TransferId, UserId};

/// Tri-state consent of one approving party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approval {
    Pending,
    Approved,
    Rejected,
}

impl Approval {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Approval::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Approval::Pending => "PENDING",
            Approval::Approved => "APPROVED",
            Approval::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally settled financial obligation gating completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebtStatus {
    Pending,
    Finalized,
}

/// How the request was originated; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// A player applied to join a club
    PlayerInitiated,
    /// A club president recruited a player
    PresidentInitiated,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::PlayerInitiated => "player_initiated",
            RequestType::PresidentInitiated => "president_initiated",
        }
    }

    /// The role allowed to withdraw the request
    pub fn initiator(&self) -> ActingRole {
        match self {
            RequestType::PlayerInitiated => ActingRole::Player,
            RequestType::PresidentInitiated => ActingRole::DestinationClubPresident,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role an actor claims when acting on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActingRole {
    Player,
    OriginClubPresident,
    DestinationClubPresident,
}

impl ActingRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActingRole::Player => "player",
            ActingRole::OriginClubPresident => "origin_president",
            ActingRole::DestinationClubPresident => "destination_president",
        }
    }
}

impl fmt::Display for ActingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActingRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "player" | "jugador" => Ok(ActingRole::Player),
            "origin_president" | "origin" => Ok(ActingRole::OriginClubPresident),
            "destination_president" | "destination" => Ok(ActingRole::DestinationClubPresident),
            _ => Err(format!(
                "Invalid role: {}. Use 'player', 'origin_president' or 'destination_president'",
                s
            )),
        }
    }
}

/// Approve or reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    /// The approval value this decision writes
    pub fn outcome(&self) -> Approval {
        match self {
            Decision::Approve => Approval::Approved,
            Decision::Reject => Approval::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is acting. Passed explicitly to every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor {
    pub role: ActingRole,
    pub user_id: UserId,
}

impl Actor {
    pub fn new(role: ActingRole, user_id: impl Into<UserId>) -> Self {
        Self {
            role,
            user_id: user_id.into(),
        }
    }
}

/// Required approvals, shaped by the request type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approvals {
    PlayerInitiated {
        origin_president: Approval,
        destination_president: Approval,
    },
    PresidentInitiated {
        player: Approval,
        origin_president: Approval,
    },
}

impl Approvals {
    pub fn request_type(&self) -> RequestType {
        match self {
            Approvals::PlayerInitiated { .. } => RequestType::PlayerInitiated,
            Approvals::PresidentInitiated { .. } => RequestType::PresidentInitiated,
        }
    }

    /// The field `role` decides, or `None` if the role has no say on this type
    pub fn field(&self, role: ActingRole) -> Option<Approval> {
        match (self, role) {
            (Approvals::PlayerInitiated { origin_president, .. }, ActingRole::OriginClubPresident)
            | (
                Approvals::PresidentInitiated { origin_president, .. },
                ActingRole::OriginClubPresident,
            ) => Some(*origin_president),
            (
                Approvals::PlayerInitiated {
                    destination_president,
                    ..
                },
                ActingRole::DestinationClubPresident,
            ) => Some(*destination_president),
            (Approvals::PresidentInitiated { player, .. }, ActingRole::Player) => Some(*player),
            (Approvals::PlayerInitiated { .. }, ActingRole::Player)
            | (Approvals::PresidentInitiated { .. }, ActingRole::DestinationClubPresident) => None,
        }
    }

    /// All required approvals with the role that owns each
    pub fn required(&self) -> [(ActingRole, Approval); 2] {
        match *self {
            Approvals::PlayerInitiated {
                origin_president,
                destination_president,
            } => [
                (ActingRole::OriginClubPresident, origin_president),
                (ActingRole::DestinationClubPresident, destination_president),
            ],
            Approvals::PresidentInitiated {
                player,
                origin_president,
            } => [
                (ActingRole::Player, player),
                (ActingRole::OriginClubPresident, origin_president),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubRef {
    pub id: ClubId,
    pub name: String,
}

/// Snapshot of a transfer request as last fetched from the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub id: TransferId,
    pub player: PlayerRef,
    /// Absent for a player with no current club
    pub origin_club: Option<ClubRef>,
    pub destination_club: ClubRef,
    pub approvals: Approvals,
    pub debt_status: DebtStatus,
    pub requested_at: DateTime<Utc>,
    pub championship_id: ChampionshipId,
}

impl TransferRequest {
    #[inline]
    pub fn request_type(&self) -> RequestType {
        self.approvals.request_type()
    }
}

/// Actor scoping for listing queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListScope {
    All,
    Club(ClubId),
    Player(UserId),
}

impl ListScope {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            ListScope::All => vec![],
            ListScope::Club(id) => vec![("club_id", id.clone())],
            ListScope::Player(id) => vec![("player_id", id.clone())],
        }
    }
}
