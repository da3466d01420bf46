//! Match wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{MatchRecord, MatchSchedule, RefereeRef, SetScore, VenueRef};
use crate::api::wire::id_string;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefereeDto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub championship_id: String,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_at: DateTime<Utc>,
    pub venue: VenueDto,
    #[serde(default)]
    pub referees: Vec<RefereeDto>,
    #[serde(default)]
    pub home_sets: Option<u8>,
    #[serde(default)]
    pub away_sets: Option<u8>,
}

impl From<VenueDto> for VenueRef {
    fn from(dto: VenueDto) -> Self {
        VenueRef {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<&VenueRef> for VenueDto {
    fn from(v: &VenueRef) -> Self {
        VenueDto {
            id: v.id.clone(),
            name: v.name.clone(),
        }
    }
}

impl From<RefereeDto> for RefereeRef {
    fn from(dto: RefereeDto) -> Self {
        RefereeRef {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<&RefereeRef> for RefereeDto {
    fn from(r: &RefereeRef) -> Self {
        RefereeDto {
            id: r.id.clone(),
            name: r.name.clone(),
        }
    }
}

impl From<MatchDto> for MatchRecord {
    fn from(dto: MatchDto) -> Self {
        let result = match (dto.home_sets, dto.away_sets) {
            (Some(home), Some(away)) => Some(SetScore { home, away }),
            _ => None,
        };
        MatchRecord {
            id: dto.id,
            championship_id: dto.championship_id,
            home_team: dto.home_team,
            away_team: dto.away_team,
            schedule: MatchSchedule {
                scheduled_at: dto.scheduled_at,
                venue: dto.venue.into(),
                referees: dto.referees.into_iter().map(RefereeRef::from).collect(),
            },
            result,
        }
    }
}
