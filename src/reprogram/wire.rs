//! Reprogram wire format
//!
//! The simulation response and the confirmation body share one shape, so a
//! confirmation re-submits the proposal verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::ReprogramProposal;
use crate::api::ApiError;
use crate::api::wire::id_string;
use crate::matches::types::{RefereeRef, VenueRef};
use crate::matches::wire::{RefereeDto, VenueDto};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDto {
    #[serde(deserialize_with = "id_string")]
    pub match_id: String,
    pub proposed_start_time: DateTime<Utc>,
    pub proposed_venue: VenueDto,
    pub proposed_referees: Vec<RefereeDto>,
}

impl TryFrom<ProposalDto> for ReprogramProposal {
    type Error = ApiError;

    fn try_from(dto: ProposalDto) -> Result<Self, Self::Error> {
        if dto.proposed_referees.is_empty() {
            return Err(ApiError::Decode(format!(
                "proposal for match {} has no referees",
                dto.match_id
            )));
        }
        Ok(ReprogramProposal {
            match_id: dto.match_id,
            proposed_start_time: dto.proposed_start_time,
            proposed_venue: VenueRef::from(dto.proposed_venue),
            proposed_referees: dto
                .proposed_referees
                .into_iter()
                .map(RefereeRef::from)
                .collect(),
        })
    }
}

impl From<&ReprogramProposal> for ProposalDto {
    fn from(p: &ReprogramProposal) -> Self {
        ProposalDto {
            match_id: p.match_id.clone(),
            proposed_start_time: p.proposed_start_time,
            proposed_venue: (&p.proposed_venue).into(),
            proposed_referees: p.proposed_referees.iter().map(RefereeDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proposal_keeps_referee_order() {
        let dto: ProposalDto = serde_json::from_value(json!({
            "match_id": 44,
            "proposed_start_time": "2024-06-08T19:30:00Z",
            "proposed_venue": { "id": "v-2", "name": "Polideportivo Sur" },
            "proposed_referees": [
                { "id": "r-7", "name": "Bruno Díaz" },
                { "id": "r-3", "name": "Carla Soto" }
            ]
        }))
        .unwrap();

        let p = ReprogramProposal::try_from(dto).unwrap();
        assert_eq!(p.match_id, "44");
        let ids: Vec<_> = p.proposed_referees.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-7", "r-3"]);
    }

    #[test]
    fn test_empty_referees_is_decode_error() {
        let dto: ProposalDto = serde_json::from_value(json!({
            "match_id": "m-1",
            "proposed_start_time": "2024-06-08T19:30:00Z",
            "proposed_venue": { "id": "v-2", "name": "Polideportivo Sur" },
            "proposed_referees": []
        }))
        .unwrap();
        assert!(matches!(
            ReprogramProposal::try_from(dto),
            Err(ApiError::Decode(_))
        ));
    }
}
