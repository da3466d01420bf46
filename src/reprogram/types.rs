use chrono::{DateTime, Utc};
use std::fmt;

use crate::core_types::MatchId;
use crate::matches::types::{MatchSchedule, RefereeRef, VenueRef};

/// A schedule the remote scheduler computed but has not committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReprogramProposal {
    pub match_id: MatchId,
    pub proposed_start_time: DateTime<Utc>,
    pub proposed_venue: VenueRef,
    /// Ordered and never empty
    pub proposed_referees: Vec<RefereeRef>,
}

impl ReprogramProposal {
    /// The schedule this proposal commits once confirmed
    pub fn schedule(&self) -> MatchSchedule {
        MatchSchedule {
            scheduled_at: self.proposed_start_time,
            venue: self.proposed_venue.clone(),
            referees: self.proposed_referees.clone(),
        }
    }
}

/// Constraints sent with a simulation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReprogramRequest {
    /// Earliest acceptable start time
    pub not_before: Option<DateTime<Utc>>,
}

impl ReprogramRequest {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self.not_before {
            Some(t) => vec![("not_before", t.to_rfc3339())],
            None => vec![],
        }
    }
}

/// Where a match's negotiation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    Idle,
    Proposed,
    Confirming,
    Confirmed,
    Discarded,
}

impl NegotiationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationState::Idle => "IDLE",
            NegotiationState::Proposed => "PROPOSED",
            NegotiationState::Confirming => "CONFIRMING",
            NegotiationState::Confirmed => "CONFIRMED",
            NegotiationState::Discarded => "DISCARDED",
        }
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
