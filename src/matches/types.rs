use chrono::{DateTime, Utc};

use crate::core_types::{ChampionshipId, MatchId, RefereeId, VenueId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VenueRef {
    pub id: VenueId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefereeRef {
    pub id: RefereeId,
    pub name: String,
}

/// When and where a match is played, and who officiates it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSchedule {
    pub scheduled_at: DateTime<Utc>,
    pub venue: VenueRef,
    /// Ordered: first referee, second referee, line judges
    pub referees: Vec<RefereeRef>,
}

/// Sets won by each side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScore {
    pub home: u8,
    pub away: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: MatchId,
    pub championship_id: ChampionshipId,
    pub home_team: String,
    pub away_team: String,
    pub schedule: MatchSchedule,
    /// `None` until the match has been played
    pub result: Option<SetScore>,
}
