//! Core identifier types
//!
//! Every id is assigned by the remote association service. The client treats
//! them as opaque strings and never originates one.

/// Transfer request ("traspaso") id
pub type TransferId = String;

/// Championship id; scopes transfer listings and realtime channels
pub type ChampionshipId = String;

/// Match id
pub type MatchId = String;

/// Club id
pub type ClubId = String;

/// User id of the acting person (player, president, referee)
pub type UserId = String;

pub type VenueId = String;

pub type RefereeId = String;
