//! Inbound realtime messages
//!
//! Wire shape: `{ "type": "<event>", "affected": [ ... ] }`. Entries of
//! `affected` can be bare ids or delta objects; only their ids are used.
//! Payload contents are never applied as state.

use serde::Deserialize;
use std::fmt;

use super::error::RealtimeError;
use crate::api::wire::loose_id;
use crate::core_types::{ChampionshipId, MatchId};

/// What a channel is subscribed to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelScope {
    Championship(ChampionshipId),
    Match(MatchId),
}

impl ChannelScope {
    pub fn id(&self) -> &str {
        match self {
            ChannelScope::Championship(id) | ChannelScope::Match(id) => id,
        }
    }

    /// Path below `realtime.base_url`
    pub fn path(&self) -> String {
        match self {
            ChannelScope::Championship(id) => format!("championships/{}", id),
            ChannelScope::Match(id) => format!("matches/{}", id),
        }
    }

    /// Full channel URL for a base like `ws://host/ws`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for ChannelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelScope::Championship(id) => write!(f, "championship:{}", id),
            ChannelScope::Match(id) => write!(f, "match:{}", id),
        }
    }
}

/// Recognized event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ChampionshipStatusChanged,
    MatchResultUpdated,
    TransferUpdated,
}

impl EventKind {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "championship_status_change" => Some(EventKind::ChampionshipStatusChanged),
            "match_result_update" => Some(EventKind::MatchResultUpdated),
            "transfer_update" => Some(EventKind::TransferUpdated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ChampionshipStatusChanged => "championship_status_change",
            EventKind::MatchResultUpdated => "match_result_update",
            EventKind::TransferUpdated => "transfer_update",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct InboundMessage {
    #[serde(rename = "type")]
    kind: String,
    /// Missing and `null` both mean "nothing named"
    #[serde(default)]
    affected: Option<Vec<serde_json::Value>>,
}

/// "These cached entities are stale"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub kind: EventKind,
    pub scope: ChannelScope,
    /// Ids named by the message; empty means the scope's own entity
    pub ids: Vec<String>,
}

impl Invalidation {
    /// Ids of the entity type this event is about, falling back to the
    /// channel scope when the message named none and the scope matches
    pub fn targets(&self) -> Vec<String> {
        if !self.ids.is_empty() {
            return self.ids.clone();
        }
        match (self.kind, &self.scope) {
            (EventKind::ChampionshipStatusChanged, ChannelScope::Championship(id))
            | (EventKind::MatchResultUpdated, ChannelScope::Match(id)) => vec![id.clone()],
            _ => vec![],
        }
    }
}

/// Parse one text frame.
///
/// `Ok(None)` for unrecognized event types, which are ignored.
pub fn parse_message(
    text: &str,
    scope: &ChannelScope,
) -> Result<Option<Invalidation>, RealtimeError> {
    let msg: InboundMessage =
        serde_json::from_str(text).map_err(|e| RealtimeError::Malformed(e.to_string()))?;

    let Some(kind) = EventKind::from_wire(&msg.kind) else {
        return Ok(None);
    };

    let ids = msg
        .affected
        .unwrap_or_default()
        .iter()
        .filter_map(loose_id)
        .collect();
    Ok(Some(Invalidation {
        kind,
        scope: scope.clone(),
        ids,
    }))
}
