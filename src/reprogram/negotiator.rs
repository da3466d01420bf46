//! Reprogram Proposal Negotiator
//!
//! Per-match two-phase reschedule:
//!
//! ```text
//!        propose            confirm ok
//! IDLE ──────────▶ PROPOSED ─────────▶ CONFIRMING ─────▶ CONFIRMED
//!   ▲                 │  │                  │
//!   │     discard     │  │ ttl elapsed      │ remote failure
//!   │  ◀── DISCARDED ◀┘  ▼                  │
//!   └──────────────── IDLE ◀────────────────┘
//! ```
//!
//! A new `propose` replaces any open proposal for the match. `confirm` only
//! accepts the exact proposal last returned, and never leaves a half-applied
//! schedule behind: after a remote failure the match is back to `IDLE`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::adapters::ScheduleApi;
use super::error::ReprogramError;
use super::types::{NegotiationState, ReprogramProposal, ReprogramRequest};
use crate::core_types::MatchId;
use crate::error::FailureKind;
use crate::matches::MatchStore;

#[derive(Debug, Clone)]
enum Slot {
    Proposed {
        proposal: ReprogramProposal,
        proposed_at: Instant,
    },
    Confirming,
    Confirmed,
    Discarded,
}

impl Slot {
    fn state(&self) -> NegotiationState {
        match self {
            Slot::Proposed { .. } => NegotiationState::Proposed,
            Slot::Confirming => NegotiationState::Confirming,
            Slot::Confirmed => NegotiationState::Confirmed,
            Slot::Discarded => NegotiationState::Discarded,
        }
    }
}

pub struct ReprogramNegotiator {
    api: Arc<dyn ScheduleApi>,
    matches: Arc<MatchStore>,
    ttl: Duration,
    slots: DashMap<MatchId, Slot>,
}

impl ReprogramNegotiator {
    pub fn new(api: Arc<dyn ScheduleApi>, matches: Arc<MatchStore>, ttl: Duration) -> Self {
        Self {
            api,
            matches,
            ttl,
            slots: DashMap::new(),
        }
    }

    pub fn state(&self, match_id: &str) -> NegotiationState {
        self.slots
            .get(match_id)
            .map(|s| s.state())
            .unwrap_or(NegotiationState::Idle)
    }

    /// The open proposal for a match, if any
    pub fn proposal(&self, match_id: &str) -> Option<ReprogramProposal> {
        match self.slots.get(match_id).as_deref() {
            Some(Slot::Proposed { proposal, .. }) => Some(proposal.clone()),
            _ => None,
        }
    }

    /// Ask the remote scheduler for a new slot. Nothing is committed.
    pub async fn propose(
        &self,
        match_id: &str,
        request: &ReprogramRequest,
    ) -> Result<ReprogramProposal, ReprogramError> {
        match self.slots.entry(match_id.to_string()) {
            Entry::Occupied(e) if matches!(e.get(), Slot::Confirming) => {
                return Err(ReprogramError::ConfirmInFlight(match_id.to_string()));
            }
            Entry::Occupied(e) => {
                if matches!(e.get(), Slot::Proposed { .. }) {
                    debug!(match_id, "Discarding previous proposal");
                }
                e.remove();
            }
            Entry::Vacant(_) => {}
        }

        let proposal = self.api.simulate(match_id, request).await.map_err(|e| {
            warn!(match_id, error = %e, "Reschedule simulation failed");
            ReprogramError::from(e)
        })?;

        if proposal.match_id != match_id {
            return Err(ReprogramError::Remote(format!(
                "scheduler answered for match {} instead of {}",
                proposal.match_id, match_id
            )));
        }

        // a confirmation started meanwhile owns the slot
        match self.slots.entry(match_id.to_string()) {
            Entry::Occupied(e) if matches!(e.get(), Slot::Confirming) => {
                return Err(ReprogramError::ConfirmInFlight(match_id.to_string()));
            }
            entry => {
                entry.insert(Slot::Proposed {
                    proposal: proposal.clone(),
                    proposed_at: Instant::now(),
                });
            }
        }

        info!(
            match_id,
            start = %proposal.proposed_start_time,
            venue = %proposal.proposed_venue.id,
            referees = proposal.proposed_referees.len(),
            "Reschedule proposed"
        );
        Ok(proposal)
    }

    /// Commit `proposal`, which must equal the open proposal for its match.
    ///
    /// On success the cached match schedule is replaced with the proposal's.
    pub async fn confirm(&self, proposal: &ReprogramProposal) -> Result<(), ReprogramError> {
        let match_id = proposal.match_id.as_str();
        self.begin_confirm(proposal)?;

        match self.api.confirm(proposal).await {
            Ok(()) => {
                self.slots.insert(match_id.to_string(), Slot::Confirmed);
                if !self.matches.apply_schedule(match_id, proposal.schedule()) {
                    debug!(match_id, "Confirmed match not cached, nothing to update");
                }
                info!(match_id, start = %proposal.proposed_start_time, "Reschedule confirmed");
                Ok(())
            }
            Err(e) => {
                self.slots.remove(match_id);
                let err = ReprogramError::from(e);
                warn!(match_id, error = %err, kind = %err.kind(), "Reschedule confirmation failed");
                if err.kind() == FailureKind::Conflict {
                    self.matches.invalidate(match_id);
                    if let Err(e) = self.matches.refresh(match_id).await {
                        warn!(match_id, error = %e, "Match re-fetch after conflict failed");
                    }
                }
                Err(err)
            }
        }
    }

    /// Drop the open proposal. No remote call is made.
    pub fn discard(&self, match_id: &str) -> Result<(), ReprogramError> {
        match self.slots.get_mut(match_id) {
            Some(mut slot) => match slot.state() {
                NegotiationState::Proposed => {
                    *slot = Slot::Discarded;
                    info!(match_id, "Reschedule proposal discarded");
                    Ok(())
                }
                NegotiationState::Confirming => {
                    Err(ReprogramError::ConfirmInFlight(match_id.to_string()))
                }
                _ => Err(ReprogramError::NotProposed(match_id.to_string())),
            },
            None => Err(ReprogramError::NotProposed(match_id.to_string())),
        }
    }

    /// Validate against the open proposal and move it to `Confirming`
    fn begin_confirm(&self, proposal: &ReprogramProposal) -> Result<(), ReprogramError> {
        let match_id = proposal.match_id.as_str();
        let mut slot = self
            .slots
            .get_mut(match_id)
            .ok_or_else(|| ReprogramError::NotProposed(match_id.to_string()))?;

        let age = match &*slot {
            Slot::Proposed {
                proposal: open,
                proposed_at,
            } => {
                if open != proposal {
                    return Err(ReprogramError::StaleProposal(match_id.to_string()));
                }
                proposed_at.elapsed()
            }
            Slot::Confirming => return Err(ReprogramError::ConfirmInFlight(match_id.to_string())),
            Slot::Confirmed | Slot::Discarded => {
                return Err(ReprogramError::NotProposed(match_id.to_string()));
            }
        };

        if age > self.ttl {
            drop(slot);
            self.slots.remove(match_id);
            warn!(match_id, age_secs = age.as_secs(), "Reschedule proposal expired");
            return Err(ReprogramError::Expired {
                match_id: match_id.to_string(),
                age_secs: age.as_secs(),
            });
        }

        *slot = Slot::Confirming;
        Ok(())
    }
}
