//! Match Reprogramming
//!
//! Simulate-then-confirm rescheduling of a match against the remote
//! scheduler. See [`negotiator`] for the state machine.
//!
//! # Invariants
//!
//! 1. **Propose Is Read-Only**: simulation never commits on the remote side
//! 2. **Confirm Verbatim**: only the exact open proposal can be confirmed
//! 3. **One Open Proposal Per Match**: a new proposal replaces the old one
//! 4. **No Half-Applied Schedule**: failures return the match to `IDLE`

pub mod adapters;
pub mod error;
pub mod negotiator;
pub mod types;
pub mod wire;

pub use adapters::{HttpScheduleApi, ScheduleApi};
pub use error::ReprogramError;
pub use negotiator::ReprogramNegotiator;
pub use types::{NegotiationState, ReprogramProposal, ReprogramRequest};
