//! voley_core - Transfer Approval and Match Reprogramming Core
//!
//! Client-side core of the volleyball association app: the multi-party
//! transfer ("traspaso") approval workflow, the two-phase match reschedule
//! protocol, and the realtime channel that keeps both in sync with other
//! actors. Screens consume it through a [`session::ScreenSession`].
//!
//! # Modules
//!
//! - [`core_types`] - Opaque id aliases
//! - [`error`] - Failure taxonomy shared by subsystem errors
//! - [`config`] - YAML configuration
//! - [`logging`] - Tracing subscriber setup
//! - [`api`] - HTTP client, endpoints and wire helpers
//! - [`transfer`] - Status classification, cache and action gateway
//! - [`matches`] - Match schedule cache
//! - [`reprogram`] - Propose/confirm reschedule negotiator
//! - [`realtime`] - Invalidation channel with fixed-delay reconnect
//! - [`notifications`] - Push category to screen routing
//! - [`session`] - Per-screen bundle with teardown

// Core types - must be first!
pub mod core_types;
pub mod error;

pub mod config;
pub mod logging;

pub mod api;
pub mod matches;
pub mod notifications;
pub mod realtime;
pub mod reprogram;
pub mod session;
pub mod transfer;

// Convenient re-exports at crate root
pub use core_types::{ChampionshipId, ClubId, MatchId, RefereeId, TransferId, UserId, VenueId};
pub use error::FailureKind;
pub use notifications::{NotificationRouter, Route};
pub use realtime::{ChannelScope, RealtimeEvent};
pub use reprogram::{ReprogramError, ReprogramNegotiator, ReprogramProposal};
pub use session::{ScreenSession, SessionDeps};
pub use transfer::{
    ActingRole, ActionGateway, Actor, TransferError, TransferRequest, TransferStatus,
    TransferStore, classify,
};
