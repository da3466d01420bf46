//! Match schedule cache
//!
//! Holds the matches a screen shows. Realtime result updates and
//! championship status changes mark entries stale and re-fetch them; a
//! confirmed reschedule writes the committed schedule through
//! [`MatchStore::apply_schedule`].

pub mod adapters;
pub mod error;
pub mod handler;
pub mod store;
pub mod types;
pub mod wire;

pub use adapters::{HttpMatchApi, MatchApi};
pub use error::MatchError;
pub use store::MatchStore;
pub use types::{MatchRecord, MatchSchedule, RefereeRef, SetScore, VenueRef};
