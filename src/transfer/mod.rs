//! Player Transfer ("traspaso") Approval Workflow
//!
//! A transfer request moves a player between clubs within a championship and
//! needs consent from two parties, depending on who started it:
//!
//! ```text
//! PlayerInitiated     origin president + destination president
//! PresidentInitiated  player           + origin president
//! ```
//!
//! # Aggregate status
//!
//! ```text
//!            any required REJECTED
//! PENDING ─────────────────────────────▶ REJECTED
//!    │
//!    │ all required APPROVED
//!    ▼
//! IN_PROGRESS ── debt FINALIZED ──▶ COMPLETED
//! ```
//!
//! Rejection dominates: a rejected approval wins over a finalized debt.
//!
//! # Invariants
//!
//! 1. **Single Writer**: only [`ActionGateway`] issues approval mutations
//! 2. **Validate Locally**: illegal role/action combinations never reach the network
//! 3. **No Optimistic Writes**: after a mutation the entry is re-fetched, never patched
//! 4. **One In-Flight Per Request**: a second mutation on the same id is refused

pub mod adapters;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod state;
pub mod store;
pub mod types;
pub mod wire;

pub use adapters::{HttpTransferApi, TransferApi};
pub use error::TransferError;
pub use gateway::ActionGateway;
pub use state::{TransferStatus, classify};
pub use store::TransferStore;
pub use types::{
    ActingRole, Actor, Approval, Approvals, DebtStatus, Decision, ListScope, RequestType,
    TransferRequest,
};
