//! Transfer Remote Adapters
//!
//! [`TransferApi`] is the seam between the transfer core and the remote
//! association service. The HTTP implementation lives in [`http`]; tests use
//! the in-memory [`MockTransferApi`].

pub mod http;

pub use http::HttpTransferApi;

use async_trait::async_trait;

use super::types::{Actor, Decision, ListScope, RequestType, TransferRequest};
use crate::api::ApiError;

/// Remote operations on transfer requests
///
/// Implementations perform exactly one remote call per method and never
/// retry; retries are a user decision.
#[async_trait]
pub trait TransferApi: Send + Sync {
    /// Fetch one request by id
    async fn fetch(&self, transfer_id: &str) -> Result<TransferRequest, ApiError>;

    /// Fetch the active requests of a championship, scoped to an actor
    async fn list(
        &self,
        championship_id: &str,
        scope: &ListScope,
    ) -> Result<Vec<TransferRequest>, ApiError>;

    /// Approve or reject; `request_type` selects the endpoint family
    async fn decide(
        &self,
        request_type: RequestType,
        transfer_id: &str,
        decision: Decision,
        actor: &Actor,
    ) -> Result<(), ApiError>;

    /// Soft-delete (withdraw) a request
    async fn soft_delete(&self, transfer_id: &str, actor: &Actor) -> Result<(), ApiError>;
}


#[cfg(test)]
pub use mock::MockTransferApi;
