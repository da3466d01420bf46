//! Remote scheduler adapters

use async_trait::async_trait;
use tracing::debug;

use super::types::{ReprogramProposal, ReprogramRequest};
use super::wire::ProposalDto;
use crate::api::{ApiClient, ApiError, endpoints};

/// The remote scheduler. `simulate` is read-only on the remote side.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn simulate(
        &self,
        match_id: &str,
        request: &ReprogramRequest,
    ) -> Result<ReprogramProposal, ApiError>;

    /// Commit a proposal exactly as it was returned by `simulate`
    async fn confirm(&self, proposal: &ReprogramProposal) -> Result<(), ApiError>;
}

pub struct HttpScheduleApi {
    client: ApiClient,
}

impl HttpScheduleApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn simulate(
        &self,
        match_id: &str,
        request: &ReprogramRequest,
    ) -> Result<ReprogramProposal, ApiError> {
        let dto: ProposalDto = self
            .client
            .get(&endpoints::reprogram_simulate(match_id), &request.query())
            .await?;
        debug!(match_id, start = %dto.proposed_start_time, "Reschedule simulated");
        ReprogramProposal::try_from(dto)
    }

    async fn confirm(&self, proposal: &ReprogramProposal) -> Result<(), ApiError> {
        let body = ProposalDto::from(proposal);
        self.client
            .post(&endpoints::reprogram_confirm(&proposal.match_id), &body)
            .await
    }
}


#[cfg(test)]
pub use mock::MockScheduleApi;
