//! HTTP adapter for transfer requests

use async_trait::async_trait;
use tracing::debug;

use super::TransferApi;
use crate::api::{ApiClient, ApiError, endpoints};
use crate::transfer::types::{Actor, Decision, ListScope, RequestType, TransferRequest};
use crate::transfer::wire::{ActionBody, TransferDto};

pub struct HttpTransferApi {
    client: ApiClient,
}

impl HttpTransferApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransferApi for HttpTransferApi {
    async fn fetch(&self, transfer_id: &str) -> Result<TransferRequest, ApiError> {
        let dto: TransferDto = self
            .client
            .get(&endpoints::transfer_detail(transfer_id), &[])
            .await?;
        Ok(dto.into())
    }

    async fn list(
        &self,
        championship_id: &str,
        scope: &ListScope,
    ) -> Result<Vec<TransferRequest>, ApiError> {
        let dtos: Vec<TransferDto> = self
            .client
            .get(
                &endpoints::championship_transfers(championship_id),
                &scope.query(),
            )
            .await?;
        debug!(championship_id, count = dtos.len(), "Fetched transfer listing");
        Ok(dtos.into_iter().map(TransferRequest::from).collect())
    }

    async fn decide(
        &self,
        request_type: RequestType,
        transfer_id: &str,
        decision: Decision,
        actor: &Actor,
    ) -> Result<(), ApiError> {
        let action = match decision {
            Decision::Approve => endpoints::APPROVE,
            Decision::Reject => endpoints::REJECT,
        };
        let path = match request_type {
            RequestType::PlayerInitiated => endpoints::player_request_action(transfer_id, action),
            RequestType::PresidentInitiated => {
                endpoints::president_request_action(transfer_id, action)
            }
        };
        let body = ActionBody {
            role: actor.role.as_str(),
            actor_id: &actor.user_id,
        };
        self.client.put(&path, &body).await
    }

    async fn soft_delete(&self, transfer_id: &str, actor: &Actor) -> Result<(), ApiError> {
        let body = ActionBody {
            role: actor.role.as_str(),
            actor_id: &actor.user_id,
        };
        self.client
            .put(&endpoints::transfer_soft_delete(transfer_id), &body)
            .await
    }
}
