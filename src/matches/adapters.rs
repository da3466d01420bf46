//! Match detail adapters

use async_trait::async_trait;

use super::types::MatchRecord;
use super::wire::MatchDto;
use crate::api::{ApiClient, ApiError, endpoints};

#[async_trait]
pub trait MatchApi: Send + Sync {
    async fn fetch(&self, match_id: &str) -> Result<MatchRecord, ApiError>;
}

pub struct HttpMatchApi {
    client: ApiClient,
}

impl HttpMatchApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MatchApi for HttpMatchApi {
    async fn fetch(&self, match_id: &str) -> Result<MatchRecord, ApiError> {
        let dto: MatchDto = self
            .client
            .get(&endpoints::match_detail(match_id), &[])
            .await?;
        Ok(dto.into())
    }
}


#[cfg(test)]
pub use mock::MockMatchApi;
