//! HTTP client for the association API

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::config::ApiConfig;

/// Header carrying a client-generated ULID on every mutation
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest error body echoed into an [`ApiError`]
const MAX_ERROR_BODY: usize = 256;

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg", alias = "error")]
    message: String,
}

/// Shared, cheaply clonable API client
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an absolute URL from path segments; each segment is percent-encoded
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and decode a JSON body
    pub async fn get<R>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(segments)?;
        let request = self.http.get(url).query(query);
        let response = self.execute(Method::GET, request).await?;
        decode(response).await
    }

    /// PUT a JSON body, discarding the response body
    pub async fn put<B>(&self, segments: &[&str], body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let request = self.with_request_id(self.http.put(url)).json(body);
        self.execute(Method::PUT, request).await?;
        Ok(())
    }

    /// POST a JSON body, discarding the response body
    pub async fn post<B>(&self, segments: &[&str], body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let request = self.with_request_id(self.http.post(url)).json(body);
        self.execute(Method::POST, request).await?;
        Ok(())
    }

    fn with_request_id(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(REQUEST_ID_HEADER, ulid::Ulid::new().to_string())
    }

    async fn execute(&self, method: Method, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(method = %method, error = %e, "HTTP request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(method = %method, url = %response.url(), status = status.as_u16(), "HTTP response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or_else(|_| truncate(&text, MAX_ERROR_BODY));
        Err(ApiError::from_status(status.as_u16(), message))
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    response
        .json::<R>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
