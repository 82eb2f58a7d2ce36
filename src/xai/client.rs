//! HTTP client for the xAI API
//!
//! [`XaiClient`] wraps every upstream endpoint behind the [`XaiApi`] trait.
//! The trait is the testing seam: tools receive `&dyn XaiApi`, so unit tests
//! substitute a scripted mock and assert call counts without any network.
//!
//! Every request carries `Authorization: Bearer <key>` and
//! `Content-Type: application/json`. A non-2xx status fails with
//! `Upstream { status, body }` - no retries, no status-specific handling.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{GrokMcpError, Result};
use crate::xai::types::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse, ModelList, ResponsesRequest, ResponsesResponse, VideoEditRequest,
    VideoGenerationRequest, VideoJob,
};

/// Upstream API surface consumed by the tool handlers.
///
/// One operation per endpoint. Implementations must be stateless per call;
/// the only shared value is the credential established at construction.
#[async_trait]
pub trait XaiApi: Send + Sync {
    /// `GET /v1/models`
    async fn list_models(&self) -> Result<ModelList>;

    /// `POST /v1/chat/completions`
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;

    /// `POST /v1/images/generations`
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse>;

    /// `POST /v1/videos/generations`
    async fn generate_video(&self, request: &VideoGenerationRequest) -> Result<VideoJob>;

    /// `POST /v1/videos/edits`
    async fn edit_video(&self, request: &VideoEditRequest) -> Result<VideoJob>;

    /// `GET /v1/videos/{id}`
    async fn video_status(&self, job_id: &str) -> Result<VideoJob>;

    /// `POST /v1/responses` - tool-augmented generation (live search)
    async fn create_response(&self, request: &ResponsesRequest) -> Result<ResponsesResponse>;
}

/// reqwest-backed implementation of [`XaiApi`]
#[derive(Debug, Clone)]
pub struct XaiClient {
    config: Config,
    client: reqwest::Client,
}

impl XaiClient {
    /// Create a client from an immutable startup configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        tracing::debug!(path, "xAI POST request");
        let response = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GrokMcpError::network(format!("request to {} failed: {}", path, e)))?;

        Self::parse_response(path, response).await
    }

    async fn get_json<Resp>(&self, path: &str) -> Result<Resp>
    where
        Resp: DeserializeOwned,
    {
        tracing::debug!(path, "xAI GET request");
        let response = self
            .client
            .get(self.url(path))
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| GrokMcpError::network(format!("request to {} failed: {}", path, e)))?;

        Self::parse_response(path, response).await
    }

    async fn parse_response<Resp>(path: &str, response: reqwest::Response) -> Result<Resp>
    where
        Resp: DeserializeOwned,
    {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GrokMcpError::network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "xAI request failed");
            return Err(GrokMcpError::upstream(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            GrokMcpError::serialization(format!("failed to parse {} response: {}", path, e))
        })
    }
}

#[async_trait]
impl XaiApi for XaiClient {
    async fn list_models(&self) -> Result<ModelList> {
        self.get_json("/v1/models").await
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.post_json("/v1/chat/completions", request).await
    }

    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        self.post_json("/v1/images/generations", request).await
    }

    async fn generate_video(&self, request: &VideoGenerationRequest) -> Result<VideoJob> {
        self.post_json("/v1/videos/generations", request).await
    }

    async fn edit_video(&self, request: &VideoEditRequest) -> Result<VideoJob> {
        self.post_json("/v1/videos/edits", request).await
    }

    async fn video_status(&self, job_id: &str) -> Result<VideoJob> {
        self.get_json(&format!("/v1/videos/{}", job_id)).await
    }

    async fn create_response(&self, request: &ResponsesRequest) -> Result<ResponsesResponse> {
        self.post_json("/v1/responses", request).await
    }
}
