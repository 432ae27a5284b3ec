//! HTTP client for the OpenAI-compatible completion API.
//!
//! [`CompletionApi`] is the seam the AI service consumes; [`OpenAiClient`] is
//! the reqwest-backed implementation. Wire types mirror the provider's JSON.

use crate::config::OpenAiConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextCompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextCompletionResponse {
    #[serde(default)]
    pub choices: Vec<TextChoice>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextChoice {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingData {
    #[serde(default)]
    pub embedding: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AiClientError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("{status} {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from completion API: {0}")]
    Decode(String),
}

/// Completion API operations consumed by the AI service.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AiClientError>;

    async fn text_completion(
        &self,
        request: TextCompletionRequest,
    ) -> Result<TextCompletionResponse, AiClientError>;

    async fn create_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, AiClientError>;

    async fn list_models(&self) -> Result<ModelList, AiClientError>;
}

/// reqwest client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: Arc<str>,
    api_key: SecretString,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, AiClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AiClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AiClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| AiClientError::Transport(e.to_string()))?;

        decode_response(response).await
    }

    async fn get_json<Resp>(&self, path: &str) -> Result<Resp, AiClientError>
    where
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| AiClientError::Transport(e.to_string()))?;

        decode_response(response).await
    }
}

/// Provider error body: `{"error": {"message": ...}}`.
#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

async fn decode_response<Resp: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Resp, AiClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("status code (no body)")
                    .to_string()
            });
        tracing::warn!(target: "planner.ai.client", status = status.as_u16(), "Completion API returned an error");
        return Err(AiClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<Resp>()
        .await
        .map_err(|e| AiClientError::Decode(e.to_string()))
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    #[tracing::instrument(skip_all, name = "planner.ai.client.chat")]
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AiClientError> {
        self.post_json("/chat/completions", &request).await
    }

    #[tracing::instrument(skip_all, name = "planner.ai.client.text")]
    async fn text_completion(
        &self,
        request: TextCompletionRequest,
    ) -> Result<TextCompletionResponse, AiClientError> {
        self.post_json("/completions", &request).await
    }

    #[tracing::instrument(skip_all, name = "planner.ai.client.embedding")]
    async fn create_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, AiClientError> {
        self.post_json("/embeddings", &request).await
    }

    #[tracing::instrument(skip_all, name = "planner.ai.client.models")]
    async fn list_models(&self) -> Result<ModelList, AiClientError> {
        self.get_json("/models").await
    }
}
