//! AI wrapper around the completion API.
//!
//! Every operation answers with an [`AiResult`] envelope. Provider failures
//! (non-2xx, timeouts, undecodable bodies) become `{success: false, error}`
//! and are never raised as [`crate::errors::ApiError`].

use crate::services::openai_client::{
    ChatCompletionRequest, ChatMessage, CompletionApi, EmbeddingRequest, ResponseFormat,
    TextCompletionRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";

const CHAT_MAX_TOKENS: u32 = 150;
const CHAT_TEMPERATURE: f32 = 0.7;
const JSON_MAX_TOKENS: u32 = 100_000;
const JSON_TEMPERATURE: f32 = 0.5;

pub const NO_CHAT_RESPONSE: &str = "No response generated";
pub const NO_TEXT_RESPONSE: &str = "No text generated";
pub const JSON_PARSE_FAILURE: &str = "Failed to parse JSON response from AI";

/// System instruction prepended to every JSON generation request.
pub const LEARNING_PLAN_SYSTEM_PROMPT: &str = r#"You are a teaching planner that returns JSON data.
Respond strictly with valid JSON matching this schema:
{
  "title": "the topic to learn",
  "duration": "duration in weeks for the complete course",
  "prerequisites": ["array of prerequisites"],
  "phases": [{
    "focus": "phase of learning",
    "duration": "duration in weeks, just the number",
    "topics": ["detailed description of each topic in this phase, usable as context later"]
  }]
}

Only return the JSON object, no additional text."#;

/// Result envelope returned by every AI operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> AiResult<T> {
    pub fn ok(data: T, usage: Option<Value>, model: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            usage,
            model,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            usage: None,
            model: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Clone)]
pub struct AiService {
    api: Arc<dyn CompletionApi>,
    model: String,
}

impl AiService {
    pub fn new(api: Arc<dyn CompletionApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Chat completion; data is the first choice's content.
    #[instrument(skip_all, name = "planner.ai.chat")]
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> AiResult<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(CHAT_MAX_TOKENS),
            temperature: Some(CHAT_TEMPERATURE),
            response_format: None,
        };

        match self.api.chat_completion(request).await {
            Ok(response) => {
                let content = response
                    .first_content()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(NO_CHAT_RESPONSE)
                    .to_string();
                AiResult::ok(content, response.usage, response.model)
            }
            Err(e) => upstream_failure(e),
        }
    }

    /// Legacy text completion; data is the first choice's text.
    #[instrument(skip_all, name = "planner.ai.text")]
    pub async fn text(&self, prompt: String) -> AiResult<String> {
        let request = TextCompletionRequest {
            model: self.model.clone(),
            prompt,
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };

        match self.api.text_completion(request).await {
            Ok(response) => {
                let text = response
                    .choices
                    .first()
                    .and_then(|c| c.text.as_deref())
                    .filter(|t| !t.is_empty())
                    .unwrap_or(NO_TEXT_RESPONSE)
                    .to_string();
                AiResult::ok(text, response.usage, response.model)
            }
            Err(e) => upstream_failure(e),
        }
    }

    /// Embedding vector of `text`; empty when the provider returns none.
    #[instrument(skip_all, name = "planner.ai.embedding")]
    pub async fn embedding(&self, text: String) -> AiResult<Vec<f64>> {
        let request = EmbeddingRequest {
            model: EMBEDDING_MODEL.to_string(),
            input: text,
        };

        match self.api.create_embedding(request).await {
            Ok(response) => {
                let usage = response.usage;
                let model = response.model;
                let vector = response
                    .data
                    .into_iter()
                    .next()
                    .map(|d| d.embedding)
                    .unwrap_or_default();
                AiResult::ok(vector, usage, model)
            }
            Err(e) => upstream_failure(e),
        }
    }

    #[instrument(skip_all, name = "planner.ai.models")]
    pub async fn models(&self) -> AiResult<Vec<Value>> {
        match self.api.list_models().await {
            Ok(list) => AiResult::ok(list.data, None, None),
            Err(e) => upstream_failure(e),
        }
    }

    /// Generate a learning plan document as JSON.
    ///
    /// The schema hint is accepted but not enforced on the parsed result.
    #[instrument(skip_all, name = "planner.ai.generate_json")]
    pub async fn generate_json(
        &self,
        messages: Vec<ChatMessage>,
        schema: Option<&Value>,
    ) -> AiResult<Value> {
        tracing::debug!(
            target: "planner.ai",
            message_count = messages.len(),
            has_schema = schema.is_some(),
            "Generating JSON completion"
        );

        let mut prompt = Vec::with_capacity(messages.len() + 1);
        prompt.push(ChatMessage::system(LEARNING_PLAN_SYSTEM_PROMPT));
        prompt.extend(messages);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: prompt,
            max_tokens: Some(JSON_MAX_TOKENS),
            temperature: Some(JSON_TEMPERATURE),
            response_format: Some(ResponseFormat::json_object()),
        };

        let response = match self.api.chat_completion(request).await {
            Ok(response) => response,
            Err(e) => return upstream_failure(e),
        };

        let content = response.first_content().unwrap_or_default();
        match parse_json_content(content) {
            Ok(data) => AiResult::ok(data, response.usage, response.model),
            Err(e) => {
                tracing::warn!(target: "planner.ai", error = %e, "Completion content is not valid JSON");
                AiResult::failure(JSON_PARSE_FAILURE)
            }
        }
    }

    /// Same as [`Self::generate_json`] with a mandatory schema hint.
    pub async fn validate_and_generate_json(
        &self,
        messages: Vec<ChatMessage>,
        schema: &Value,
    ) -> AiResult<Value> {
        self.generate_json(messages, Some(schema)).await
    }
}

fn upstream_failure<T>(err: impl std::fmt::Display) -> AiResult<T> {
    tracing::warn!(target: "planner.ai", error = %err, "Completion API call failed");
    AiResult::failure(err.to_string())
}

/// Parse model output as JSON.
///
/// Text that starts with `{` or `[` (after trimming) is parsed directly.
/// Otherwise the interior of the first ```` ```json ```` fence is parsed, or
/// the whole text when there is no fence.
pub fn parse_json_content(content: &str) -> Result<Value, serde_json::Error> {
    let trimmed = content.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return serde_json::from_str(trimmed);
    }

    let fenced = content
        .split("```json")
        .nth(1)
        .and_then(|rest| rest.split("```").next())
        .filter(|inner| !inner.is_empty());

    serde_json::from_str(fenced.unwrap_or(content))
}
