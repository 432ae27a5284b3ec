//! Completion API passthrough handlers.
//!
//! Every endpoint answers 200 with the [`AiResult`] envelope; upstream
//! failures are reported as `success: false` inside the body.

use crate::errors::ApiError;
use crate::handlers::parse_body;
use crate::routes::AppState;
use crate::services::ai_service::AiResult;
use crate::services::openai_client::ChatMessage;
use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct JsonBody {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateJsonBody {
    pub messages: Vec<ChatMessage>,
    pub schema: Value,
}

#[instrument(skip_all, name = "planner.ai.chat_handler")]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AiResult<String>>, ApiError> {
    let request: ChatBody = parse_body(&body, "ai_chat")?;
    Ok(Json(state.ai_service.chat(request.messages).await))
}

#[instrument(skip_all, name = "planner.ai.text_handler")]
pub async fn text(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AiResult<String>>, ApiError> {
    let request: TextBody = parse_body(&body, "ai_text")?;
    Ok(Json(state.ai_service.text(request.prompt).await))
}

#[instrument(skip_all, name = "planner.ai.embedding_handler")]
pub async fn embedding(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AiResult<Vec<f64>>>, ApiError> {
    let request: EmbeddingBody = parse_body(&body, "ai_embedding")?;
    Ok(Json(state.ai_service.embedding(request.text).await))
}

pub async fn models(State(state): State<Arc<AppState>>) -> Json<AiResult<Vec<Value>>> {
    Json(state.ai_service.models().await)
}

/// Handler for POST /openai/json
#[instrument(skip_all, name = "planner.ai.json_handler")]
pub async fn generate_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AiResult<Value>>, ApiError> {
    let request: JsonBody = parse_body(&body, "ai_json")?;
    Ok(Json(
        state
            .ai_service
            .generate_json(request.messages, request.schema.as_ref())
            .await,
    ))
}

/// Handler for POST /openai/json/validate
#[instrument(skip_all, name = "planner.ai.json_validate_handler")]
pub async fn validate_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AiResult<Value>>, ApiError> {
    let request: ValidateJsonBody = parse_body(&body, "ai_json_validate")?;
    Ok(Json(
        state
            .ai_service
            .validate_and_generate_json(request.messages, &request.schema)
            .await,
    ))
}
