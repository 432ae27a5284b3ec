//! HTTP request handlers.

pub mod auth_handler;
pub mod learning_plan_handler;
pub mod openai_handler;
pub mod topic_handler;
pub mod user_handler;

use crate::errors::ApiError;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Parse a path identifier.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))
}

/// Deserialize a JSON body by hand so malformed input is a 400, not axum's 422.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8], target: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "planner.handlers", handler = target, error = %e, "Invalid request body");
        ApiError::BadRequest("Invalid request body".to_string())
    })
}
