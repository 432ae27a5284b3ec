//! Topic handlers.

use crate::errors::ApiError;
use crate::handlers::{parse_body, parse_id};
use crate::models::{MessageResponse, NewTopic, SearchTopicRequest, Topic, TopicUpdate};
use crate::routes::AppState;
use crate::services::topic_service::TOPIC_NOT_FOUND;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

#[instrument(skip_all, name = "planner.topics.create_handler")]
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Topic>), ApiError> {
    let request: NewTopic = parse_body(&body, "create_topic")?;
    let topic = state.topic_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Topic>>, ApiError> {
    Ok(Json(state.topic_service.list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Topic>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.topic_service.get(id).await?))
}

pub async fn get_by_name(
    State(state): State<Arc<AppState>>,
    Path(topic_name): Path<String>,
) -> Result<Json<Topic>, ApiError> {
    Ok(Json(state.topic_service.get_by_name(&topic_name).await?))
}

/// Handler for POST /topics/search
///
/// Answers the topic, or `{ "message": "Topic not found" }` with 200.
#[instrument(skip_all, name = "planner.topics.search_handler")]
pub async fn search(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let request: SearchTopicRequest = parse_body(&body, "search_topics")?;
    match state.topic_service.search(&request.topic_name).await? {
        Some(topic) => Ok(Json(topic).into_response()),
        None => Ok(Json(MessageResponse::new(TOPIC_NOT_FOUND)).into_response()),
    }
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Topic>, ApiError> {
    let id = parse_id(&id)?;
    let request: TopicUpdate = parse_body(&body, "update_topic")?;
    Ok(Json(state.topic_service.update(id, request).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.topic_service.delete(id).await?))
}
