//! Learning plan handlers.
//!
//! - `POST /learning-plans`
//! - `GET /learning-plans[?userId=]`
//! - `GET /learning-plans/user/:userId`
//! - `GET|PUT|DELETE /learning-plans/:id`
//! - `PATCH /learning-plans/:id/phases/status`
//! - `PATCH /learning-plans/:id/topics/status`

use crate::errors::ApiError;
use crate::handlers::{parse_body, parse_id};
use crate::models::{
    CreateLearningPlanRequest, LearningPlan, LearningPlanQuery, MessageResponse,
    UpdateLearningPlanRequest, UpdatePhaseStatusRequest, UpdateTopicStatusRequest,
};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

#[instrument(skip_all, name = "planner.plans.create_handler")]
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<LearningPlan>), ApiError> {
    let request: CreateLearningPlanRequest = parse_body(&body, "create_plan")?;
    let plan = state.learning_plan_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LearningPlanQuery>,
) -> Result<Json<Vec<LearningPlan>>, ApiError> {
    let user_id = query.user_id.as_deref().filter(|id| !id.is_empty());
    Ok(Json(state.learning_plan_service.list(user_id).await?))
}

pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<LearningPlan>>, ApiError> {
    Ok(Json(state.learning_plan_service.list(Some(&user_id)).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LearningPlan>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.learning_plan_service.get(id).await?))
}

#[instrument(skip_all, name = "planner.plans.update_handler")]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<LearningPlan>, ApiError> {
    let id = parse_id(&id)?;
    let request: UpdateLearningPlanRequest = parse_body(&body, "update_plan")?;
    Ok(Json(state.learning_plan_service.update(id, request).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.learning_plan_service.delete(id).await?))
}

pub async fn update_phase_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<LearningPlan>, ApiError> {
    let id = parse_id(&id)?;
    let request: UpdatePhaseStatusRequest = parse_body(&body, "phase_status")?;
    let plan = state
        .learning_plan_service
        .set_phase_status(id, &request.phase_name, request.status)
        .await?;
    Ok(Json(plan))
}

pub async fn update_topic_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<LearningPlan>, ApiError> {
    let id = parse_id(&id)?;
    let request: UpdateTopicStatusRequest = parse_body(&body, "topic_status")?;
    let plan = state
        .learning_plan_service
        .set_topic_status(id, &request.topic_title, request.status)
        .await?;
    Ok(Json(plan))
}
