//! User handlers.
//!
//! Lookups that find nothing answer `null` rather than 404.

use crate::errors::ApiError;
use crate::handlers::{parse_body, parse_id};
use crate::models::{CreateUserRequest, PublicUser, SearchUserRequest, UpdateUserRequest};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /users (public)
///
/// # Response
///
/// - 201 Created: User without its password hash
/// - 400 Bad Request: Validation failure
/// - 409 Conflict: Email already registered
#[instrument(skip_all, name = "planner.users.register_handler")]
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let request: CreateUserRequest = parse_body(&body, "register")?;
    let user = state.user_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    Ok(Json(state.user_service.list().await?))
}

pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<PublicUser>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.user_service.get_by_id(id).await?))
}

pub async fn get_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Option<PublicUser>>, ApiError> {
    Ok(Json(state.user_service.get_by_email(&email).await?))
}

pub async fn get_by_mobile(
    State(state): State<Arc<AppState>>,
    Path(mobile): Path<String>,
) -> Result<Json<Option<PublicUser>>, ApiError> {
    Ok(Json(state.user_service.get_by_mobile(&mobile).await?))
}

#[instrument(skip_all, name = "planner.users.update_handler")]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Option<PublicUser>>, ApiError> {
    let id = parse_id(&id)?;
    let request: UpdateUserRequest = parse_body(&body, "update_user")?;
    Ok(Json(state.user_service.update(id, request).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.user_service.delete(id).await?))
}

/// Handler for POST /users/search
///
/// First user matching every given field, or `null`.
#[instrument(skip_all, name = "planner.users.search_handler")]
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Option<PublicUser>>, ApiError> {
    let request: SearchUserRequest = parse_body(&body, "search_users")?;
    Ok(Json(state.user_service.search(request).await?))
}
