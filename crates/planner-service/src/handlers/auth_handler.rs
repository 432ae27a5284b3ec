//! Authentication handlers.
//!
//! - `POST /auth/login` - Exchange credentials for an access token (public)
//! - `GET /auth/profile` - Principal resolved by the access guard

use crate::errors::ApiError;
use crate::handlers::parse_body;
use crate::models::{AuthUser, LoginRequest, MessageResponse};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use tracing::instrument;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Handler for POST /auth/login
///
/// # Response
///
/// - 200 OK: `{ "access_token": ... }`
/// - 200 OK: `{ "message": "Invalid credentials" }` on unknown email or wrong password
/// - 400 Bad Request: Malformed body
#[instrument(skip_all, name = "planner.auth.login_handler")]
pub async fn login(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let request: LoginRequest = parse_body(&body, "login")?;

    match state
        .auth_service
        .validate_user(&request.email, &request.password)
        .await?
    {
        Some(user) => Ok(Json(state.auth_service.login(&user)?).into_response()),
        None => Ok(Json(MessageResponse::new(INVALID_CREDENTIALS_MESSAGE)).into_response()),
    }
}

/// Handler for GET /auth/profile
#[instrument(skip_all, name = "planner.auth.profile")]
pub async fn profile(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
