//! Request-level access guard.
//!
//! Every request is checked against a fixed list of exempt (method, path)
//! pairs. Exempt requests pass straight through. All others must carry a
//! Bearer token, which is verified once and the resolved [`AuthUser`] is
//! stored in the request extensions for handlers.
//!
//! # Authorization Header Format
//!
//! ```text
//! Authorization: Bearer <token>
//! ```

use crate::errors::ApiError;
use crate::models::AuthUser;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// Message when a protected request resolves no user.
pub const MISSING_USER_MESSAGE: &str = "Invalid or expired token";

/// Verifies a bearer token and resolves the principal it names.
///
/// A token that fails verification resolves `Ok(None)`; `Err` is reserved
/// for upstream failures.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Option<AuthUser>, ApiError>;
}

/// (method, target) pairs that bypass token verification. The target is the
/// path plus any query string and must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptRoutes {
    routes: Vec<(Method, String)>,
}

impl ExemptRoutes {
    pub fn new<'a>(routes: impl IntoIterator<Item = (Method, &'a str)>) -> Self {
        Self {
            routes: routes
                .into_iter()
                .map(|(method, path)| (method, path.to_string()))
                .collect(),
        }
    }

    /// Registration and login.
    pub fn public_defaults() -> Self {
        Self::new([(Method::POST, "/users"), (Method::POST, "/auth/login")])
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes.iter().any(|(m, p)| m == method && p == path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    exempt: ExemptRoutes,
    verifier: Arc<dyn TokenVerifier>,
}

impl AccessGuard {
    pub fn new(exempt: ExemptRoutes, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { exempt, verifier }
    }

    pub fn is_exempt(&self, method: &Method, path: &str) -> bool {
        self.exempt.contains(method, path)
    }

    /// Resolve the user named by the request's bearer token.
    ///
    /// A missing or non-Bearer header resolves no user, as does a token that
    /// fails verification. A present token is verified exactly once and
    /// upstream errors are returned unchanged.
    pub fn verify_request(&self, headers: &HeaderMap) -> Result<Option<AuthUser>, ApiError> {
        let Some(token) = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        else {
            tracing::debug!(target: "planner.guard", "Missing or malformed Authorization header");
            return Ok(None);
        };

        self.verifier.verify(token.trim())
    }

    /// Map a verification outcome to allow or deny.
    ///
    /// Upstream errors pass through as-is; an absent user is `Unauthorized`.
    pub fn handle_request(
        outcome: Result<Option<AuthUser>, ApiError>,
    ) -> Result<AuthUser, ApiError> {
        match outcome? {
            Some(user) => Ok(user),
            None => Err(ApiError::Unauthorized(MISSING_USER_MESSAGE.to_string())),
        }
    }

    /// Full decision for one request. `Ok(None)` means exempt.
    ///
    /// `target` is the request path with its query string, if any.
    pub fn authorize(
        &self,
        method: &Method,
        target: &str,
        headers: &HeaderMap,
    ) -> Result<Option<AuthUser>, ApiError> {
        if self.is_exempt(method, target) {
            return Ok(None);
        }
        Self::handle_request(self.verify_request(headers)).map(Some)
    }
}

/// Middleware applying the [`AccessGuard`] to every request.
#[instrument(skip_all, name = "planner.middleware.guard")]
pub async fn require_auth(
    State(guard): State<Arc<AccessGuard>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.uri().path());
    let decision = guard.authorize(req.method(), target, req.headers());

    match decision {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::debug!(
                target: "planner.guard",
                method = %req.method(),
                path = %req.uri().path(),
                "Request denied"
            );
            return Err(e);
        }
    }

    Ok(next.run(req).await)
}
