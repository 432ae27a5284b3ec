//! Credential validation and token issuance.
//!
//! Composes the user store, the password hasher and the token service.

use crate::crypto;
use crate::errors::ApiError;
use crate::middleware::access_guard::TokenVerifier;
use crate::models::{AuthUser, PublicUser, TokenResponse};
use crate::observability::hash_for_correlation;
use crate::repositories::UserStore;
use crate::services::token_service::TokenService;
use std::sync::Arc;
use tracing::instrument;

/// Client-facing message for every token verification failure.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Verified against when the email is unknown so both paths cost one bcrypt run.
const DUMMY_BCRYPT_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Check an email/password pair.
    ///
    /// Returns the user without its hash on a match and `None` for an unknown
    /// email or a wrong password. Store and hasher failures propagate.
    #[instrument(skip_all, name = "planner.auth.validate_user")]
    pub async fn validate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<PublicUser>, ApiError> {
        let email_hash = hash_for_correlation(email);

        let Some(user) = self.users.find_by_email(email).await? else {
            let _ = crypto::verify_password(password, DUMMY_BCRYPT_HASH);
            tracing::debug!(target: "planner.auth", email_hash = %email_hash, "Unknown email");
            return Ok(None);
        };

        if !crypto::verify_password(password, &user.password_hash)? {
            tracing::debug!(target: "planner.auth", email_hash = %email_hash, "Password mismatch");
            return Ok(None);
        }

        Ok(Some(PublicUser::from(user)))
    }

    /// Issue an access token for an already validated user.
    #[instrument(skip_all, name = "planner.auth.login")]
    pub fn login(&self, user: &PublicUser) -> Result<TokenResponse, ApiError> {
        let access_token = self
            .tokens
            .sign(&user.id.to_string(), &user.email, &user.name)?;

        tracing::info!(target: "planner.auth", user_id = %user.id, "Access token issued");

        Ok(TokenResponse { access_token })
    }

    /// Verify a token and return the principal it names.
    ///
    /// Every failure reason is logged and then reported as the same
    /// `Unauthorized("Invalid token")`.
    pub fn validate_token(&self, token: &str) -> Result<AuthUser, ApiError> {
        let claims = self.tokens.verify(token).map_err(|reason| {
            tracing::debug!(target: "planner.auth", reason = %reason, "Token verification failed");
            ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Guard-facing verification: every token failure resolves no user.
impl TokenVerifier for AuthService {
    fn verify(&self, token: &str) -> Result<Option<AuthUser>, ApiError> {
        match self.tokens.verify(token) {
            Ok(claims) => Ok(Some(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                name: claims.name,
            })),
            Err(reason) => {
                tracing::debug!(target: "planner.guard", reason = %reason, "Token rejected");
                Ok(None)
            }
        }
    }
}
