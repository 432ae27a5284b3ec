use crate::crypto::{self, Claims, TokenError};
use crate::errors::ApiError;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: SecretString,
    expiry_seconds: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &SecretString, expiry_seconds: i64) -> Self {
        Self {
            secret: secret.clone(),
            expiry_seconds,
        }
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_seconds
    }

    /// Sign a token for the given identity, valid for the configured lifetime.
    pub fn sign(&self, user_id: &str, email: &str, name: &str) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + self.expiry_seconds,
        };

        crypto::sign_jwt(&claims, self.secret.expose_secret().as_bytes())
    }

    /// Verify signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        crypto::verify_jwt(token, self.secret.expose_secret().as_bytes())
    }
}
