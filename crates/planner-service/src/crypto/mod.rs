use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::ApiError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (4KB).
///
/// Oversized tokens are rejected before base64 decoding or signature checks.
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

/// Access token claims.
///
/// `sub` is the user id. `sub`, `email` and `name` identify a person and are
/// redacted from Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("email", &"[REDACTED]")
            .field("name", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Why a token failed verification.
///
/// These reasons are for server-side logs only. Callers facing clients must
/// collapse every variant into a single message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token exceeds maximum size")]
    Oversized,

    #[error("token expired")]
    Expired,

    #[error("token malformed")]
    Malformed,

    #[error("token signature invalid")]
    BadSignature,

    #[error("token rejected: {0}")]
    Other(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            other => TokenError::Other(format!("{:?}", other)),
        }
    }
}

/// Sign claims as an HS256 JWT.
#[instrument(skip_all)]
pub fn sign_jwt(claims: &Claims, secret: &[u8]) -> Result<String, ApiError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &EncodingKey::from_secret(secret))
        .map_err(|e| ApiError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify an HS256 JWT and return its claims.
///
/// Checks size, signature and expiry (no leeway). The returned error keeps
/// the precise reason so it can be logged.
#[instrument(skip_all)]
pub fn verify_jwt(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "planner.crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(TokenError::Oversized);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?;

    Ok(token_data.claims)
}

/// Hash a password with bcrypt.
///
/// The cost is re-checked against the accepted range even though config
/// validation already enforces it.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ApiError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash (constant-time compare).
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::Crypto(format!("Password verification failed: {}", e)))
}
