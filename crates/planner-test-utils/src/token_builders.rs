//! Builder patterns for test tokens.

use crate::fixtures::TEST_JWT_SECRET;
use chrono::{Duration, Utc};
use planner_service::crypto::{sign_jwt, Claims};

/// Builder for signed test access tokens.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("0000-...")
///     .with_email("ada@example.com")
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    email: String,
    name: String,
    iat: i64,
    exp: i64,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-subject".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(3600)).timestamp(),
        }
    }

    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set expiration in seconds from now; negative values yield an expired token.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    pub fn build(self) -> Claims {
        Claims {
            sub: self.sub,
            email: self.email,
            name: self.name,
            iat: self.iat,
            exp: self.exp,
        }
    }

    /// Sign with [`TEST_JWT_SECRET`].
    pub fn sign(self) -> String {
        self.sign_with(TEST_JWT_SECRET.as_bytes())
    }

    /// Sign with an arbitrary secret, e.g. to forge a bad signature.
    pub fn sign_with(self, secret: &[u8]) -> String {
        sign_jwt(&self.build(), secret).expect("test token should sign")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
