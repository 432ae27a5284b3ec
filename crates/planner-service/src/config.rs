//! Service configuration.
//!
//! Configuration is loaded from environment variables. Secrets are held in
//! `SecretString` and the database URL is redacted in Debug output.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default access token lifetime in seconds (1 hour).
pub const DEFAULT_JWT_EXPIRY_SECONDS: i64 = 3600;

/// Maximum access token lifetime in seconds (24 hours).
pub const MAX_JWT_EXPIRY_SECONDS: i64 = 86_400;

/// Minimum length of the HS256 signing secret in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Minimum accepted bcrypt cost factor.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Maximum accepted bcrypt cost factor.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default completion API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default HTTP timeout for completion API calls.
pub const DEFAULT_OPENAI_TIMEOUT_SECONDS: u64 = 60;

#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:3000").
    pub bind_address: String,

    /// HS256 signing secret for access tokens.
    pub jwt_secret: SecretString,

    /// Access token lifetime in seconds.
    pub jwt_expiry_seconds: i64,

    /// Bcrypt cost factor for password hashing.
    pub bcrypt_cost: u32,

    /// Completion API settings.
    pub openai: OpenAiConfig,
}

/// Settings for the OpenAI-compatible completion API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_expiry_seconds", &self.jwt_expiry_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("openai", &self.openai)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT configuration: {0}")]
    InvalidJwt(String),

    #[error("Invalid bcrypt cost: {0}")]
    InvalidBcryptCost(String),

    #[error("Invalid OpenAI configuration: {0}")]
    InvalidOpenAi(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwt(format!(
                "JWT_SECRET must be at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                jwt_secret.len()
            )));
        }

        let jwt_expiry_seconds = match vars.get("JWT_EXPIRY_SECONDS") {
            Some(value_str) => {
                let value: i64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidJwt(format!(
                        "JWT_EXPIRY_SECONDS must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value <= 0 || value > MAX_JWT_EXPIRY_SECONDS {
                    return Err(ConfigError::InvalidJwt(format!(
                        "JWT_EXPIRY_SECONDS must be between 1 and {}, got {}",
                        MAX_JWT_EXPIRY_SECONDS, value
                    )));
                }
                value
            }
            None => DEFAULT_JWT_EXPIRY_SECONDS,
        };

        let bcrypt_cost = match vars.get("BCRYPT_COST") {
            Some(value_str) => {
                let value: u32 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidBcryptCost(format!(
                        "BCRYPT_COST must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&value) {
                    return Err(ConfigError::InvalidBcryptCost(format!(
                        "BCRYPT_COST must be between {} and {}, got {}",
                        MIN_BCRYPT_COST, MAX_BCRYPT_COST, value
                    )));
                }
                value
            }
            None => DEFAULT_BCRYPT_COST,
        };

        let api_key = vars
            .get("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let base_url = vars
            .get("OPENAI_BASE_URL")
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let model = vars
            .get("OPENAI_MODEL")
            .filter(|model| !model.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        let timeout_seconds = match vars.get("OPENAI_TIMEOUT_SECONDS") {
            Some(value_str) => {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidOpenAi(format!(
                        "OPENAI_TIMEOUT_SECONDS must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;
                if value == 0 {
                    return Err(ConfigError::InvalidOpenAi(
                        "OPENAI_TIMEOUT_SECONDS must be positive".to_string(),
                    ));
                }
                value
            }
            None => DEFAULT_OPENAI_TIMEOUT_SECONDS,
        };

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret: SecretString::from(jwt_secret.clone()),
            jwt_expiry_seconds,
            bcrypt_cost,
            openai: OpenAiConfig {
                api_key: SecretString::from(api_key.clone()),
                base_url,
                model,
                timeout_seconds,
            },
        })
    }

    /// Raw signing secret bytes for the token service.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}
