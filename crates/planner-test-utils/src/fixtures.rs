//! Deterministic fixtures for tests.

use planner_service::config::Config;
use std::collections::HashMap;
use uuid::Uuid;

/// HS256 secret shared by the harness and token builders (32 bytes).
pub const TEST_JWT_SECRET: &str = "planner-test-secret-0123456789abcdef";

/// Lowest accepted bcrypt cost, to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 10;

/// Completion API base URL nothing listens on.
pub const UNREACHABLE_OPENAI_URL: &str = "http://127.0.0.1:9";

/// Environment map accepted by [`Config::from_vars`].
pub fn test_vars(openai_base_url: &str) -> HashMap<String, String> {
    HashMap::from([
        (
            "DATABASE_URL".to_string(),
            "postgresql://test/test".to_string(),
        ),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("BCRYPT_COST".to_string(), TEST_BCRYPT_COST.to_string()),
        ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
        ("OPENAI_BASE_URL".to_string(), openai_base_url.to_string()),
        ("OPENAI_MODEL".to_string(), "gpt-test".to_string()),
        ("OPENAI_TIMEOUT_SECONDS".to_string(), "5".to_string()),
    ])
}

pub fn test_config(openai_base_url: &str) -> Config {
    Config::from_vars(&test_vars(openai_base_url)).expect("test config should be valid")
}

/// Stable ID for the n-th test entity.
pub fn test_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}
