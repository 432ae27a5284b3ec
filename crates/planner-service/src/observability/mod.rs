//! Logging setup and privacy helpers.
//!
//! Instrumented service functions use `#[instrument(skip_all)]` and log only
//! explicitly chosen fields. Emails and other contact details are never
//! logged in plaintext; use [`hash_for_correlation`] when a log line needs to
//! tie events for the same person together. Passwords, tokens and API keys
//! never appear in logs.

use sha2::{Digest, Sha256};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "planner_service=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// `LOG_FORMAT=json` selects the JSON formatter; anything else uses the
/// human-readable one.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Hash a value for log correlation.
///
/// Returns the first 8 hex characters of its SHA-256 digest.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.iter().take(4).copied().collect::<Vec<u8>>())
}
