//! # Planner Test Utilities
//!
//! Shared test utilities for the Learning Planner service.
//!
//! This crate provides:
//! - In-memory store implementations (no database needed)
//! - Deterministic fixtures (config, IDs)
//! - Token builders for crafting valid, expired or forged tokens
//! - Server test harness (`TestPlannerServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use planner_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestPlannerServer::spawn().await?;
//!     server.register_user("Ada", "ada@example.com", "5550100", "secret").await?;
//!     let token = server.login("ada@example.com", "secret").await?;
//!
//!     let response = server
//!         .client()
//!         .get(format!("{}/auth/profile", server.url()))
//!         .bearer_auth(&token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod memory_store;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use fixtures::*;
pub use memory_store::*;
pub use server_harness::*;
pub use token_builders::*;
