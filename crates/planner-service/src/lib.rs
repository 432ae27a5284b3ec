//! Learning Planner service library.
//!
//! A JSON HTTP backend for accounts, topics and learning plans, with an
//! access-guarded API and a thin wrapper over an OpenAI-compatible
//! completion endpoint.

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
