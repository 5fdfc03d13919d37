//! # ChoreBoard Shared Library
//!
//! Data access, authentication primitives and business logic used by the
//! ChoreBoard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and queries
//! - `auth`: Password hashing, session tokens, request identity
//! - `session`: Session storage (Redis or in-memory)
//! - `services`: Registration, login, households, chores
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod session;

/// Current version of the ChoreBoard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
