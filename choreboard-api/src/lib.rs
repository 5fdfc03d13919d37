//! # ChoreBoard API Server Library
//!
//! Router, handlers and HTTP plumbing for the ChoreBoard web application.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session resolution and security headers
//! - `routes`: Route handlers
//! - `views`: HTML pages
//! - `sweeper`: Background expiry for in-memory sessions

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod sweeper;
pub mod views;
