/// Session storage
///
/// A session maps an opaque id to the username it was issued for. The
/// store owns expiry: once the TTL passes the id simply stops resolving.
///
/// # Backends
///
/// - [`redis_store::RedisSessionStore`]: `SET session:{id} {json} EX {ttl}`;
///   Redis expires keys on its own.
/// - [`memory::MemorySessionStore`]: in-process map for development and
///   tests; expired entries are dropped on read and by
///   [`memory::MemorySessionStore::purge_expired`].
///
/// [`SessionManager`] ties a store to the cookie signer and TTL and is the
/// only thing the HTTP layer talks to.

pub mod manager;
pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use manager::SessionManager;
pub use memory::MemorySessionStore;
pub use redis_store::{RedisConfig, RedisSessionStore};

/// Session store errors
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// Backend unreachable or not configured correctly
    #[error("Session store connection error: {0}")]
    Connection(String),

    /// Backend rejected a command
    #[error("Session store command error: {0}")]
    Command(String),

    /// Stored value could not be decoded
    #[error("Corrupt session record: {0}")]
    Corrupt(String),
}

/// Value stored under a session id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// User the session was issued to
    pub username: String,

    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

/// Key → session mapping with store-managed expiry
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    /// Stores `record` under `session_id` for `ttl`
    async fn insert(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// Returns the record if the id exists and has not expired
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Deletes the id; deleting a missing id is not an error
    async fn remove(&self, session_id: &str) -> Result<(), SessionStoreError>;

    /// Returns true when the backend answers
    async fn ping(&self) -> Result<bool, SessionStoreError>;
}
