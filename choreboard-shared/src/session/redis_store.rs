/// Redis-backed session store
///
/// Sessions are stored as JSON strings under `{prefix}{session_id}` with
/// `SET ... EX ttl`, so Redis owns expiry and every app instance sees the
/// same sessions. The connection goes through `ConnectionManager`, which
/// reconnects on its own after a dropped connection.
///
/// # Example
///
/// ```no_run
/// use choreboard_shared::session::{RedisConfig, RedisSessionStore, SessionStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RedisSessionStore::connect(RedisConfig::new("redis://localhost:6379")).await?;
/// assert!(store.ping().await?);
/// # Ok(())
/// # }
/// ```

use super::{SessionRecord, SessionStore, SessionStoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

impl From<RedisError> for SessionStoreError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_timeout() {
            SessionStoreError::Connection(err.to_string())
        } else {
            SessionStoreError::Command(err.to_string())
        }
    }
}

/// Redis connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// `redis://[user:password@]host:port[/db]`
    pub url: String,

    /// Timeout for the initial connection
    pub connection_timeout_secs: u64,

    /// Timeout for each command
    pub command_timeout_secs: u64,

    /// Prepended to every session id
    pub key_prefix: String,
}

impl RedisConfig {
    /// Settings for `url` with default timeouts and the `session:` prefix
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection_timeout_secs: 5,
            command_timeout_secs: 2,
            key_prefix: "session:".to_string(),
        }
    }
}

/// [`SessionStore`] on top of Redis
#[derive(Clone)]
pub struct RedisSessionStore {
    manager: ConnectionManager,
    config: RedisConfig,
}

impl RedisSessionStore {
    /// Opens the connection manager.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL or when Redis does not answer within
    /// `connection_timeout_secs`.
    pub async fn connect(config: RedisConfig) -> Result<Self, SessionStoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| SessionStoreError::Connection(format!("Invalid Redis URL: {}", e)))?;

        let manager = tokio::time::timeout(
            Duration::from_secs(config.connection_timeout_secs),
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| SessionStoreError::Connection("Timed out connecting to Redis".to_string()))??;

        tracing::info!(url = %sanitize_url(&config.url), "Connected to Redis session store");

        Ok(Self { manager, config })
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{}", self.config.key_prefix, session_id)
    }

    async fn run<T: redis::FromRedisValue>(&self, cmd: redis::Cmd) -> Result<T, SessionStoreError> {
        let mut conn = self.manager.clone();

        tokio::time::timeout(
            Duration::from_secs(self.config.command_timeout_secs),
            cmd.query_async(&mut conn),
        )
        .await
        .map_err(|_| SessionStoreError::Connection("Redis command timed out".to_string()))?
        .map_err(SessionStoreError::from)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn insert(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let value =
            serde_json::to_string(record).map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;

        // Redis rejects EX 0
        let ttl_secs = ttl.as_secs().max(1);

        let mut cmd = redis::cmd("SET");
        cmd.arg(self.key(session_id)).arg(value).arg("EX").arg(ttl_secs);
        self.run::<()>(cmd).await
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(self.key(session_id));

        let value: Option<String> = self.run(cmd).await?;
        value
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| SessionStoreError::Corrupt(e.to_string()))
            })
            .transpose()
    }

    async fn remove(&self, session_id: &str) -> Result<(), SessionStoreError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(self.key(session_id));

        let _removed: i64 = self.run(cmd).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<bool, SessionStoreError> {
        let pong: String = self.run(redis::cmd("PING")).await?;
        Ok(pong == "PONG")
    }
}

/// Masks credentials in a Redis URL for logging
fn sanitize_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
