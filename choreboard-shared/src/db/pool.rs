/// PostgreSQL connection pool
///
/// Every model and service in ChoreBoard borrows a `PgPool` built here.
/// The pool verifies connectivity on startup so a misconfigured database
/// fails the boot instead of the first request.
///
/// # Example
///
/// ```no_run
/// use choreboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_url("postgresql://choreboard:choreboard@db:5432/choreboard")?;
///
///     let pool = create_pool(config).await?;
///     let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
///     assert_eq!(one, 1);
///     Ok(())
/// }
/// ```

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pool settings. Timeouts are in seconds so they map directly onto
/// environment variables.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Host, port, credentials and database name
    pub connect: PgConnectOptions,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// Connections kept warm while idle
    pub min_connections: u32,

    /// How long a request waits for a free connection
    pub acquire_timeout_seconds: u64,

    /// Idle connections older than this are closed (None = never)
    pub idle_timeout_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connect: PgConnectOptions::new_without_pgpass(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("connect", &describe_target(&self.connect))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .finish()
    }
}

/// `user@host:port/database`, never the password
pub fn describe_target(options: &PgConnectOptions) -> String {
    format!(
        "{}@{}:{}/{}",
        options.get_username(),
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or(options.get_username())
    )
}

impl DatabaseConfig {
    /// Default pool settings for the database at `url`
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Configuration` when the URL does not parse.
    pub fn from_url(url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            connect: url.parse()?,
            ..Default::default()
        })
    }

    fn pool_options(&self) -> PgPoolOptions {
        let mut options = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_seconds));

        if let Some(idle_timeout) = self.idle_timeout_seconds {
            options = options.idle_timeout(Duration::from_secs(idle_timeout));
            debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
        }

        options
    }
}

/// Creates the pool and runs a health check against it.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable, or
/// the health check query fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        target = %describe_target(&config.connect),
        "Creating database connection pool"
    );

    let pool = config.pool_options().connect_with(config.connect.clone()).await?;
    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Creates a pool that connects on first use.
///
/// Used by router tests that never reach the database, and by tooling that
/// must construct application state before the database is up.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    Ok(config.pool_options().connect_lazy_with(config.connect.clone()))
}

/// Runs `SELECT 1` to confirm the database answers.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let (value,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if value == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", value);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Closes every connection; call during shutdown.
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
