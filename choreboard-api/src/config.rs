/// Configuration management for the API server
///
/// Configuration is read from environment variables; a `.env` file in the
/// working directory is loaded first when present.
///
/// # Environment Variables
///
/// - `PORT`: Port to bind to (default: 3000)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `APP_ENV`: `production` turns on `Secure` cookies and HSTS
/// - `DATABASE_URL`: PostgreSQL connection string. When unset the connection is
///   configured field by field from `POSTGRES_HOST` (db), `POSTGRES_PORT` (5432),
///   `POSTGRES_USER` (postgres), `POSTGRES_PASSWORD` and `POSTGRES_DB`
///   (defaults to the user name)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_SECRET`: Cookie signing secret, at least 32 characters (required)
/// - `SESSION_TTL_HOURS`: Session lifetime, 1 to 8760 (default: 24)
/// - `REDIS_URL`: Session store; sessions are kept in memory when unset
/// - `PASSWORD_MEMORY_KIB`, `PASSWORD_ITERATIONS`, `PASSWORD_PARALLELISM`:
///   Argon2id cost (default: 19456 / 2 / 1)
/// - `STATIC_DIR`: Directory served under `/resources` (default: resources)
/// - `RUST_LOG`: Log filter
/// - `LOG_FORMAT`: `json` for JSON log lines (read at startup, before `.env`)
///
/// # Example
///
/// ```no_run
/// use choreboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context as _;
use choreboard_shared::{auth::password::PasswordConfig, db::pool::describe_target};
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Minimum length of `SESSION_SECRET`
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Longest accepted `SESSION_TTL_HOURS` (one year)
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseSettings,

    pub session: SessionConfig,

    /// Argon2id cost used for new password hashes
    pub password: PasswordConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Running behind HTTPS in production
    pub production: bool,

    /// Directory served under `/resources`
    pub static_dir: String,
}

#[derive(Clone)]
pub struct DatabaseSettings {
    /// Where and as whom to connect
    pub connect: PgConnectOptions,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("connect", &describe_target(&self.connect))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Session configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC key for session cookies
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub ttl_hours: u64,

    /// Redis connection URL; `None` selects the in-memory store
    pub redis_url: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"***")
            .field("ttl_hours", &self.ttl_hours)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "***"))
            .finish()
    }
}

impl SessionConfig {
    /// `ttl_hours` is bounded by [`MAX_SESSION_TTL_HOURS`] at load time
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(60 * 60))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `SESSION_SECRET` is missing or shorter than 32 characters
    /// - A numeric variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let production = lookup("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "resources".to_string());

        let connect = match lookup("DATABASE_URL") {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid PostgreSQL URL")?,
            None => {
                let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "db".to_string());
                let port = parse_or(&lookup, "POSTGRES_PORT", 5432u16)?;
                let user = lookup("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string());
                let database = lookup("POSTGRES_DB").unwrap_or_else(|| user.clone());

                // Fields are set one by one so no character needs escaping
                let options = PgConnectOptions::new_without_pgpass()
                    .host(&host)
                    .port(port)
                    .username(&user)
                    .database(&database);

                match lookup("POSTGRES_PASSWORD") {
                    Some(password) => options.password(&password),
                    None => options,
                }
            }
        };
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let secret = lookup("SESSION_SECRET")
            .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        if secret.len() < MIN_SESSION_SECRET_LEN {
            anyhow::bail!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LEN
            );
        }

        let ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", 24u64)?;
        if ttl_hours == 0 || ttl_hours > MAX_SESSION_TTL_HOURS {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_or(&lookup, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
                static_dir,
            },
            database: DatabaseSettings {
                connect,
                max_connections,
            },
            session: SessionConfig {
                secret,
                ttl_hours,
                redis_url: lookup("REDIS_URL"),
            },
            password,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-session-secret-at-least-32-bytes";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SESSION_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(!config.api.production);
        assert_eq!(config.api.static_dir, "resources");
        assert_eq!(config.database.connect.get_host(), "db");
        assert_eq!(config.database.connect.get_port(), 5432);
        assert_eq!(config.database.connect.get_username(), "postgres");
        assert_eq!(config.database.connect.get_database(), Some("postgres"));
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.session.ttl(), Duration::from_secs(24 * 3600));
        assert_eq!(config.session.redis_url, None);
        assert_eq!(config.password, PasswordConfig::default());
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = load(&[
            ("SESSION_SECRET", SECRET),
            ("POSTGRES_HOST", "localhost"),
            ("POSTGRES_USER", "chores"),
            ("POSTGRES_PASSWORD", "hunter2"),
            ("POSTGRES_DB", "chores_db"),
        ])
        .unwrap();

        assert_eq!(
            describe_target(&config.database.connect),
            "chores@localhost:5432/chores_db"
        );
    }

    #[test]
    fn test_database_password_with_url_delimiters() {
        let config = load(&[
            ("SESSION_SECRET", SECRET),
            ("POSTGRES_USER", "chores"),
            ("POSTGRES_PASSWORD", "p@ss/w#rd:1?"),
            ("POSTGRES_DB", "chores"),
        ])
        .unwrap();

        let connect = &config.database.connect;
        assert_eq!(connect.get_host(), "db");
        assert_eq!(connect.get_port(), 5432);
        assert_eq!(connect.get_username(), "chores");
        assert_eq!(connect.get_database(), Some("chores"));
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = load(&[
            ("SESSION_SECRET", SECRET),
            ("DATABASE_URL", "postgresql://app@pg/app"),
            ("POSTGRES_HOST", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.database.connect.get_host(), "pg");
        assert_eq!(config.database.connect.get_database(), Some("app"));
    }

    #[test]
    fn test_invalid_database_url_rejected() {
        let err = load(&[("SESSION_SECRET", SECRET), ("DATABASE_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_session_secret_required_and_long_enough() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));

        let err = load(&[("SESSION_SECRET", "short")]).unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_production_and_overrides() {
        let config = load(&[
            ("SESSION_SECRET", SECRET),
            ("APP_ENV", "Production"),
            ("PORT", "8080"),
            ("SESSION_TTL_HOURS", "2"),
            ("REDIS_URL", "redis://cache:6379"),
            ("PASSWORD_MEMORY_KIB", "65536"),
            ("PASSWORD_ITERATIONS", "3"),
        ])
        .unwrap();

        assert!(config.api.production);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.session.ttl(), Duration::from_secs(7200));
        assert_eq!(config.session.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.password.memory_kib, 65536);
        assert_eq!(config.password.iterations, 3);
        assert_eq!(config.password.parallelism, 1);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = load(&[("SESSION_SECRET", SECRET), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = load(&[("SESSION_SECRET", SECRET), ("SESSION_TTL_HOURS", "0")]).unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_HOURS"));
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        let err = load(&[
            ("SESSION_SECRET", SECRET),
            ("SESSION_TTL_HOURS", "18446744073709551"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("between 1 and 8760"));

        let config = load(&[
            ("SESSION_SECRET", SECRET),
            ("SESSION_TTL_HOURS", "8760"),
        ])
        .unwrap();
        assert_eq!(config.session.ttl(), Duration::from_secs(8760 * 3600));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[
            ("SESSION_SECRET", SECRET),
            ("REDIS_URL", "redis://:pw@cache:6379"),
            ("DATABASE_URL", "postgresql://app:db-hunter2@pg:5432/app"),
        ])
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(!debug.contains(":pw@"));
        assert!(!debug.contains("db-hunter2"));
        assert!(debug.contains("app@pg:5432/app"));
    }
}
