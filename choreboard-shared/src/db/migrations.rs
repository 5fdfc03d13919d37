/// Schema migrations
///
/// The SQL files live in `migrations/` at the workspace root and are
/// embedded at compile time with `sqlx::migrate!`. They create the
/// `household`, `users` and `chores` tables with explicit foreign keys.
///
/// # Example
///
/// ```no_run
/// use choreboard_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use choreboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig::from_url(&std::env::var("DATABASE_URL")?)?;
/// ensure_database_exists(&config.connect).await?;
///
/// let pool = create_pool(config).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{
    postgres::{PgConnectOptions, PgConnection, PgPool},
    Connection, Executor,
};
use tracing::{debug, info, warn};

/// Applies every migration that has not run yet.
///
/// # Errors
///
/// Returns the first migration failure; sqlx rolls back the failing file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database named in `options` when it is missing.
///
/// The container setup ships an empty Postgres server, so the first boot
/// has to create the database before the pool can connect to it. The
/// check runs over a connection to the `postgres` maintenance database.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), sqlx::Error> {
    let database = options
        .get_database()
        .unwrap_or(options.get_username())
        .to_string();

    let mut conn = PgConnection::connect_with(&options.clone().database("postgres")).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&database)
            .fetch_one(&mut conn)
            .await?;

    if exists {
        debug!(database = %database, "Database already exists");
    } else {
        info!(database = %database, "Database does not exist, creating it");
        conn.execute(create_database_statement(&database).as_str()).await?;
        info!("Database created");
    }

    conn.close().await
}

fn create_database_statement(database: &str) -> String {
    format!("CREATE DATABASE \"{}\"", database.replace('"', "\"\""))
}
