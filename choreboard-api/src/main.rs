//! # ChoreBoard API Server
//!
//! Serves the ChoreBoard web application: registration and login,
//! households, and the shared chore dashboard.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (`.env` honoured)
//! 2. Create the database if missing, open the pool, run migrations
//! 3. Connect the session store (Redis, or in-memory when `REDIS_URL` is unset)
//! 4. Serve until Ctrl-C / SIGTERM, then drain and close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p choreboard-api
//! ```

use choreboard_api::{
    app::{build_router, AppState},
    config::Config,
    sweeper::{spawn_session_sweeper, DEFAULT_SWEEP_INTERVAL},
};
use choreboard_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    session::{MemorySessionStore, RedisConfig, RedisSessionStore, SessionStore},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; LOG_FORMAT=json switches to JSON lines
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "choreboard_api=debug,choreboard_shared=info,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(
        "ChoreBoard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.connect).await?;
    let pool = create_pool(DatabaseConfig {
        connect: config.database.connect.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let shutdown = CancellationToken::new();

    let store: Arc<dyn SessionStore> = match &config.session.redis_url {
        Some(url) => Arc::new(RedisSessionStore::connect(RedisConfig::new(url.clone())).await?),
        None => {
            tracing::warn!("REDIS_URL not set, sessions are kept in memory and lost on restart");
            let memory = Arc::new(MemorySessionStore::new());
            spawn_session_sweeper(memory.clone(), DEFAULT_SWEEP_INTERVAL, shutdown.clone());
            memory
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::from_config(pool.clone(), store, config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels `shutdown`
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
    shutdown.cancel();
}
