/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use choreboard_api::{app::{build_router, AppState}, config::Config};
/// use choreboard_shared::session::MemorySessionStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect_with(config.database.connect.clone()).await?;
/// let state = AppState::from_config(pool, Arc::new(MemorySessionStore::new()), config)?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::resolve_session},
    routes,
};
use axum::{
    routing::{get, post},
    Router,
};
use choreboard_shared::{
    auth::{
        password::{PasswordError, PasswordHasher},
        token::CookieSigner,
    },
    session::{SessionManager, SessionStore},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every
/// field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    pub sessions: SessionManager,

    pub passwords: PasswordHasher,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        sessions: SessionManager,
        passwords: PasswordHasher,
        config: Config,
    ) -> Self {
        Self {
            db,
            sessions,
            passwords,
            config: Arc::new(config),
        }
    }

    /// Wires the session manager and password hasher from `config`
    ///
    /// # Errors
    ///
    /// Fails when the configured Argon2 cost is rejected.
    pub fn from_config(
        db: PgPool,
        store: Arc<dyn SessionStore>,
        config: Config,
    ) -> Result<Self, PasswordError> {
        let sessions = SessionManager::new(
            store,
            CookieSigner::new(&config.session.secret),
            config.session.ttl(),
        );
        let passwords = PasswordHasher::new(config.password)?;

        Ok(Self::new(db, sessions, passwords, config))
    }

    /// Whether cookies get the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /                              -> redirect /register
/// ├── GET  /login, POST /login
/// ├── GET  /register, POST /register
/// ├── GET  /logout
/// ├── GET  /pages/home                    # dashboard (session + household)
/// ├── GET  /chores                        # chores page (session + household)
/// ├── GET  /household/chore-data          # JSON, 401 without session
/// ├── GET  /household/:household_id/users # JSON
/// ├── POST /create-household
/// ├── POST /join-household
/// ├── GET  /join, /house, /account
/// ├── GET  /welcome
/// ├── GET  /health
/// └── GET  /resources/*                   # static files
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. Compression
/// 3. Request tracing (tower-http TraceLayer)
/// 4. Session resolution
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(routes::pages::root))
        .route("/login", get(routes::pages::login_page).post(routes::auth::login))
        .route(
            "/register",
            get(routes::pages::register_page).post(routes::auth::register),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/pages/home", get(routes::dashboard::home))
        .route("/chores", get(routes::dashboard::chores))
        .route("/join", get(routes::pages::join_page))
        .route("/house", get(routes::pages::house_page))
        .route("/account", get(routes::pages::account_page));

    let household_routes = Router::new()
        .route("/household/chore-data", get(routes::dashboard::chore_data))
        .route(
            "/household/:household_id/users",
            get(routes::household::household_users),
        )
        .route("/create-household", post(routes::household::create_household))
        .route("/join-household", post(routes::household::join_household));

    let public_routes = Router::new()
        .route("/welcome", get(routes::pages::welcome))
        .route("/health", get(routes::health::health_check));

    Router::new()
        .merge(page_routes)
        .merge(household_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ))
        .merge(public_routes)
        .nest_service("/resources", ServeDir::new(&state.config.api.static_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
