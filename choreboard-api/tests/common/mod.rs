//! Common test utilities for router tests
//!
//! - [`offline_app`] builds the full router over a lazily-connected pool
//!   and the in-memory session store, for routes that never reach the
//!   database
//! - [`TestContext`] connects to `DATABASE_URL` and tracks the users it
//!   creates so they can be removed afterwards; it is `None` when no
//!   database is configured

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use choreboard_api::{
    app::{build_router, AppState},
    config::Config,
    middleware::session::SESSION_COOKIE,
};
use choreboard_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{create_lazy_pool, create_pool, DatabaseConfig},
    },
    models::{household::Household, user::User},
    session::MemorySessionStore,
};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "router-test-session-secret-0123456789";

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Configuration with cheap password hashing and the given overrides
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("SESSION_SECRET", TEST_SECRET),
        ("DATABASE_URL", "postgresql://nobody@127.0.0.1:1/none"),
        ("PASSWORD_MEMORY_KIB", "1024"),
        ("PASSWORD_ITERATIONS", "1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Router whose pool points at a closed port
pub fn offline_app_with(config: Config) -> Router {
    let pool = create_lazy_pool(&DatabaseConfig {
        connect: config.database.connect.clone(),
        max_connections: 1,
        min_connections: 0,
        acquire_timeout_seconds: 1,
        idle_timeout_seconds: None,
    })
    .unwrap();

    let state = AppState::from_config(pool, Arc::new(MemorySessionStore::new()), config).unwrap();
    build_router(state)
}

pub fn offline_app() -> Router {
    offline_app_with(test_config(&[]))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = form
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Minimal form encoding for test values
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Asserts a 303 redirect and returns its target
pub fn redirect_target(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` pair of the session cookie set by a response
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{}=", SESSION_COOKIE)))
        .map(str::to_string)
}

/// Username unlikely to collide with parallel tests or earlier runs
pub fn unique_username(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);

    format!(
        "{}_{}_{}_{}",
        prefix,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed),
        nanos % 100_000
    )
}

/// Router over a real database
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    usernames: Mutex<Vec<String>>,
}

impl TestContext {
    /// Returns `None` when `DATABASE_URL` is unset
    pub async fn new() -> Option<Self> {
        let Some(url) = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()) else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };

        let db_config = DatabaseConfig {
            max_connections: 5,
            ..DatabaseConfig::from_url(&url).unwrap()
        };
        ensure_database_exists(&db_config.connect).await.unwrap();
        let db = create_pool(db_config).await.unwrap();
        run_migrations(&db).await.unwrap();

        let config = test_config(&[("DATABASE_URL", url.as_str())]);
        let state =
            AppState::from_config(db.clone(), Arc::new(MemorySessionStore::new()), config).unwrap();

        Some(Self {
            db,
            app: build_router(state),
            usernames: Mutex::new(Vec::new()),
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        send(&self.app, request).await
    }

    /// Posts the register form and tracks the username for cleanup
    pub async fn register(&self, username: &str, first_name: &str, password: &str) -> Response {
        self.usernames.lock().unwrap().push(username.to_string());

        let email = format!("{}@example.com", username);
        self.send(post_form(
            "/register",
            &[
                ("first_name", first_name),
                ("last_name", "Tester"),
                ("username", username),
                ("password", password),
                ("email", email.as_str()),
            ],
            None,
        ))
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.send(post_form(
            "/login",
            &[("username", username), ("password", password)],
            None,
        ))
        .await
    }

    /// Registers and logs in a fresh user; returns (username, cookie)
    pub async fn signed_in_user(&self, prefix: &str) -> (String, String) {
        let username = unique_username(prefix);
        let response = self.register(&username, "Test", "pa55word").await;
        assert_eq!(redirect_target(&response), "/login");

        let response = self.login(&username, "pa55word").await;
        assert_eq!(redirect_target(&response), "/pages/home");
        let cookie = session_cookie(&response).expect("login sets a session cookie");

        (username, cookie)
    }

    pub async fn household_of(&self, username: &str) -> Option<i32> {
        User::household_of(&self.db, username).await.unwrap().flatten()
    }

    /// Removes tracked users and their households
    pub async fn cleanup(&self) {
        let usernames = self.usernames.lock().unwrap().clone();
        for username in usernames {
            if let Some(household_id) = self.household_of(&username).await {
                let _ = Household::delete(&self.db, household_id).await;
            }
            let _ = User::delete(&self.db, &username).await;
        }
    }
}
