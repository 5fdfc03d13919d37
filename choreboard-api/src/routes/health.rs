/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "sessions": "redis"
/// }
/// ```
///
/// `status` is `degraded` when either the database or the session store
/// does not answer; the endpoint itself always returns 200.

use crate::app::AppState;
use axum::{extract::State, Json};
use choreboard_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,

    /// Session backend name, or `unavailable`
    pub sessions: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let sessions_ok = match state.sessions.ping().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Session store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if database_ok && sessions_ok {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "connected" } else { "disconnected" }.to_string(),
        sessions: if sessions_ok {
            state.sessions.backend().to_string()
        } else {
            "unavailable".to_string()
        },
    })
}
