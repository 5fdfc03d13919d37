/// Error handling for the API server
///
/// Two error types map service failures to responses:
///
/// - [`ApiError`] for JSON endpoints (`/household/...`)
/// - [`PageError`] for routes that answer with HTML
///
/// Internal failures are logged with their detail and answered with a
/// generic message.
///
/// # Example
///
/// ```
/// use choreboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(signed_in: bool) -> ApiResult<Json<serde_json::Value>> {
///     if !signed_in {
///         return Err(ApiError::Unauthorized("Unauthorized".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use crate::views;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use choreboard_shared::{
    auth::password::PasswordError,
    services::{
        auth::AuthServiceError, chores::ChoreServiceError, household::HouseholdServiceError,
    },
    session::SessionStoreError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown on the register page when a field is empty
pub const MISSING_FIELDS_MESSAGE: &str = "Name, Username, password, and email are required.";

/// Shown on the register page when the username is taken
pub const USERNAME_TAKEN_MESSAGE: &str = "Username already exists. Please choose another one.";

pub const HOUSEHOLD_NOT_FOUND_MESSAGE: &str = "Household ID not found.";

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Page result type alias
pub type PageResult<T> = Result<T, PageError>;

/// Errors returned by JSON endpoints
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

impl From<SessionStoreError> for ApiError {
    fn from(err: SessionStoreError) -> Self {
        ApiError::InternalError(format!("Session store error: {}", err))
    }
}

impl From<ChoreServiceError> for ApiError {
    fn from(err: ChoreServiceError) -> Self {
        match err {
            ChoreServiceError::SignedOut => ApiError::Unauthorized("Unauthorized".to_string()),
            ChoreServiceError::Database(e) => e.into(),
        }
    }
}

impl From<HouseholdServiceError> for ApiError {
    fn from(err: HouseholdServiceError) -> Self {
        match err {
            HouseholdServiceError::NotFound => {
                ApiError::NotFound(HOUSEHOLD_NOT_FOUND_MESSAGE.to_string())
            }
            HouseholdServiceError::UnknownUser(_) => {
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            HouseholdServiceError::Database(e) => e.into(),
        }
    }
}

/// Errors returned by HTML routes
#[derive(Debug)]
pub enum PageError {
    /// Register form re-rendered with a message (406)
    Registration(String),

    /// Not found (404), plain message
    NotFound(String),

    /// Internal server error (500)
    Internal(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Registration(msg) => write!(f, "Registration rejected: {}", msg),
            PageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PageError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PageError {}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Registration(msg) => {
                (StatusCode::NOT_ACCEPTABLE, views::register(Some(&msg))).into_response()
            }
            PageError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            PageError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error("Something went wrong", "Internal server error"),
                )
                    .into_response()
            }
        }
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        PageError::Internal(format!("Database error: {}", err))
    }
}

impl From<SessionStoreError> for PageError {
    fn from(err: SessionStoreError) -> Self {
        PageError::Internal(format!("Session store error: {}", err))
    }
}

impl From<PasswordError> for PageError {
    fn from(err: PasswordError) -> Self {
        PageError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<AuthServiceError> for PageError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Validation(_) => {
                PageError::Registration(MISSING_FIELDS_MESSAGE.to_string())
            }
            AuthServiceError::Conflict => {
                PageError::Registration(USERNAME_TAKEN_MESSAGE.to_string())
            }
            AuthServiceError::Database(e) => e.into(),
            AuthServiceError::Password(e) => e.into(),
            AuthServiceError::Session(e) => e.into(),
            // Login outcomes are handled by the login route
            other @ (AuthServiceError::NotFound | AuthServiceError::InvalidCredentials) => {
                PageError::Internal(format!("Unhandled login outcome: {}", other))
            }
        }
    }
}

impl From<HouseholdServiceError> for PageError {
    fn from(err: HouseholdServiceError) -> Self {
        match err {
            HouseholdServiceError::NotFound => {
                PageError::NotFound(HOUSEHOLD_NOT_FOUND_MESSAGE.to_string())
            }
            HouseholdServiceError::UnknownUser(username) => {
                PageError::Internal(format!("Session user {} has no row", username))
            }
            HouseholdServiceError::Database(e) => e.into(),
        }
    }
}

impl From<ChoreServiceError> for PageError {
    fn from(err: ChoreServiceError) -> Self {
        PageError::Internal(err.to_string())
    }
}
