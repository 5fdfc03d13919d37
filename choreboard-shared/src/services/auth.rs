/// Registration, login and logout

use crate::auth::context::RequestContext;
use crate::auth::password::{PasswordError, PasswordHasher};
use crate::models::user::{CreateUser, User};
use crate::session::{SessionManager, SessionStoreError};
use serde::Deserialize;
use sqlx::PgPool;

/// Auth service errors
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// One or more registration fields were empty
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("Username already exists")]
    Conflict,

    /// Login for a username that was never registered
    #[error("User not found")]
    NotFound,

    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

/// Registration form fields. Missing fields deserialize as empty strings so
/// they fail validation instead of body parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegisterInput {
    /// Names of the fields that are empty. Whitespace-only counts as empty
    /// for everything except the password.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("first_name", self.first_name.trim()),
            ("last_name", self.last_name.trim()),
            ("username", self.username.trim()),
            ("password", self.password.as_str()),
            ("email", self.email.trim()),
        ];

        fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect()
    }
}

async fn hash_blocking(hasher: &PasswordHasher, password: String) -> Result<String, PasswordError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| PasswordError::HashError(e.to_string()))?
}

async fn verify_blocking(
    hasher: &PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool, PasswordError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(e.to_string()))?
}

/// Creates an account.
///
/// # Errors
///
/// - `Validation` when any field is empty (checked before touching the
///   database)
/// - `Conflict` when the username is taken, including a concurrent
///   registration that wins the insert race
pub async fn register(
    pool: &PgPool,
    hasher: &PasswordHasher,
    input: RegisterInput,
) -> Result<User, AuthServiceError> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(AuthServiceError::Validation(missing));
    }

    let username = input.username.trim().to_string();

    if User::exists(pool, &username).await? {
        tracing::info!(username = %username, "Registration rejected: username taken");
        return Err(AuthServiceError::Conflict);
    }

    let password_hash = hash_blocking(hasher, input.password).await?;

    let created = User::create(
        pool,
        CreateUser {
            username: username.clone(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash,
        },
    )
    .await;

    match created {
        Ok(user) => {
            tracing::info!(username = %user.username, "Registered user");
            Ok(user)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::info!(username = %username, "Registration lost insert race");
            Err(AuthServiceError::Conflict)
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks credentials and returns the user on success.
///
/// The caller is responsible for starting the session.
pub async fn login(
    pool: &PgPool,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<User, AuthServiceError> {
    let user = User::find_by_username(pool, username.trim())
        .await?
        .ok_or(AuthServiceError::NotFound)?;

    let valid = verify_blocking(hasher, password.to_string(), user.password_hash.clone()).await?;
    if !valid {
        tracing::warn!(username = %user.username, "Login rejected: incorrect password");
        return Err(AuthServiceError::InvalidCredentials);
    }

    tracing::info!(username = %user.username, "User logged in");
    Ok(user)
}

/// Ends the caller's session. Anonymous callers are a no-op.
pub async fn logout(
    sessions: &SessionManager,
    context: Option<&RequestContext>,
) -> Result<(), AuthServiceError> {
    if let Some(ctx) = context {
        sessions.end(ctx).await?;
        tracing::info!(username = %ctx.username, "User logged out");
    }
    Ok(())
}
