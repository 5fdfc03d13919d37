/// User model and database operations
///
/// A user is identified by their username, which is also the login name.
/// Each user belongs to at most one household at a time.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     username VARCHAR(50) PRIMARY KEY,
///     first_name VARCHAR(50) NOT NULL,
///     last_name VARCHAR(50) NOT NULL,
///     email VARCHAR(200) NOT NULL,
///     password VARCHAR(255) NOT NULL,
///     household_id INTEGER REFERENCES household (household_id) ON DELETE SET NULL,
///     profile_image VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use choreboard_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     username: "sam".to_string(),
///     first_name: "Sam".to_string(),
///     last_name: "Rivera".to_string(),
///     email: "sam@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_username(&pool, "sam").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique login name
    pub username: String,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    /// Argon2id PHC string, stored in the `password` column
    #[sqlx(rename = "password")]
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Household the user belongs to, if they have joined one
    pub household_id: Option<i32>,

    /// Path or URL of the avatar shown next to the user's chores
    pub profile_image: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown on pages ("First Last")
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Member listing returned by the household users endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
}

/// Input for creating a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

const USER_COLUMNS: &str = "username, first_name, last_name, email, password, \
                            household_id, profile_image, created_at";

impl User {
    /// Inserts a new user with no household.
    ///
    /// # Errors
    ///
    /// A duplicate username surfaces as a unique-violation database error
    /// on the `users_pkey` constraint.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (username, first_name, last_name, email, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.email)
            .bind(data.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1 LIMIT 1");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Returns true when the username is already taken
    pub async fn exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// Reads the user's current household.
    ///
    /// Returns `None` when the user does not exist, `Some(None)` when the
    /// user has not joined a household yet.
    pub async fn household_of(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Option<i32>>, sqlx::Error> {
        sqlx::query_scalar("SELECT household_id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Points the user at a household. Returns false if the user is unknown.
    pub async fn set_household(
        pool: &PgPool,
        username: &str,
        household_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET household_id = $1 WHERE username = $2")
            .bind(household_id)
            .bind(username)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the members of a household, ordered by username
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: i32,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT username, first_name, last_name, profile_image
            FROM users
            WHERE household_id = $1
            ORDER BY username
            "#,
        )
        .bind(household_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes a user; their chores go with them (FK cascade).
    pub async fn delete(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
