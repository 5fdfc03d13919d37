/// Household model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE household (
///     household_id SERIAL PRIMARY KEY,
///     household_name VARCHAR(120) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Households are never renamed or removed by the application; the delete
/// helper exists for test cleanup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A group of users sharing one chore list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Household {
    /// Generated identifier users share to invite others
    pub household_id: i32,

    pub household_name: String,

    pub created_at: DateTime<Utc>,
}

impl Household {
    /// Name given to a household created by `username`
    pub fn default_name_for(username: &str) -> String {
        format!("{}'s Household", username)
    }

    /// Inserts a household and returns it with its generated id
    pub async fn create(pool: &PgPool, household_name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Household>(
            r#"
            INSERT INTO household (household_name)
            VALUES ($1)
            RETURNING household_id, household_name, created_at
            "#,
        )
        .bind(household_name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, household_id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Household>(
            r#"
            SELECT household_id, household_name, created_at
            FROM household
            WHERE household_id = $1
            "#,
        )
        .bind(household_id)
        .fetch_optional(pool)
        .await
    }

    /// Removes a household. Members keep their rows with `household_id`
    /// reset to NULL; the household's chores are deleted.
    pub async fn delete(pool: &PgPool, household_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM household WHERE household_id = $1")
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
