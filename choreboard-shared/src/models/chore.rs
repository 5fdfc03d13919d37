/// Chore model and household chore queries
///
/// The application only reads chores. [`Chore::create`] is a data-layer
/// insert used to seed fixtures; there is no HTTP endpoint that writes
/// chores.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE chores (
///     chore_id SERIAL PRIMARY KEY,
///     chore_name VARCHAR(120) NOT NULL,
///     chore_description TEXT,
///     completion_status BOOLEAN NOT NULL DEFAULT FALSE,
///     due_date DATE,
///     username VARCHAR(50) NOT NULL REFERENCES users (username) ON DELETE CASCADE,
///     household_id INTEGER NOT NULL REFERENCES household (household_id) ON DELETE CASCADE
/// );
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A chore row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chore {
    pub chore_id: i32,
    pub chore_name: String,
    pub chore_description: Option<String>,
    pub completion_status: bool,
    pub due_date: Option<NaiveDate>,
    /// Assignee
    pub username: String,
    pub household_id: i32,
}

/// A chore joined with its assignee and household name, as shown on the
/// dashboard and returned by `/household/chore-data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HouseholdChore {
    pub chore_id: i32,
    pub chore_name: String,
    pub chore_description: Option<String>,
    pub completion_status: bool,
    pub due_date: Option<NaiveDate>,
    pub username: String,
    pub household_name: String,
}

/// Input for seeding a chore
#[derive(Debug, Clone)]
pub struct CreateChore {
    pub chore_name: String,
    pub chore_description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub username: String,
    pub household_id: i32,
}

impl Chore {
    pub async fn create(pool: &PgPool, data: CreateChore) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Chore>(
            r#"
            INSERT INTO chores (chore_name, chore_description, due_date, username, household_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING chore_id, chore_name, chore_description, completion_status,
                      due_date, username, household_id
            "#,
        )
        .bind(data.chore_name)
        .bind(data.chore_description)
        .bind(data.due_date)
        .bind(data.username)
        .bind(data.household_id)
        .fetch_one(pool)
        .await
    }

    /// All chores of a household with assignee and household name.
    ///
    /// Inner joins drop chores whose assignee or household row is missing.
    /// Undated chores sort last.
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: i32,
    ) -> Result<Vec<HouseholdChore>, sqlx::Error> {
        sqlx::query_as::<_, HouseholdChore>(
            r#"
            SELECT
                c.chore_id,
                c.chore_name,
                c.chore_description,
                c.completion_status,
                c.due_date,
                u.username,
                h.household_name
            FROM chores c
            JOIN users u ON c.username = u.username
            JOIN household h ON c.household_id = h.household_id
            WHERE c.household_id = $1
            ORDER BY c.due_date ASC NULLS LAST, c.chore_id ASC
            "#,
        )
        .bind(household_id)
        .fetch_all(pool)
        .await
    }
}
