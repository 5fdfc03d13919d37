/// Chore and member queries, and the dashboard composition

use super::household::{session_state, HouseholdServiceError};
use crate::auth::context::{RequestContext, SessionState};
use crate::models::chore::{Chore, HouseholdChore};
use crate::models::user::{User, UserSummary};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum ChoreServiceError {
    /// The session no longer maps to a user row
    #[error("Session user no longer exists")]
    SignedOut,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<HouseholdServiceError> for ChoreServiceError {
    fn from(err: HouseholdServiceError) -> Self {
        match err {
            HouseholdServiceError::Database(e) => ChoreServiceError::Database(e),
            HouseholdServiceError::NotFound | HouseholdServiceError::UnknownUser(_) => {
                ChoreServiceError::SignedOut
            }
        }
    }
}

/// Data behind the home and chores pages
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub username: String,
    pub household_id: i32,
    pub chores: Vec<HouseholdChore>,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Clone)]
pub enum DashboardOutcome {
    /// Signed in but not in a household yet
    NeedsHousehold,
    Ready(Dashboard),
}

pub async fn household_chores(
    pool: &PgPool,
    household_id: i32,
) -> Result<Vec<HouseholdChore>, ChoreServiceError> {
    Ok(Chore::list_by_household(pool, household_id).await?)
}

pub async fn household_users(
    pool: &PgPool,
    household_id: i32,
) -> Result<Vec<UserSummary>, ChoreServiceError> {
    Ok(User::list_by_household(pool, household_id).await?)
}

/// Loads chores and members for the caller's household.
///
/// The household is re-read from the database rather than trusted from the
/// session. Both queries run concurrently; if either fails the whole
/// dashboard fails.
pub async fn dashboard(
    pool: &PgPool,
    context: &RequestContext,
) -> Result<DashboardOutcome, ChoreServiceError> {
    let household_id = match session_state(pool, Some(context)).await? {
        SessionState::Anonymous => return Err(ChoreServiceError::SignedOut),
        SessionState::NoHousehold { .. } => return Ok(DashboardOutcome::NeedsHousehold),
        SessionState::WithHousehold { household_id, .. } => household_id,
    };

    let (chores, users) = tokio::try_join!(
        household_chores(pool, household_id),
        household_users(pool, household_id),
    )?;

    tracing::debug!(
        username = %context.username,
        household_id,
        chores = chores.len(),
        members = users.len(),
        "Loaded dashboard"
    );

    Ok(DashboardOutcome::Ready(Dashboard {
        username: context.username.clone(),
        household_id,
        chores,
        users,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_household_errors_map_to_chore_errors() {
        let err: ChoreServiceError = HouseholdServiceError::UnknownUser("sam".to_string()).into();
        assert!(matches!(err, ChoreServiceError::SignedOut));

        let err: ChoreServiceError = HouseholdServiceError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ChoreServiceError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_dashboard_serializes_empty_lists() {
        let dashboard = Dashboard {
            username: "sam".to_string(),
            household_id: 7,
            chores: vec![],
            users: vec![],
        };

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["household_id"], 7);
        assert_eq!(json["chores"], serde_json::json!([]));
    }
}
