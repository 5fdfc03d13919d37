/// Household creation and membership
///
/// Identity always comes from the [`RequestContext`]; a request body can
/// name a household to join but never the user being changed.

use crate::auth::context::{RequestContext, SessionState};
use crate::models::household::Household;
use crate::models::user::User;
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum HouseholdServiceError {
    #[error("Household ID not found.")]
    NotFound,

    /// The session names a user whose row no longer exists
    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Creates `"{username}'s Household"` and moves the caller into it.
///
/// Returns the new household. Any previous household membership is
/// replaced.
pub async fn create_household(
    pool: &PgPool,
    context: &RequestContext,
) -> Result<Household, HouseholdServiceError> {
    if !User::exists(pool, &context.username).await? {
        return Err(HouseholdServiceError::UnknownUser(context.username.clone()));
    }

    let household = Household::create(pool, &Household::default_name_for(&context.username)).await?;

    if !User::set_household(pool, &context.username, household.household_id).await? {
        return Err(HouseholdServiceError::UnknownUser(context.username.clone()));
    }

    tracing::info!(
        username = %context.username,
        household_id = household.household_id,
        "Created household"
    );

    Ok(household)
}

/// Moves the caller into an existing household.
///
/// # Errors
///
/// `NotFound` when no household has `household_id`; the user row is left
/// untouched in that case.
pub async fn join_household(
    pool: &PgPool,
    context: &RequestContext,
    household_id: i32,
) -> Result<Household, HouseholdServiceError> {
    let household = Household::find_by_id(pool, household_id)
        .await?
        .ok_or(HouseholdServiceError::NotFound)?;

    if !User::set_household(pool, &context.username, household.household_id).await? {
        return Err(HouseholdServiceError::UnknownUser(context.username.clone()));
    }

    tracing::info!(
        username = %context.username,
        household_id = household.household_id,
        "Joined household"
    );

    Ok(household)
}

pub async fn find_household(
    pool: &PgPool,
    household_id: i32,
) -> Result<Option<Household>, HouseholdServiceError> {
    Ok(Household::find_by_id(pool, household_id).await?)
}

/// Reads the caller's current household from the database and classifies
/// the session.
///
/// A session whose user row has been deleted counts as anonymous.
pub async fn session_state(
    pool: &PgPool,
    context: Option<&RequestContext>,
) -> Result<SessionState, HouseholdServiceError> {
    let Some(ctx) = context else {
        return Ok(SessionState::Anonymous);
    };

    match User::household_of(pool, &ctx.username).await? {
        Some(household_id) => Ok(SessionState::from_parts(Some(ctx), household_id)),
        None => {
            tracing::warn!(username = %ctx.username, "Session refers to a missing user");
            Ok(SessionState::Anonymous)
        }
    }
}
