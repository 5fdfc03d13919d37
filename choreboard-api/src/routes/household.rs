/// Household routes
///
/// # Endpoints
///
/// - `POST /create-household` - Create a household for the caller
/// - `POST /join-household` - Join by household id
/// - `GET /household/:household_id/users` - Members of a household (JSON)
///
/// The user being changed is always the session user; the form only
/// carries the household id.

use crate::{
    app::AppState,
    error::{ApiResult, PageError, PageResult, HOUSEHOLD_NOT_FOUND_MESSAGE},
    middleware::session::CurrentSession,
};
use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use choreboard_shared::{
    models::user::UserSummary,
    services::{chores, household, household::HouseholdServiceError},
};
use serde::Deserialize;

/// Join form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JoinHouseholdForm {
    /// Kept as text so a malformed id answers 404 like an unknown one
    pub household_id: String,
}

impl JoinHouseholdForm {
    pub fn parsed_id(&self) -> Option<i32> {
        self.household_id.trim().parse().ok()
    }
}

/// Create household handler
pub async fn create_household(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> PageResult<Redirect> {
    let Some(ctx) = ctx else {
        return Ok(Redirect::to("/login"));
    };

    match household::create_household(&state.db, &ctx).await {
        Ok(_) => Ok(Redirect::to("/pages/home")),
        Err(HouseholdServiceError::UnknownUser(_)) => Ok(Redirect::to("/login")),
        Err(e) => Err(e.into()),
    }
}

/// Join household handler
pub async fn join_household(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Form(form): Form<JoinHouseholdForm>,
) -> PageResult<Redirect> {
    let Some(ctx) = ctx else {
        return Ok(Redirect::to("/login"));
    };

    let Some(household_id) = form.parsed_id() else {
        return Err(PageError::NotFound(HOUSEHOLD_NOT_FOUND_MESSAGE.to_string()));
    };

    match household::join_household(&state.db, &ctx, household_id).await {
        Ok(_) => Ok(Redirect::to("/pages/home")),
        Err(HouseholdServiceError::UnknownUser(_)) => Ok(Redirect::to("/login")),
        Err(e) => Err(e.into()),
    }
}

/// Household members handler
///
/// Public: anyone holding a household id can list its members.
pub async fn household_users(
    State(state): State<AppState>,
    Path(household_id): Path<i32>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = chores::household_users(&state.db, household_id).await?;
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_id() {
        let form = |id: &str| JoinHouseholdForm {
            household_id: id.to_string(),
        };

        assert_eq!(form("42").parsed_id(), Some(42));
        assert_eq!(form(" 7 ").parsed_id(), Some(7));
        assert_eq!(form("").parsed_id(), None);
        assert_eq!(form("abc").parsed_id(), None);
        assert_eq!(form("99999999999").parsed_id(), None);
    }
}
