/// Dashboard routes
///
/// # Endpoints
///
/// - `GET /pages/home` - Home page with chores and members
/// - `GET /chores` - Chores page
/// - `GET /household/chore-data` - Chores of the caller's household (JSON)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, PageResult},
    middleware::session::CurrentSession,
    views,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use choreboard_shared::{
    auth::context::SessionState,
    models::chore::HouseholdChore,
    services::{
        chores::{self, ChoreServiceError, Dashboard, DashboardOutcome},
        household,
    },
};
use serde::Serialize;

/// Body of `/household/chore-data`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChoreDataResponse {
    /// Signed in without a household
    Redirect { redirect: String },
    Chores { chores: Vec<HouseholdChore> },
}

async fn render_dashboard(
    state: &AppState,
    session: CurrentSession,
    render: fn(&Dashboard) -> axum::response::Html<String>,
) -> PageResult<Response> {
    let CurrentSession(Some(ctx)) = session else {
        return Ok(Redirect::to("/login").into_response());
    };

    match chores::dashboard(&state.db, &ctx).await {
        Ok(DashboardOutcome::Ready(dashboard)) => Ok(render(&dashboard).into_response()),
        Ok(DashboardOutcome::NeedsHousehold) => Ok(Redirect::to("/join").into_response()),
        Err(ChoreServiceError::SignedOut) => Ok(Redirect::to("/login").into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Home page handler
pub async fn home(State(state): State<AppState>, session: CurrentSession) -> PageResult<Response> {
    render_dashboard(&state, session, views::home).await
}

/// Chores page handler
pub async fn chores(
    State(state): State<AppState>,
    session: CurrentSession,
) -> PageResult<Response> {
    render_dashboard(&state, session, views::chores).await
}

/// Chore data handler
///
/// 401 without a session, `{"redirect": "/join"}` without a household,
/// otherwise `{"chores": [...]}`.
pub async fn chore_data(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> ApiResult<Json<ChoreDataResponse>> {
    let Some(ctx) = ctx else {
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    };

    match household::session_state(&state.db, Some(&ctx)).await? {
        SessionState::Anonymous => Err(ApiError::Unauthorized("Unauthorized".to_string())),
        state_without @ SessionState::NoHousehold { .. } => Ok(Json(ChoreDataResponse::Redirect {
            redirect: state_without.landing_path().to_string(),
        })),
        SessionState::WithHousehold { household_id, .. } => {
            let chores = chores::household_chores(&state.db, household_id).await?;
            Ok(Json(ChoreDataResponse::Chores { chores }))
        }
    }
}
