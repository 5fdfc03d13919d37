/// Page renders that need little or no data

use crate::{
    app::AppState,
    error::PageResult,
    middleware::session::CurrentSession,
    views,
};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Json,
};
use choreboard_shared::{models::user::User, services::household};
use serde_json::{json, Value};

/// `GET /`
pub async fn root() -> Redirect {
    Redirect::to("/register")
}

/// `GET /login`
pub async fn login_page() -> Html<String> {
    views::login(None)
}

/// `GET /register`
pub async fn register_page() -> Html<String> {
    views::register(None)
}

/// `GET /join`
pub async fn join_page(CurrentSession(ctx): CurrentSession) -> Html<String> {
    views::join(ctx.is_some())
}

/// `GET /house`
///
/// Shows the caller's household and its shareable id when signed in.
pub async fn house_page(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> PageResult<Html<String>> {
    let session = household::session_state(&state.db, ctx.as_ref()).await?;

    let current = match session.household_id() {
        Some(id) => household::find_household(&state.db, id).await?,
        None => None,
    };

    Ok(views::house(session.is_signed_in(), current.as_ref()))
}

/// `GET /account`
pub async fn account_page(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> PageResult<Html<String>> {
    let Some(ctx) = ctx else {
        return Ok(views::account(None, None));
    };

    let user = User::find_by_username(&state.db, &ctx.username).await?;
    let current = match user.as_ref().and_then(|u| u.household_id) {
        Some(id) => household::find_household(&state.db, id).await?,
        None => None,
    };

    Ok(views::account(user.as_ref(), current.as_ref()))
}

/// `GET /welcome`
pub async fn welcome() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Welcome!"
    }))
}
