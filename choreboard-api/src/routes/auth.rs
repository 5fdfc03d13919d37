/// Authentication routes
///
/// # Endpoints
///
/// - `POST /register` - Create an account, then redirect to `/login`
/// - `POST /login` - Start a session, then redirect to `/pages/home`
/// - `GET /logout` - End the session

use crate::{
    app::AppState,
    error::{PageError, PageResult},
    middleware::session::{clear_session_cookie, session_cookie, CurrentSession},
    views,
};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use choreboard_shared::services::auth::{self, AuthServiceError, RegisterInput};
use serde::Deserialize;
use validator::Validate;

/// Register form
///
/// Emptiness is checked by the auth service; lengths here match the
/// column sizes.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: String,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: String,

    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub username: String,

    pub password: String,

    #[validate(length(max = 200, message = "Email must be at most 200 characters"))]
    pub email: String,
}

impl From<RegisterForm> for RegisterInput {
    fn from(form: RegisterForm) -> Self {
        RegisterInput {
            first_name: form.first_name,
            last_name: form.last_name,
            username: form.username,
            password: form.password,
            email: form.email,
        }
    }
}

/// Login form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                (
                    field.to_string(),
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                )
            })
        })
        .collect();

    // field_errors() is a map; sort so the reported field is stable
    messages.sort();
    messages
        .into_iter()
        .next()
        .map(|(_, message)| message)
        .unwrap_or_else(|| "Invalid registration".to_string())
}

/// Register handler
///
/// Missing fields and a taken username both re-render the form with 406.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> PageResult<Redirect> {
    if let Err(errors) = form.validate() {
        return Err(PageError::Registration(first_validation_message(&errors)));
    }

    auth::register(&state.db, &state.passwords, form.into()).await?;

    Ok(Redirect::to("/login"))
}

/// Login handler
///
/// - unknown username: redirect to `/register`
/// - wrong password: login page with "Incorrect password"
/// - success: replaces any current session and redirects to `/pages/home`
pub async fn login(
    State(state): State<AppState>,
    CurrentSession(current): CurrentSession,
    Form(form): Form<LoginForm>,
) -> PageResult<Response> {
    let user = match auth::login(&state.db, &state.passwords, &form.username, &form.password).await
    {
        Ok(user) => user,
        Err(AuthServiceError::NotFound) => {
            tracing::info!(username = %form.username, "Login for unknown user");
            return Ok(Redirect::to("/register").into_response());
        }
        Err(AuthServiceError::InvalidCredentials) => {
            return Ok(views::login(Some("Incorrect password")).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(previous) = current {
        state.sessions.end(&previous).await?;
    }

    let issued = state.sessions.start(&user.username).await?;
    let cookie = session_cookie(
        &issued.cookie_value,
        state.sessions.ttl(),
        state.secure_cookies(),
    );

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/pages/home")).into_response())
}

/// Logout handler
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> PageResult<Response> {
    auth::logout(&state.sessions, ctx.as_ref()).await?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies()))],
        views::logout(),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_length_limits() {
        let form = RegisterForm {
            username: "u".repeat(51),
            ..Default::default()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Username must be at most 50 characters"
        );
    }

    #[test]
    fn test_empty_form_passes_length_checks() {
        // Emptiness is reported by the auth service
        assert!(RegisterForm::default().validate().is_ok());
    }

    #[test]
    fn test_form_into_input_keeps_fields() {
        let input: RegisterInput = RegisterForm {
            first_name: "Sam".to_string(),
            last_name: "Rivera".to_string(),
            username: "sam".to_string(),
            password: "pw".to_string(),
            email: "sam@example.com".to_string(),
        }
        .into();

        assert_eq!(input.username, "sam");
        assert_eq!(input.password, "pw");
        assert!(input.missing_fields().is_empty());
    }
}
