/// Session cookie handling
///
/// [`resolve_session`] runs on every request: it reads the
/// `choreboard_session` cookie, resolves it through the
/// [`SessionManager`](choreboard_shared::session::SessionManager) and
/// stores the result as [`CurrentSession`] in the request extensions.
/// Handlers take `CurrentSession` as an extractor.
///
/// # Cookie
///
/// ```text
/// choreboard_session=<token>.<hmac>; Path=/; HttpOnly; SameSite=Lax; Max-Age=<ttl>[; Secure]
/// ```

use crate::{app::AppState, error::PageError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use choreboard_shared::auth::context::RequestContext;
use std::convert::Infallible;
use std::time::Duration;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "choreboard_session";

/// The session resolved for the current request, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentSession(pub Option<RequestContext>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Returns the value of cookie `name` from the `Cookie` headers
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

fn cookie_header(value: &str, max_age: u64, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }

    // Signed values are ASCII alphanumerics and '.'
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// `Set-Cookie` value carrying a signed session
pub fn session_cookie(cookie_value: &str, ttl: Duration, secure: bool) -> HeaderValue {
    cookie_header(cookie_value, ttl.as_secs(), secure)
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    cookie_header("", 0, secure)
}

/// Resolves the session cookie into a [`CurrentSession`] extension.
///
/// A missing, forged or expired cookie yields an anonymous request. A
/// session store failure fails the request.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, PageError> {
    let context = match read_cookie(req.headers(), SESSION_COOKIE) {
        Some(value) if !value.is_empty() => state.sessions.resolve(value).await?,
        _ => None,
    };

    if let Some(ctx) = &context {
        tracing::debug!(username = %ctx.username, "Resolved session");
    }

    req.extensions_mut().insert(CurrentSession(context));

    Ok(next.run(req).await)
}
