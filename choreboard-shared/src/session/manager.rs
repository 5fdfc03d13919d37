/// Session lifecycle: issue, resolve and end sessions
///
/// The manager is the only component that knows how a cookie value maps
/// to a store key. Handlers get back a [`RequestContext`] and never see
/// raw tokens after login.

use super::{SessionRecord, SessionStore, SessionStoreError};
use crate::auth::context::RequestContext;
use crate::auth::token::{generate_session_token, session_id, CookieSigner};
use std::sync::Arc;
use std::time::Duration;

/// A freshly issued session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Signed value to place in the session cookie
    pub cookie_value: String,

    pub context: RequestContext,
}

/// Issues and resolves sessions against a [`SessionStore`]
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: CookieSigner,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, signer: CookieSigner, ttl: Duration) -> Self {
        Self { store, signer, ttl }
    }

    /// Session lifetime, also used as the cookie `Max-Age`
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn ping(&self) -> Result<bool, SessionStoreError> {
        self.store.ping().await
    }

    /// Starts a session for `username`
    pub async fn start(&self, username: &str) -> Result<IssuedSession, SessionStoreError> {
        let token = generate_session_token();
        let id = session_id(&token);

        self.store
            .insert(&id, &SessionRecord::new(username), self.ttl)
            .await?;

        tracing::debug!(username = %username, "Session started");

        Ok(IssuedSession {
            cookie_value: self.signer.sign(&token),
            context: RequestContext::new(id, username),
        })
    }

    /// Maps a cookie value to the session it names.
    ///
    /// Returns `Ok(None)` for a forged cookie or an expired/ended session.
    pub async fn resolve(
        &self,
        cookie_value: &str,
    ) -> Result<Option<RequestContext>, SessionStoreError> {
        let Some(token) = self.signer.verify(cookie_value) else {
            tracing::debug!("Ignoring session cookie with invalid signature");
            return Ok(None);
        };

        let id = session_id(&token);
        let record = self.store.get(&id).await?;

        Ok(record.map(|record| RequestContext::new(id, record.username)))
    }

    /// Ends the session; ending an unknown session is a no-op
    pub async fn end(&self, context: &RequestContext) -> Result<(), SessionStoreError> {
        self.store.remove(&context.session_id).await?;
        tracing::debug!(username = %context.username, "Session ended");
        Ok(())
    }
}
