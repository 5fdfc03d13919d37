/// Per-request identity
///
/// The HTTP layer resolves the session cookie into a [`RequestContext`]
/// once per request and hands it to services explicitly; nothing reads the
/// session from ambient state.

use serde::{Deserialize, Serialize};

/// The authenticated user behind one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Store key of the session (SHA-256 of the cookie token)
    pub session_id: String,

    pub username: String,
}

impl RequestContext {
    pub fn new(session_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            username: username.into(),
        }
    }
}

/// Where a browser session stands in the onboarding flow.
///
/// ```text
/// Anonymous ──register/login──> NoHousehold ──create/join──> WithHousehold
///     ^                              │                            │
///     └────────────── logout ────────┴────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    NoHousehold { username: String },
    WithHousehold { username: String, household_id: i32 },
}

impl SessionState {
    /// Builds the state from the resolved context and the user's current
    /// household (as read from the database).
    pub fn from_parts(context: Option<&RequestContext>, household_id: Option<i32>) -> Self {
        match (context, household_id) {
            (None, _) => SessionState::Anonymous,
            (Some(ctx), None) => SessionState::NoHousehold {
                username: ctx.username.clone(),
            },
            (Some(ctx), Some(household_id)) => SessionState::WithHousehold {
                username: ctx.username.clone(),
                household_id,
            },
        }
    }

    /// Page a user in this state should land on
    pub fn landing_path(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "/login",
            SessionState::NoHousehold { .. } => "/join",
            SessionState::WithHousehold { .. } => "/pages/home",
        }
    }

    /// False for anonymous callers and for sessions whose user is gone
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, SessionState::Anonymous)
    }

    pub fn household_id(&self) -> Option<i32> {
        match self {
            SessionState::WithHousehold { household_id, .. } => Some(*household_id),
            _ => None,
        }
    }
}
