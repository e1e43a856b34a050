//! User session (SSO session) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a user session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Session is active and valid.
    #[default]
    Active,
    /// Session is logged out but not yet removed.
    LoggedOut,
}

/// A user session (SSO session).
///
/// Represents an authenticated user's session across clients. The
/// `opbs` value is the OpenID provider browser state used when computing
/// `session_state` for session management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    // === Identity ===
    /// Unique session identifier (the session cookie value).
    pub id: Uuid,
    /// Subject who owns this session.
    pub user_id: String,

    // === Session State ===
    /// Current state of the session.
    #[serde(default)]
    pub state: SessionState,
    /// OP browser state. May be empty.
    #[serde(default)]
    pub opbs: String,

    // === Timestamps ===
    /// When the session was created.
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
    /// Last activity timestamp.
    #[serde(default = "Utc::now")]
    pub last_activity: DateTime<Utc>,
}

impl UserSession {
    /// Creates a new active session with a fresh browser state.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            state: SessionState::Active,
            opbs: Uuid::new_v4().simple().to_string(),
            started_at: now,
            last_activity: now,
        }
    }

    /// Sets the browser state.
    #[must_use]
    pub fn with_opbs(mut self, opbs: impl Into<String>) -> Self {
        self.opbs = opbs.into();
        self
    }

    /// Updates the last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Checks if the session is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active)
    }

    /// Marks the session as logged out.
    pub fn logout(&mut self) {
        self.state = SessionState::LoggedOut;
    }
}
