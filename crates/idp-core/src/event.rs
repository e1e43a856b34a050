//! Audit events for consent and sign-out decisions.
//!
//! Every event carries a timestamp, the event type, the outcome, and the
//! subject, client and session involved when known. Events are written to
//! the `idp::audit` tracing target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tracing target used for audit records.
pub const AUDIT_TARGET: &str = "idp::audit";

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Consent events
    /// Consent implied because the client is trusted.
    ConsentImplied,
    /// A previously granted consent was reused.
    ConsentReused,
    /// Consent was required but interaction was not allowed (`prompt=none`).
    ConsentRequired,
    /// The user was prompted for consent.
    ConsentPrompted,

    // Logout events
    /// User logged out and was redirected to a registered URI.
    LogoutRedirect,
    /// User logged out without a redirect.
    Logout,
    /// Logout request rejected before the session was touched.
    LogoutError,
}

impl EventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConsentImplied => "CONSENT_IMPLIED",
            Self::ConsentReused => "CONSENT_REUSED",
            Self::ConsentRequired => "CONSENT_REQUIRED",
            Self::ConsentPrompted => "CONSENT_PROMPTED",
            Self::LogoutRedirect => "LOGOUT_REDIRECT",
            Self::Logout => "LOGOUT",
            Self::LogoutError => "LOGOUT_ERROR",
        }
    }
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Subject (user) identifier associated with the event.
    pub user_id: Option<String>,

    /// Client ID associated with the event.
    pub client_id: Option<String>,

    /// Session ID.
    pub session_id: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Writes the event to the audit tracing target.
    pub fn emit(&self) {
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");

        match self.outcome {
            EventOutcome::Success => tracing::info!(
                target: AUDIT_TARGET,
                event_id = %self.id,
                event_type = self.event_type.as_str(),
                user_id = self.user_id.as_deref().unwrap_or("-"),
                client_id = self.client_id.as_deref().unwrap_or("-"),
                session_id = self.session_id.as_deref().unwrap_or("-"),
                details = %details,
                "audit event"
            ),
            EventOutcome::Failure => tracing::warn!(
                target: AUDIT_TARGET,
                event_id = %self.id,
                event_type = self.event_type.as_str(),
                user_id = self.user_id.as_deref().unwrap_or("-"),
                client_id = self.client_id.as_deref().unwrap_or("-"),
                session_id = self.session_id.as_deref().unwrap_or("-"),
                error = self.error.as_deref().unwrap_or("-"),
                details = %details,
                "audit event"
            ),
        }
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    user_id: Option<String>,
    client_id: Option<String>,
    session_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            user_id: None,
            client_id: None,
            session_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the subject identifier.
    #[must_use]
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the session ID.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            user_id: self.user_id,
            client_id: self.client_id,
            session_id: self.session_id,
            error: self.error,
            details: self.details,
        }
    }

    /// Builds the event and writes it to the audit target.
    pub fn emit(self) {
        self.build().emit();
    }
}
