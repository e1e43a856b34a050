//! Client domain model.
//!
//! Clients are relying parties registered with the provider. The client
//! registry owns them; the protocol layer only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered OAuth 2.0 / OIDC client (relying party).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    // === Identity ===
    /// Unique client identifier (OAuth `client_id`, also the ID token `aud`).
    pub id: String,
    /// Display name shown on the consent screen.
    #[serde(default)]
    pub name: Option<String>,

    // === Trust ===
    /// Trusted clients bypass interactive consent entirely.
    #[serde(default)]
    pub trusted: bool,

    // === URLs ===
    /// Home page of the client, used to derive the `session_state` origin.
    #[serde(default)]
    pub client_uri: Option<String>,
    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    /// Registered post-logout redirect URIs, in registration order.
    #[serde(default)]
    pub post_logout_redirect_uris: Vec<String>,

    // === Timestamps ===
    /// When the client was registered.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Creates a new untrusted client with the given client ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            trusted: false,
            client_uri: None,
            redirect_uris: Vec::new(),
            post_logout_redirect_uris: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the client as trusted.
    #[must_use]
    pub const fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    /// Sets the client URI.
    #[must_use]
    pub fn with_client_uri(mut self, uri: impl Into<String>) -> Self {
        self.client_uri = Some(uri.into());
        self
    }

    /// Adds a redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    /// Adds a post-logout redirect URI.
    #[must_use]
    pub fn with_post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uris.push(uri.into());
        self
    }

    /// Returns the name to display for this client.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Checks whether `uri` is a registered post-logout redirect URI.
    ///
    /// Only exact string equality counts as a match.
    #[must_use]
    pub fn is_registered_post_logout_uri(&self, uri: &str) -> bool {
        self.post_logout_redirect_uris.iter().any(|registered| registered == uri)
    }
}
