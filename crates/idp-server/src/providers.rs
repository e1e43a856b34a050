//! Storage provider wiring for the server.
//!
//! The server runs on the in-memory adapters. A JSON fixtures file can seed
//! them at startup.

use std::path::Path;
use std::sync::Arc;

use idp_model::{Client, User};
use idp_session::{InMemorySessionProvider, SessionProvider, UserSession};
use idp_storage::{ConsentRecord, InMemoryClientStore, InMemoryConsentStore, InMemoryUserStore};
use serde::Deserialize;

/// Aggregate storage providers backed by in-memory stores.
#[derive(Clone, Default)]
pub struct StorageProviders {
    /// Client registry.
    pub clients: Arc<InMemoryClientStore>,

    /// User store.
    pub users: Arc<InMemoryUserStore>,

    /// Prior-consent records.
    pub consents: Arc<InMemoryConsentStore>,

    /// User sessions.
    pub sessions: Arc<InMemorySessionProvider>,
}

impl StorageProviders {
    /// Creates empty providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads fixtures into the stores.
    ///
    /// ## Errors
    ///
    /// Fails on duplicate client, user or session identifiers.
    pub async fn seed(&self, fixtures: Fixtures) -> anyhow::Result<()> {
        let counts = (
            fixtures.clients.len(),
            fixtures.users.len(),
            fixtures.consents.len(),
            fixtures.sessions.len(),
        );

        for client in fixtures.clients {
            self.clients.insert(client).await?;
        }
        for user in fixtures.users {
            self.users.insert(user).await?;
        }
        for consent in fixtures.consents {
            self.consents
                .grant(ConsentRecord::new(consent.subject_id, consent.client_id, consent.scopes))
                .await;
        }
        for session in &fixtures.sessions {
            self.sessions.create_user_session(session).await?;
        }

        tracing::info!(
            clients = counts.0,
            users = counts.1,
            consents = counts.2,
            sessions = counts.3,
            "Fixtures loaded"
        );
        Ok(())
    }
}

/// Seed data for the in-memory stores.
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    /// Registered clients.
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Granted consents.
    #[serde(default)]
    pub consents: Vec<ConsentFixture>,
    /// Pre-established sessions.
    #[serde(default)]
    pub sessions: Vec<UserSession>,
}

/// A consent grant in a fixtures file.
#[derive(Debug, Deserialize)]
pub struct ConsentFixture {
    /// Subject that granted consent.
    pub subject_id: String,
    /// Client that received consent.
    pub client_id: String,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Fixtures {
    /// Reads fixtures from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read fixtures {}: {e}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
