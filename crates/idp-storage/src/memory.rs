//! In-memory storage adapters.
//!
//! Used by the development server (seeded from fixtures) and by tests.
//! Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use idp_model::{Client, User};
use tokio::sync::RwLock;

use crate::client::ClientProvider;
use crate::consent::{ConsentProvider, ConsentRecord};
use crate::error::{StorageError, StorageResult};
use crate::user::UserProvider;

/// In-memory client registry keyed by `client_id`.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    clients: RwLock<HashMap<String, Client>>,
}

impl InMemoryClientStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if the `client_id` is taken.
    pub async fn insert(&self, client: Client) -> StorageResult<()> {
        let mut clients = self.clients.write().await;
        if clients.contains_key(&client.id) {
            return Err(StorageError::duplicate("Client", "client_id", client.id));
        }
        clients.insert(client.id.clone(), client);
        Ok(())
    }
}

#[async_trait]
impl ClientProvider for InMemoryClientStore {
    async fn get_by_client_id(&self, client_id: &str) -> StorageResult<Option<Client>> {
        Ok(self.clients.read().await.get(client_id).cloned())
    }
}

/// In-memory user store keyed by subject identifier.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if the subject already exists.
    pub async fn insert(&self, user: User) -> StorageResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StorageError::duplicate("User", "id", user.id));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }
}

#[async_trait]
impl UserProvider for InMemoryUserStore {
    async fn get_by_id(&self, id: &str) -> StorageResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

/// In-memory consent store keyed by (subject, client).
#[derive(Debug, Default)]
pub struct InMemoryConsentStore {
    records: RwLock<HashMap<(String, String), ConsentRecord>>,
}

impl InMemoryConsentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a consent record, replacing any earlier grant for the pair.
    pub async fn grant(&self, record: ConsentRecord) {
        tracing::debug!(
            subject_id = %record.subject_id,
            client_id = %record.client_id,
            "Seeding consent record"
        );
        let key = (record.subject_id.clone(), record.client_id.clone());
        self.records.write().await.insert(key, record);
    }

    /// Returns the stored record for the pair, if any.
    pub async fn get(&self, subject_id: &str, client_id: &str) -> Option<ConsentRecord> {
        self.records
            .read()
            .await
            .get(&(subject_id.to_string(), client_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ConsentProvider for InMemoryConsentStore {
    async fn consent_exists(&self, subject_id: &str, client_id: &str) -> StorageResult<bool> {
        Ok(self
            .records
            .read()
            .await
            .contains_key(&(subject_id.to_string(), client_id.to_string())))
    }
}
