//! In-memory session provider.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::provider::SessionProvider;
use crate::user_session::UserSession;

/// In-memory session store.
///
/// Sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemorySessionProvider {
    sessions: RwLock<HashMap<Uuid, UserSession>>,
}

impl InMemorySessionProvider {
    /// Creates an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns whether no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    async fn create_user_session(&self, session: &UserSession) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(SessionError::AlreadyExists(session.id));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get_user_session(&self, session_id: Uuid) -> SessionResult<Option<UserSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn remove_user_session(&self, session_id: Uuid) -> SessionResult<()> {
        if self.sessions.write().await.remove(&session_id).is_some() {
            tracing::debug!(session_id = %session_id, "User session removed");
        }
        Ok(())
    }
}
