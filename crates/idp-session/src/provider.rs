//! Session provider trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SessionResult;
use crate::user_session::UserSession;

/// Provider for session storage and management.
///
/// Implementations may use in-memory storage or a distributed cache
/// depending on deployment requirements.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Creates a new user session.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::AlreadyExists` if the ID is taken.
    async fn create_user_session(&self, session: &UserSession) -> SessionResult<()>;

    /// Gets a user session by ID.
    async fn get_user_session(&self, session_id: Uuid) -> SessionResult<Option<UserSession>>;

    /// Removes a user session.
    ///
    /// Removing a session that does not exist succeeds.
    async fn remove_user_session(&self, session_id: Uuid) -> SessionResult<()>;
}
