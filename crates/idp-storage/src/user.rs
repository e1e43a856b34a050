//! User storage provider trait.

use async_trait::async_trait;
use idp_model::User;

use crate::error::StorageResult;

/// Read access to end users.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Gets a user by subject identifier.
    async fn get_by_id(&self, id: &str) -> StorageResult<Option<User>>;
}
