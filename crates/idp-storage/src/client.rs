//! Client storage provider trait.

use async_trait::async_trait;
use idp_model::Client;

use crate::error::StorageResult;

/// Read access to the client registry.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Gets a client by `client_id` (OAuth client identifier).
    ///
    /// Returns `Ok(None)` when no such client is registered.
    async fn get_by_client_id(&self, client_id: &str) -> StorageResult<Option<Client>>;
}
