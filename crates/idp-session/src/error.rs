//! Session error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Duplicate session identifier.
    #[error("Session already exists: {0}")]
    AlreadyExists(Uuid),

    /// Storage error.
    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
