//! Consent storage provider trait.
//!
//! A consent record states that a subject has authorized a client. Records
//! are written by the token issuance subsystem; this crate only exposes an
//! existence check.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageResult;

/// A stored grant of consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRecord {
    /// Subject that granted consent.
    pub subject_id: String,
    /// Client that received consent.
    pub client_id: String,
    /// Scopes that were granted.
    pub scopes: BTreeSet<String>,
    /// When consent was granted.
    pub granted_at: DateTime<Utc>,
}

impl ConsentRecord {
    /// Creates a consent record granted now.
    #[must_use]
    pub fn new<I, S>(subject_id: impl Into<String>, client_id: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject_id: subject_id.into(),
            client_id: client_id.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            granted_at: Utc::now(),
        }
    }
}

/// Lookup over prior-consent records.
///
/// Once a record is stored, subsequent lookups for the same subject/client
/// pair must observe it.
#[async_trait]
pub trait ConsentProvider: Send + Sync {
    /// Checks whether `subject_id` has previously authorized `client_id`.
    ///
    /// ## Errors
    ///
    /// Returns a storage error if the backend cannot be queried. Callers
    /// propagate it; lookups are never retried.
    async fn consent_exists(&self, subject_id: &str, client_id: &str) -> StorageResult<bool>;
}
