//! # idp-storage
//!
//! Storage abstraction traits for the identity provider.
//!
//! The protocol layer reads clients, users and consent records through
//! these interfaces and never writes to them.
//!
//! ## Provider Traits
//!
//! - [`ClientProvider`] - client registry lookups
//! - [`UserProvider`] - subject lookups
//! - [`ConsentProvider`] - prior-consent existence checks
//!
//! The [`memory`] module provides `tokio::sync::RwLock` backed adapters.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod consent;
pub mod error;
pub mod memory;
pub mod user;

pub use client::ClientProvider;
pub use consent::{ConsentProvider, ConsentRecord};
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryClientStore, InMemoryConsentStore, InMemoryUserStore};
pub use user::UserProvider;
