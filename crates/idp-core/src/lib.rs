//! # idp-core
//!
//! Core utilities, configuration, and error handling for the identity provider.
//!
//! This crate provides foundational types shared by the protocol and server
//! crates.
//!
//! ## Modules
//!
//! - [`config`] - Serializable configuration for the server and OIDC layer
//! - [`error`] - Core error type
//! - [`event`] - Structured audit events for consent and logout decisions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{Config, OidcConfig, ServerConfig};
pub use error::{Error, Result};
pub use event::{Event, EventBuilder, EventOutcome, EventType};
