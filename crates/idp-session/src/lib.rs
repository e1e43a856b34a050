//! # idp-session
//!
//! Session management for the identity provider.
//!
//! A [`UserSession`] is the SSO session established when the user logs in.
//! It carries the browser-state value (`opbs`) from which `session_state`
//! fingerprints are derived. [`SessionProvider`] stores sessions; sign-out
//! removes them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod provider;
pub mod user_session;

pub use error::{SessionError, SessionResult};
pub use memory::InMemorySessionProvider;
pub use provider::SessionProvider;
pub use user_session::{SessionState, UserSession};
