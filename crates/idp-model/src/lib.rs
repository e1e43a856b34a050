//! # idp-model
//!
//! Domain models for the identity provider.
//!
//! Only the entities the consent and sign-out flows read are modelled here:
//! registered clients and the authenticated subject.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod user;

pub use client::Client;
pub use user::User;
