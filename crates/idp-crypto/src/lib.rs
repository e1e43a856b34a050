//! # idp-crypto
//!
//! Cryptographic primitives for the identity provider using aws-lc-rs.
//!
//! - [`algorithm`] - the signature algorithms accepted for ID token hints
//! - [`hash`] - SHA-384 digests used for session-state fingerprints
//!
//! SHA-256 based algorithms (ES256, RS256, PS256, HS256) are rejected.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod algorithm;
pub mod hash;

pub use algorithm::{AlgorithmError, SignatureAlgorithm};
pub use hash::sha384;
