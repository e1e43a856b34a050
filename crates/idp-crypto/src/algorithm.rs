//! Cryptographic algorithm definitions.
//!
//! Only SHA-384 and stronger are available:
//! - ECDSA: P-384
//! - RSA: PKCS#1 v1.5 and PSS with SHA-384 / SHA-512

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for algorithm operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlgorithmError {
    /// Algorithm is known but too weak to be accepted.
    #[error("algorithm '{0}' is not permitted")]
    NotPermitted(String),

    /// Unknown algorithm.
    #[error("unknown algorithm: {0}")]
    Unknown(String),
}

/// Signature algorithms accepted for signed tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// ECDSA using P-384 curve and SHA-384 hash.
    #[serde(rename = "ES384")]
    Es384,

    /// RSA PKCS#1 v1.5 with SHA-384.
    #[serde(rename = "RS384")]
    Rs384,

    /// RSA PKCS#1 v1.5 with SHA-512.
    #[serde(rename = "RS512")]
    Rs512,

    /// RSA-PSS with SHA-384.
    #[serde(rename = "PS384")]
    Ps384,

    /// RSA-PSS with SHA-512.
    #[serde(rename = "PS512")]
    Ps512,
}

impl SignatureAlgorithm {
    /// Returns the JWA algorithm name.
    #[must_use]
    pub const fn jwa_name(self) -> &'static str {
        match self {
            Self::Es384 => "ES384",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Ps384 => "PS384",
            Self::Ps512 => "PS512",
        }
    }

    /// Returns whether this is an ECDSA algorithm.
    #[must_use]
    pub const fn is_ecdsa(self) -> bool {
        matches!(self, Self::Es384)
    }

    /// Parses a JWA algorithm name.
    ///
    /// ## Errors
    ///
    /// Returns an error if the algorithm is too weak or unknown.
    pub fn from_jwa(name: &str) -> Result<Self, AlgorithmError> {
        match name {
            "ES384" => Ok(Self::Es384),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            "PS384" => Ok(Self::Ps384),
            "PS512" => Ok(Self::Ps512),

            "ES256" | "RS256" | "PS256" | "HS256" | "HS384" | "HS512" | "none" => {
                Err(AlgorithmError::NotPermitted(name.to_string()))
            }

            _ => Err(AlgorithmError::Unknown(name.to_string())),
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_jwa(s)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwa_name())
    }
}
