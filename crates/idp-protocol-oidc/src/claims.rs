//! JWT claim types.
//!
//! Only the claims needed to act on an ID token hint are modelled; any
//! other claims in the token are ignored.

use serde::{Deserialize, Serialize};

/// Claims read from an `id_token_hint`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdTokenHintClaims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject - unique identifier for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience - the client the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiration time (Unix timestamp). Not enforced for hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at time (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Session ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

impl IdTokenHintClaims {
    /// Returns the client ID the token was issued to.
    ///
    /// For a multi-valued audience the first entry is used.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.aud.as_ref().and_then(Audience::first)
    }
}

/// JWT audience claim (can be single string or array).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience.
    Single(String),
    /// Multiple audiences.
    Multiple(Vec<String>),
}

impl Audience {
    /// Returns the first audience, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s.as_str()),
            Self::Multiple(v) => v.first().map(String::as_str),
        }
    }
}
