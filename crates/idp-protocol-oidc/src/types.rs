//! Common OIDC types and definitions.
//!
//! Implements types from OAuth 2.0 and `OpenID` Connect specifications.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// OIDC prompt values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// No UI should be displayed.
    #[serde(rename = "none")]
    None,

    /// Force re-authentication.
    #[serde(rename = "login")]
    Login,

    /// Force consent screen.
    #[serde(rename = "consent")]
    Consent,

    /// Force account selection.
    #[serde(rename = "select_account")]
    SelectAccount,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Login => "login",
            Self::Consent => "consent",
            Self::SelectAccount => "select_account",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Prompt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "login" => Ok(Self::Login),
            "consent" => Ok(Self::Consent),
            "select_account" => Ok(Self::SelectAccount),
            _ => Err(format!("unknown prompt: {s}")),
        }
    }
}

/// PKCE code challenge methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    /// Plain text (not recommended).
    #[serde(rename = "plain")]
    Plain,

    /// SHA-256 hash.
    #[serde(rename = "S256")]
    S256,
}

/// Delimiter placed between a redirect URI and its response parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSeparator {
    /// `?` - parameters in the query string.
    Query,
    /// `#` - parameters in the fragment.
    Fragment,
}

impl ResponseSeparator {
    /// Returns the separator character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Query => '?',
            Self::Fragment => '#',
        }
    }
}

/// Chooses the separator for an authorization error redirect.
///
/// Any non-blank `response_mode` selects `?`, whatever its value, so
/// `response_mode=fragment` still yields a query string. Without a mode,
/// `response_type` of exactly `code` or `none` selects `?` and anything else
/// (including hybrid types such as `code id_token`) selects `#`.
#[must_use]
pub fn response_separator(response_mode: Option<&str>, response_type: &str) -> ResponseSeparator {
    let has_mode = response_mode.is_some_and(|mode| !mode.trim().is_empty());
    let response_type = response_type.trim();

    if has_mode || response_type == "code" || response_type == "none" {
        ResponseSeparator::Query
    } else {
        ResponseSeparator::Fragment
    }
}

/// The consent decision carried on an authorization request.
///
/// On the wire this is the `authorize` parameter: `"true"` means
/// authorized, any other value means declined, and absence means the
/// decision has not been made yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsentDecision {
    /// No decision yet.
    #[default]
    Unresolved,
    /// Consent granted (explicitly, implied by trust, or reused).
    Authorized,
    /// Consent refused by the user.
    Declined,
}

impl ConsentDecision {
    /// Parses a wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value == "true" {
            Self::Authorized
        } else {
            Self::Declined
        }
    }

    /// Returns the wire value, or `None` when unresolved.
    #[must_use]
    pub const fn as_wire(self) -> Option<&'static str> {
        match self {
            Self::Unresolved => None,
            Self::Authorized => Some("true"),
            Self::Declined => Some("false"),
        }
    }

    /// Returns whether no decision has been recorded.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Returns whether consent was granted.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

impl Serialize for ConsentDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_wire() {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ConsentDecision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map_or(Self::Unresolved, |v| Self::from_wire(&v)))
    }
}

/// Standard OIDC scopes.
pub mod scopes {
    /// `OpenID` Connect scope (required for OIDC).
    pub const OPENID: &str = "openid";
    /// Profile scope (name, `family_name`, etc.).
    pub const PROFILE: &str = "profile";
    /// Email scope.
    pub const EMAIL: &str = "email";
    /// Address scope.
    pub const ADDRESS: &str = "address";
    /// Phone scope.
    pub const PHONE: &str = "phone";
    /// Offline access scope (for refresh tokens).
    pub const OFFLINE_ACCESS: &str = "offline_access";
}
