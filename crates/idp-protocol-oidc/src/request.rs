//! OIDC request types.
//!
//! Request types for the authorization and end-session endpoints. Both
//! decode from query strings and form bodies.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};

use crate::types::{CodeChallengeMethod, ConsentDecision, Prompt};

/// Authorization endpoint request.
///
/// Every parameter is held as a string, and parameters without a field of
/// their own land in `extra`, so the request re-encodes without loss when
/// it is forwarded to the authorize endpoint. Typed views are accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Response type (required).
    pub response_type: String,

    /// Client ID (required).
    pub client_id: String,

    /// Redirect URI (required for most flows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Scope (space-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// State parameter (recommended for CSRF protection).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Response mode, kept as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mode: Option<String>,

    /// Nonce (required for implicit/hybrid flows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Display mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Prompt value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Maximum authentication age in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<String>,

    /// UI locales (space-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_locales: Option<String>,

    /// ID token hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token_hint: Option<String>,

    /// Login hint (username or email).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_hint: Option<String>,

    /// ACR values (space-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acr_values: Option<String>,

    // === PKCE Parameters ===
    /// PKCE code challenge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<String>,

    /// PKCE code challenge method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge_method: Option<String>,

    // === Request Object Parameters ===
    /// Request object (JWT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,

    /// Request URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uri: Option<String>,

    // === Claims Parameter ===
    /// Claims request (JSON).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<String>,

    // === Consent ===
    /// Consent decision recorded for this request.
    #[serde(default, skip_serializing_if = "ConsentDecision::is_unresolved")]
    pub authorize: ConsentDecision,

    /// Parameters without a dedicated field, forwarded as sent.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl AuthorizationRequest {
    /// Creates a request with the required parameters only.
    #[must_use]
    pub fn new(response_type: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            response_type: response_type.into(),
            client_id: client_id.into(),
            redirect_uri: None,
            scope: None,
            state: None,
            response_mode: None,
            nonce: None,
            display: None,
            prompt: None,
            max_age: None,
            ui_locales: None,
            id_token_hint: None,
            login_hint: None,
            acr_values: None,
            code_challenge: None,
            code_challenge_method: None,
            request: None,
            request_uri: None,
            claims: None,
            authorize: ConsentDecision::Unresolved,
            extra: BTreeMap::new(),
        }
    }

    /// Parses the prompt parameter.
    ///
    /// The whole value is matched exactly, so neither `prompt=none login`
    /// nor `prompt=%20none` is `none`. Unknown values are treated as absent.
    #[must_use]
    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt.as_deref().and_then(|p| p.parse().ok())
    }

    /// Checks if the prompt is "none".
    #[must_use]
    pub fn is_prompt_none(&self) -> bool {
        self.prompt() == Some(Prompt::None)
    }

    /// Returns the scopes as a vector.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_ref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Returns the distinct requested scopes.
    #[must_use]
    pub fn scope_set(&self) -> BTreeSet<String> {
        self.scopes().into_iter().map(str::to_string).collect()
    }

    /// Parses the PKCE code challenge method. Unknown values are treated as absent.
    #[must_use]
    pub fn code_challenge_method(&self) -> Option<CodeChallengeMethod> {
        self.code_challenge_method.as_deref().and_then(|method| {
            let deserializer: StrDeserializer<'_, ValueError> = method.into_deserializer();
            CodeChallengeMethod::deserialize(deserializer).ok()
        })
    }

    /// Parses `max_age` as seconds. Non-numeric values are treated as absent.
    #[must_use]
    pub fn max_age(&self) -> Option<i64> {
        self.max_age.as_deref().and_then(|v| v.parse().ok())
    }
}


/// End session (RP-initiated logout) request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndSessionRequest {
    /// ID token hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token_hint: Option<String>,

    /// Post-logout redirect URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uri: Option<String>,

    /// State.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// UI locales.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_locales: Option<String>,
}

impl EndSessionRequest {
    /// Returns the ID token hint, treating an empty value as absent.
    #[must_use]
    pub fn id_token_hint(&self) -> Option<&str> {
        non_empty(self.id_token_hint.as_deref())
    }

    /// Returns the post-logout redirect URI, treating an empty value as absent.
    #[must_use]
    pub fn post_logout_redirect_uri(&self) -> Option<&str> {
        non_empty(self.post_logout_redirect_uri.as_deref())
    }

    /// Returns the state, treating an empty value as absent.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        non_empty(self.state.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
