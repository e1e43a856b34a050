//! Consent page.
//!
//! Renders the consent prompt with askama. The form re-submits the original
//! authorization request to the authorize path together with the user's
//! decision (`authorize=true` or `authorize=false`).

use std::collections::BTreeSet;

use askama::Template;
use idp_protocol_oidc::types::scopes;
use idp_protocol_oidc::{ConsentPrompt, ConsentView, OidcError, OidcResult};

/// Scope information for consent screen.
#[derive(Debug, Clone)]
pub struct ScopeInfo {
    /// Scope name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
}

/// A request parameter carried through the consent form.
#[derive(Debug, Clone)]
pub struct HiddenField {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

/// Consent page template.
#[derive(Template)]
#[template(path = "authorize.html")]
pub struct AuthorizeTemplate {
    /// Name of the requesting client.
    pub client_name: String,
    /// Home page of the client.
    pub client_uri: Option<String>,
    /// Name of the signed-in user.
    pub user_name: String,
    /// Requested scopes.
    pub scopes: Vec<ScopeInfo>,
    /// Form action URL.
    pub action_url: String,
    /// Original request parameters.
    pub hidden_fields: Vec<HiddenField>,
}

impl AuthorizeTemplate {
    /// Builds the template for a consent prompt.
    ///
    /// ## Errors
    ///
    /// Returns an error if the request cannot be re-encoded.
    pub fn from_prompt(prompt: &ConsentPrompt, action_url: &str) -> OidcResult<Self> {
        let encoded = serde_urlencoded::to_string(&prompt.request)
            .map_err(|e| OidcError::Internal(format!("failed to encode request: {e}")))?;
        let hidden_fields = serde_urlencoded::from_str::<Vec<(String, String)>>(&encoded)
            .map_err(|e| OidcError::Internal(format!("failed to encode request: {e}")))?
            .into_iter()
            .map(|(name, value)| HiddenField { name, value })
            .collect();

        Ok(Self {
            client_name: prompt.client.display_name().to_string(),
            client_uri: prompt.client.client_uri.clone(),
            user_name: prompt.user.display_name(),
            scopes: scopes_to_info(&prompt.scopes),
            action_url: action_url.to_string(),
            hidden_fields,
        })
    }
}

/// Consent view backed by [`AuthorizeTemplate`].
#[derive(Debug, Clone)]
pub struct AskamaConsentView {
    action_url: String,
}

impl AskamaConsentView {
    /// Creates a view posting decisions to `action_url`.
    #[must_use]
    pub fn new(action_url: impl Into<String>) -> Self {
        Self {
            action_url: action_url.into(),
        }
    }
}

impl ConsentView for AskamaConsentView {
    fn render(&self, prompt: &ConsentPrompt) -> OidcResult<String> {
        AuthorizeTemplate::from_prompt(prompt, &self.action_url)?
            .render()
            .map_err(|e| OidcError::Internal(format!("template render error: {e}")))
    }
}

/// Converts requested scopes to display info.
///
/// Scopes without a known description are listed by name.
#[must_use]
pub fn scopes_to_info(requested: &BTreeSet<String>) -> Vec<ScopeInfo> {
    requested
        .iter()
        .map(|s| {
            let description = match s.as_str() {
                scopes::OPENID => "Verify your identity",
                scopes::PROFILE => "Access your basic profile information (name, picture)",
                scopes::EMAIL => "Access your email address",
                scopes::PHONE => "Access your phone number",
                scopes::ADDRESS => "Access your address",
                scopes::OFFLINE_ACCESS => "Access your data when you're not using the app",
                other => other,
            };
            ScopeInfo {
                name: s.clone(),
                description: description.to_string(),
            }
        })
        .collect()
}
