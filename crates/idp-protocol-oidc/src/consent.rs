//! Authorization consent resolution.
//!
//! Decides, for an authenticated authorization request, whether the flow may
//! continue, must be rejected back to the client, or needs the user to be
//! asked for consent. Decision order:
//!
//! 1. Trusted clients are authorized without any lookup.
//! 2. A request that already carries a decision passes through unchanged.
//! 3. Otherwise the consent policy is consulted once:
//!    - consent found: authorized
//!    - no consent, `prompt=none`: `consent_required` error redirect
//!    - no consent on the authorize path: render the consent prompt
//!    - no consent elsewhere: redirect to the authorize path

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use idp_core::{Event, EventType};
use idp_model::{Client, User};
use idp_storage::ConsentProvider;

use crate::error::{OidcError, OidcResult};
use crate::request::AuthorizationRequest;
use crate::session_state::SessionStateCalculator;
use crate::types::{response_separator, ConsentDecision};

/// Decides whether a subject has already consented to a client.
#[async_trait]
pub trait ConsentPolicy: Send + Sync {
    /// Returns whether `subject` has consented to `client` for `scopes`.
    async fn has_consent(
        &self,
        subject: &User,
        client: &Client,
        scopes: &BTreeSet<String>,
    ) -> OidcResult<bool>;
}

/// Consent policy satisfied by any stored consent for the subject/client pair.
///
/// Requested scopes are not compared with the granted ones.
pub struct ExistingConsentPolicy {
    provider: Arc<dyn ConsentProvider>,
}

impl ExistingConsentPolicy {
    /// Creates a policy backed by a consent store.
    #[must_use]
    pub fn new(provider: Arc<dyn ConsentProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ConsentPolicy for ExistingConsentPolicy {
    async fn has_consent(
        &self,
        subject: &User,
        client: &Client,
        _scopes: &BTreeSet<String>,
    ) -> OidcResult<bool> {
        Ok(self.provider.consent_exists(&subject.id, &client.id).await?)
    }
}

/// Everything the resolver needs about the request in flight.
///
/// Built by the authentication layer after the user and client have been
/// identified.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    /// The authorization request. Its `authorize` decision is updated in place.
    pub request: AuthorizationRequest,
    /// The requesting client.
    pub client: Client,
    /// The authenticated subject.
    pub user: User,
    /// Browser state of the user's session.
    pub opbs: Option<String>,
}

/// Data handed to the consent view.
#[derive(Debug, Clone)]
pub struct ConsentPrompt {
    /// The request to resubmit with the user's decision.
    pub request: AuthorizationRequest,
    /// The requesting client.
    pub client: Client,
    /// The subject being asked.
    pub user: User,
    /// Requested scopes.
    pub scopes: BTreeSet<String>,
}

/// Result of consent resolution.
#[derive(Debug, Clone)]
pub enum ConsentOutcome {
    /// Consent was granted by trust or an earlier grant. The request now
    /// carries `ConsentDecision::Authorized`.
    Authorized,
    /// A decision was already recorded; continue unchanged.
    Proceed,
    /// Redirect back to the client with `error=consent_required`.
    ErrorRedirect {
        /// Full redirect location.
        location: String,
    },
    /// Ask the user.
    RenderConsent(Box<ConsentPrompt>),
    /// Send the user agent to the authorize endpoint with the same request.
    RedirectToAuthorize {
        /// Authorize path with the re-encoded request.
        location: String,
    },
}

/// Resolves consent for authorization requests.
pub struct ConsentResolver {
    policy: Arc<dyn ConsentPolicy>,
    session_state: Arc<dyn SessionStateCalculator>,
    authorize_path: String,
}

impl ConsentResolver {
    /// Creates a resolver.
    ///
    /// `authorize_path` is the canonical authorize endpoint path; the
    /// consent view is only rendered for requests on that path.
    #[must_use]
    pub fn new(
        policy: Arc<dyn ConsentPolicy>,
        session_state: Arc<dyn SessionStateCalculator>,
        authorize_path: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            session_state,
            authorize_path: authorize_path.into(),
        }
    }

    /// Returns the canonical authorize path.
    #[must_use]
    pub fn authorize_path(&self) -> &str {
        &self.authorize_path
    }

    /// Resolves consent for the request in `ctx`, received on `path`.
    ///
    /// ## Errors
    ///
    /// Propagates consent lookup failures. Returns `InvalidRequest` when an
    /// error redirect is needed but the request has no `redirect_uri`.
    pub async fn resolve(
        &self,
        ctx: &mut AuthorizationContext,
        path: &str,
    ) -> OidcResult<ConsentOutcome> {
        if ctx.client.trusted {
            ctx.request.authorize = ConsentDecision::Authorized;
            tracing::debug!(client_id = %ctx.client.id, "Consent implied for trusted client");
            audit(EventType::ConsentImplied, ctx);
            return Ok(ConsentOutcome::Authorized);
        }

        if !ctx.request.authorize.is_unresolved() {
            tracing::debug!(
                client_id = %ctx.client.id,
                decision = ?ctx.request.authorize,
                "Consent already decided"
            );
            return Ok(ConsentOutcome::Proceed);
        }

        let scopes = ctx.request.scope_set();
        if self
            .policy
            .has_consent(&ctx.user, &ctx.client, &scopes)
            .await?
        {
            ctx.request.authorize = ConsentDecision::Authorized;
            tracing::debug!(client_id = %ctx.client.id, "Reusing existing consent");
            audit(EventType::ConsentReused, ctx);
            return Ok(ConsentOutcome::Authorized);
        }

        if ctx.request.is_prompt_none() {
            let location = self.consent_required_location(ctx)?;
            Event::builder(EventType::ConsentRequired)
                .failure("consent_required")
                .user(ctx.user.id.as_str())
                .client(ctx.client.id.as_str())
                .emit();
            return Ok(ConsentOutcome::ErrorRedirect { location });
        }

        if path == self.authorize_path {
            audit(EventType::ConsentPrompted, ctx);
            return Ok(ConsentOutcome::RenderConsent(Box::new(ConsentPrompt {
                request: ctx.request.clone(),
                client: ctx.client.clone(),
                user: ctx.user.clone(),
                scopes,
            })));
        }

        let query = serde_urlencoded::to_string(&ctx.request)
            .map_err(|e| OidcError::Internal(format!("failed to encode request: {e}")))?;
        tracing::debug!(path, "Redirecting to authorize endpoint for consent");

        Ok(ConsentOutcome::RedirectToAuthorize {
            location: format!("{}?{query}", self.authorize_path),
        })
    }

    fn consent_required_location(&self, ctx: &AuthorizationContext) -> OidcResult<String> {
        let redirect_uri = ctx.request.redirect_uri.as_deref().ok_or_else(|| {
            OidcError::InvalidRequest("redirect_uri is required for an error response".to_string())
        })?;

        let session_state = self
            .session_state
            .calculate(&ctx.client, ctx.opbs.as_deref().unwrap_or_default());

        let mut params = vec![("error", OidcError::ConsentRequired.error_code())];
        if let Some(state) = ctx.request.state.as_deref() {
            params.push(("state", state));
        }
        params.push(("session_state", session_state.as_str()));

        Ok(build_error_location(redirect_uri, &ctx.request, &params))
    }
}

/// Builds an error redirect location for an authorization request.
///
/// The separator follows [`response_separator`].
#[must_use]
pub fn build_error_location(
    redirect_uri: &str,
    request: &AuthorizationRequest,
    params: &[(&str, &str)],
) -> String {
    let separator =
        response_separator(request.response_mode.as_deref(), &request.response_type).as_char();
    let encoded = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{redirect_uri}{separator}{encoded}")
}

fn audit(event_type: EventType, ctx: &AuthorizationContext) {
    Event::builder(event_type)
        .success()
        .user(ctx.user.id.as_str())
        .client(ctx.client.id.as_str())
        .detail("scope", ctx.request.scope.as_deref().unwrap_or_default())
        .emit();
}
