//! RP-initiated sign-out.
//!
//! The coordinator validates an end-session request and picks the response.
//! Processing runs as an ordered list of stages; the first stage that handles
//! the request produces the response and later stages are skipped.
//!
//! - [`SignoutStage::RegisteredRedirect`]: the hint names a client that has
//!   registered the requested post-logout URI. End the session and redirect.
//! - [`SignoutStage::NoContent`]: end the session and return no content.
//!
//! A hint that fails verification aborts the request before the session is
//! touched.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderValue;
use idp_core::{Event, EventType};
use idp_storage::ClientProvider;

use crate::error::{OidcError, OidcResult};
use crate::request::EndSessionRequest;
use crate::token::IdTokenHintDecoder;

/// Ends the user's session for the current request.
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    /// Terminates the session. Must succeed when there is no session.
    async fn terminate(&self) -> OidcResult<()>;
}

/// Response chosen for a sign-out request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignoutResponse {
    /// `303 See Other` to a registered post-logout URI.
    Redirect {
        /// Redirect location, with `?state=` appended when state was given.
        location: String,
    },
    /// `204 No Content`, not cacheable.
    NoContent,
}

/// Result of running a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage produced the response.
    Handled(SignoutResponse),
    /// Continue with the next stage.
    NotHandled,
}

/// A sign-out processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignoutStage {
    /// Redirect to a post-logout URI registered by the hinted client.
    RegisteredRedirect,
    /// Sign out without redirecting.
    NoContent,
}

/// Default stage order.
pub const DEFAULT_STAGES: [SignoutStage; 2] =
    [SignoutStage::RegisteredRedirect, SignoutStage::NoContent];

/// Request data shared by the stages.
#[derive(Debug)]
struct SignoutContext<'a> {
    client_id: Option<String>,
    subject: Option<String>,
    post_logout_redirect_uri: Option<&'a str>,
    state: Option<&'a str>,
}

impl SignoutStage {
    async fn run(
        self,
        ctx: &SignoutContext<'_>,
        clients: &dyn ClientProvider,
        terminator: &dyn SessionTerminator,
    ) -> OidcResult<StageOutcome> {
        match self {
            Self::RegisteredRedirect => registered_redirect(ctx, clients, terminator).await,
            Self::NoContent => {
                terminator.terminate().await?;
                audit(EventType::Logout, ctx);
                Ok(StageOutcome::Handled(SignoutResponse::NoContent))
            }
        }
    }
}

async fn registered_redirect(
    ctx: &SignoutContext<'_>,
    clients: &dyn ClientProvider,
    terminator: &dyn SessionTerminator,
) -> OidcResult<StageOutcome> {
    let (Some(client_id), Some(uri)) = (ctx.client_id.as_deref(), ctx.post_logout_redirect_uri)
    else {
        return Ok(StageOutcome::NotHandled);
    };

    let Some(client) = clients.get_by_client_id(client_id).await? else {
        tracing::debug!(client_id, "Sign-out hint names an unknown client");
        return Ok(StageOutcome::NotHandled);
    };

    if !client.is_registered_post_logout_uri(uri) {
        tracing::warn!(
            client_id,
            post_logout_redirect_uri = uri,
            "Post-logout redirect URI is not registered"
        );
        return Ok(StageOutcome::NotHandled);
    }

    let location = match ctx.state {
        Some(state) => format!("{uri}?state={state}"),
        None => uri.to_string(),
    };

    // The session must outlive a location that cannot be sent
    if HeaderValue::from_str(&location).is_err() {
        tracing::warn!(client_id, "Post-logout redirect location is not a valid header value");
        return Ok(StageOutcome::NotHandled);
    }

    terminator.terminate().await?;
    audit(EventType::LogoutRedirect, ctx);

    Ok(StageOutcome::Handled(SignoutResponse::Redirect { location }))
}

/// Coordinates RP-initiated sign-out.
pub struct SignoutCoordinator {
    clients: Arc<dyn ClientProvider>,
    decoder: Arc<dyn IdTokenHintDecoder>,
    stages: Vec<SignoutStage>,
}

impl SignoutCoordinator {
    /// Creates a coordinator with the default stages.
    #[must_use]
    pub fn new(clients: Arc<dyn ClientProvider>, decoder: Arc<dyn IdTokenHintDecoder>) -> Self {
        Self {
            clients,
            decoder,
            stages: DEFAULT_STAGES.to_vec(),
        }
    }

    /// Processes a sign-out request.
    ///
    /// ## Errors
    ///
    /// Returns `TokenValidation` if the hint cannot be verified, and
    /// propagates client registry and session failures.
    pub async fn sign_out(
        &self,
        request: &EndSessionRequest,
        terminator: &dyn SessionTerminator,
    ) -> OidcResult<SignoutResponse> {
        let claims = match request.id_token_hint() {
            Some(hint) => match self.decoder.decode(hint) {
                Ok(claims) => Some(claims),
                Err(err) => {
                    Event::builder(EventType::LogoutError)
                        .failure(err.to_string())
                        .emit();
                    return Err(err);
                }
            },
            None => None,
        };

        let ctx = SignoutContext {
            client_id: claims.as_ref().and_then(|c| c.client_id()).map(str::to_string),
            subject: claims.and_then(|c| c.sub),
            post_logout_redirect_uri: request.post_logout_redirect_uri(),
            state: request.state(),
        };

        for stage in &self.stages {
            if let StageOutcome::Handled(response) =
                stage.run(&ctx, self.clients.as_ref(), terminator).await?
            {
                return Ok(response);
            }
        }

        Err(OidcError::Internal("no sign-out stage handled the request".to_string()))
    }
}

fn audit(event_type: EventType, ctx: &SignoutContext<'_>) {
    let mut event = Event::builder(event_type).success();
    if let Some(subject) = &ctx.subject {
        event = event.user(subject.as_str());
    }
    if let Some(client_id) = &ctx.client_id {
        event = event.client(client_id.as_str());
    }
    if let Some(uri) = ctx.post_logout_redirect_uri {
        event = event.detail("post_logout_redirect_uri", uri);
    }
    event.emit();
}
