//! Consent step of the authorization endpoint.
//!
//! [`prompt_to_authorize`] is an axum middleware placed in front of the
//! handler that completes an authorization request. The authentication
//! layer must have stored an [`AuthorizationContext`] in the request
//! extensions.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::consent::{AuthorizationContext, ConsentOutcome};
use crate::error::OidcError;

use super::state::OidcState;

/// Resolves consent before the next handler runs.
///
/// - Authorized / already decided: the updated context is put back into the
///   request extensions and the next handler runs.
/// - Error redirect and redirect to authorize: `302 Found`.
/// - Consent needed: the consent page is rendered.
pub async fn prompt_to_authorize(
    State(state): State<OidcState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(mut ctx) = request.extensions_mut().remove::<AuthorizationContext>() else {
        return OidcError::Internal("authorization context missing".to_string()).into_response();
    };

    let path = request.uri().path().to_string();

    match state.consent.resolve(&mut ctx, &path).await {
        Ok(ConsentOutcome::Authorized | ConsentOutcome::Proceed) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Ok(
            ConsentOutcome::ErrorRedirect { location }
            | ConsentOutcome::RedirectToAuthorize { location },
        ) => found(location),
        Ok(ConsentOutcome::RenderConsent(prompt)) => match state.consent_view.render(&prompt) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, client_id = %prompt.client.id, "Consent page render failed");
                err.into_response()
            }
        },
        Err(err) => err.into_response(),
    }
}

/// Builds a `302 Found` redirect.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
