//! Authorization endpoint pipeline.
//!
//! Requests on the authorize path pass through three layers:
//!
//! 1. [`authorization_context`] identifies the session, user and client and
//!    stores an [`AuthorizationContext`] in the request extensions.
//! 2. `prompt_to_authorize` resolves consent.
//! 3. [`complete_authorization`] hands the decided request to issuance.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use idp_protocol_oidc::consent::build_error_location;
use idp_protocol_oidc::endpoints::session_id_from_cookie;
use idp_protocol_oidc::types::CodeChallengeMethod;
use idp_protocol_oidc::{
    AuthorizationContext, AuthorizationRequest, ConsentDecision, OidcError, OidcResult,
};
use idp_session::{SessionProvider, UserSession};
use idp_storage::{ClientProvider, UserProvider};
use serde::Serialize;

use crate::state::AppState;

/// Largest accepted form body on the authorize endpoint.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Builds the authorization context from the session cookie and request.
///
/// GET requests are read from the query string, POST requests from the
/// form body. The body is put back for later layers.
pub async fn authorization_context(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    match load_context(&state, &jar, request).await {
        Ok(request) => next.run(request).await,
        Err(err) => {
            tracing::debug!(error = %err, "Authorization request rejected");
            err.into_response()
        }
    }
}

async fn load_context(state: &AppState, jar: &CookieJar, request: Request) -> OidcResult<Request> {
    let (params, mut request) = read_params(request).await?;

    let session_id = session_id_from_cookie(jar, &state.oidc.session_cookie)
        .ok_or(OidcError::LoginRequired)?;
    let session = state
        .providers
        .sessions
        .get_user_session(session_id)
        .await?
        .filter(UserSession::is_active)
        .ok_or(OidcError::LoginRequired)?;

    let client = state
        .providers
        .clients
        .get_by_client_id(&params.client_id)
        .await?
        .ok_or_else(|| OidcError::InvalidClient(format!("unknown client: {}", params.client_id)))?;

    let user = state
        .providers
        .users
        .get_by_id(&session.user_id)
        .await?
        .ok_or(OidcError::LoginRequired)?;

    request.extensions_mut().insert(AuthorizationContext {
        request: params,
        client,
        user,
        opbs: Some(session.opbs),
    });

    Ok(request)
}

async fn read_params(request: Request) -> OidcResult<(AuthorizationRequest, Request)> {
    if request.method() == Method::POST {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_FORM_BYTES)
            .await
            .map_err(|e| OidcError::InvalidRequest(format!("unreadable form body: {e}")))?;
        let params = parse_params(&bytes)?;
        Ok((params, Request::from_parts(parts, Body::from(bytes))))
    } else {
        let params = parse_params(request.uri().query().unwrap_or_default().as_bytes())?;
        Ok((params, request))
    }
}

fn parse_params(raw: &[u8]) -> OidcResult<AuthorizationRequest> {
    serde_urlencoded::from_bytes(raw)
        .map_err(|e| OidcError::InvalidRequest(format!("malformed authorization request: {e}")))
}

/// Hand-off record for the issuance stage.
#[derive(Debug, Serialize)]
pub struct AuthorizationGrant {
    /// Client the grant is for.
    pub client_id: String,
    /// Authorized subject.
    pub subject: String,
    /// Requested scopes.
    pub scope: Vec<String>,
    /// Response type to issue.
    pub response_type: String,
    /// Where the response goes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    /// Client state to echo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Nonce for the ID token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// PKCE challenge to check at the token endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<String>,
    /// PKCE method, present only when it is a supported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge_method: Option<CodeChallengeMethod>,
    /// Maximum authentication age in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
}

/// Terminal handler of the authorize pipeline.
///
/// - `Authorized`: returns the grant as JSON.
/// - `Declined`: redirects back to the client with `error=access_denied`.
pub async fn complete_authorization(Extension(ctx): Extension<AuthorizationContext>) -> Response {
    let AuthorizationContext {
        request, client, user, ..
    } = ctx;

    match request.authorize {
        ConsentDecision::Authorized => {
            tracing::info!(client_id = %client.id, user_id = %user.id, "Authorization request approved");
            Json(AuthorizationGrant {
                scope: request.scopes().into_iter().map(String::from).collect(),
                code_challenge_method: request.code_challenge_method(),
                max_age: request.max_age(),
                client_id: client.id,
                subject: user.id,
                response_type: request.response_type,
                redirect_uri: request.redirect_uri,
                state: request.state,
                nonce: request.nonce,
                code_challenge: request.code_challenge,
            })
            .into_response()
        }
        ConsentDecision::Declined => {
            tracing::info!(client_id = %client.id, user_id = %user.id, "Consent declined");
            let Some(redirect_uri) = request.redirect_uri.as_deref() else {
                return OidcError::AccessDenied("consent declined".to_string()).into_response();
            };

            let mut params = vec![("error", "access_denied")];
            if let Some(state) = request.state.as_deref() {
                params.push(("state", state));
            }
            let location = build_error_location(redirect_uri, &request, &params);
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        ConsentDecision::Unresolved => {
            OidcError::Internal("consent was not resolved".to_string()).into_response()
        }
    }
}
