//! End-session endpoint handlers.
//!
//! GET reads the parameters from the query string, POST from a form body.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use idp_session::SessionProvider;
use uuid::Uuid;

use crate::error::OidcResult;
use crate::request::EndSessionRequest;
use crate::signout::{SessionTerminator, SignoutResponse};

use super::state::OidcState;

/// GET end-session endpoint.
pub async fn signout_get(
    State(state): State<OidcState>,
    jar: CookieJar,
    Query(request): Query<EndSessionRequest>,
) -> Response {
    handle_signout(&state, jar, &request).await
}

/// POST end-session endpoint.
pub async fn signout_post(
    State(state): State<OidcState>,
    jar: CookieJar,
    Form(request): Form<EndSessionRequest>,
) -> Response {
    handle_signout(&state, jar, &request).await
}

async fn handle_signout(state: &OidcState, jar: CookieJar, request: &EndSessionRequest) -> Response {
    let terminator = SessionCookieTerminator {
        sessions: Arc::clone(&state.sessions),
        session_id: session_id_from_cookie(&jar, &state.session_cookie),
    };

    match state.signout.sign_out(request, &terminator).await {
        Ok(SignoutResponse::Redirect { location }) => {
            (clear_session_cookie(jar, &state.session_cookie), Redirect::to(&location))
                .into_response()
        }
        Ok(SignoutResponse::NoContent) => (
            StatusCode::NO_CONTENT,
            [
                (header::CACHE_CONTROL, "no-store"),
                (header::PRAGMA, "no-cache"),
            ],
            clear_session_cookie(jar, &state.session_cookie),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Reads the user session ID from the session cookie.
///
/// Returns `None` if the cookie is missing or not a session ID.
#[must_use]
pub fn session_id_from_cookie(jar: &CookieJar, cookie_name: &str) -> Option<Uuid> {
    jar.get(cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn clear_session_cookie(jar: CookieJar, cookie_name: &str) -> CookieJar {
    jar.remove(Cookie::build((cookie_name.to_string(), "")).path("/"))
}

/// Ends the session named by the request's session cookie.
struct SessionCookieTerminator {
    sessions: Arc<dyn SessionProvider>,
    session_id: Option<Uuid>,
}

#[async_trait]
impl SessionTerminator for SessionCookieTerminator {
    async fn terminate(&self) -> OidcResult<()> {
        if let Some(session_id) = self.session_id {
            self.sessions.remove_user_session(session_id).await?;
            tracing::debug!(session_id = %session_id, "Session terminated");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request, Router};
    use idp_crypto::SignatureAlgorithm;
    use idp_model::Client;
    use idp_session::{InMemorySessionProvider, UserSession};
    use idp_storage::{InMemoryClientStore, InMemoryConsentStore};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::consent::{ConsentPrompt, ConsentResolver, ExistingConsentPolicy};
    use crate::endpoints::router::oidc_router;
    use crate::endpoints::state::ConsentView;
    use crate::session_state::Sha384SessionState;
    use crate::signout::SignoutCoordinator;
    use crate::token::test_support::{sign, PUBLIC_KEY};
    use crate::token::JwtIdTokenDecoder;

    struct NoView;

    impl ConsentView for NoView {
        fn render(&self, _prompt: &ConsentPrompt) -> OidcResult<String> {
            Ok(String::new())
        }
    }

    struct Fixture {
        app: Router,
        sessions: Arc<InMemorySessionProvider>,
        session: UserSession,
    }

    async fn fixture() -> Fixture {
        let clients = InMemoryClientStore::new();
        clients
            .insert(Client::new("rp-1").with_post_logout_redirect_uri("https://rp.example/bye"))
            .await
            .unwrap();

        let sessions = Arc::new(InMemorySessionProvider::new());
        let session = UserSession::new("sub-1");
        sessions.create_user_session(&session).await.unwrap();

        let decoder =
            JwtIdTokenDecoder::from_pem(SignatureAlgorithm::Es384, PUBLIC_KEY.as_bytes()).unwrap();

        let state = OidcState::new(
            ConsentResolver::new(
                Arc::new(ExistingConsentPolicy::new(Arc::new(InMemoryConsentStore::new()))),
                Arc::new(Sha384SessionState),
                "/authorize",
            ),
            SignoutCoordinator::new(Arc::new(clients), Arc::new(decoder)),
            sessions.clone(),
            Arc::new(NoView),
            "idp.sid",
        );

        Fixture {
            app: oidc_router("/signout").with_state(state),
            sessions,
            session,
        }
    }

    fn hint() -> String {
        sign(&json!({"sub": "sub-1", "aud": "rp-1"}))
    }

    fn with_cookie(builder: axum::http::request::Builder, session: &UserSession) -> axum::http::request::Builder {
        builder.header(header::COOKIE, format!("idp.sid={}", session.id))
    }

    #[tokio::test]
    async fn get_with_registered_uri_redirects_303() {
        let f = fixture().await;
        let uri = format!(
            "/signout?id_token_hint={}&post_logout_redirect_uri={}&state=xyz",
            hint(),
            urlencoding::encode("https://rp.example/bye")
        );
        let request = with_cookie(Request::builder().uri(uri), &f.session)
            .body(Body::empty())
            .unwrap();

        let response = f.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://rp.example/bye?state=xyz"
        );
        assert!(response.headers().contains_key(header::SET_COOKIE));
        assert!(f.sessions.get_user_session(f.session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_without_parameters_is_204_with_cache_headers() {
        let f = fixture().await;
        let request = with_cookie(Request::builder().uri("/signout"), &f.session)
            .body(Body::empty())
            .unwrap();

        let response = f.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
        assert!(!response.headers().contains_key(header::LOCATION));
        assert!(f.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn control_character_in_state_is_204() {
        let f = fixture().await;
        let uri = format!(
            "/signout?id_token_hint={}&post_logout_redirect_uri={}&state=a%0Ab",
            hint(),
            urlencoding::encode("https://rp.example/bye")
        );
        let request = with_cookie(Request::builder().uri(uri), &f.session)
            .body(Body::empty())
            .unwrap();

        let response = f.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!response.headers().contains_key(header::LOCATION));
        assert!(f.sessions.get_user_session(f.session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn post_form_is_supported() {
        let f = fixture().await;
        let body = format!(
            "id_token_hint={}&post_logout_redirect_uri={}",
            hint(),
            urlencoding::encode("https://rp.example/bye")
        );
        let request = with_cookie(Request::builder().method("POST").uri("/signout"), &f.session)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let response = f.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "https://rp.example/bye");
    }

    #[tokio::test]
    async fn invalid_hint_keeps_session() {
        let f = fixture().await;
        let request = with_cookie(
            Request::builder().uri("/signout?id_token_hint=garbage"),
            &f.session,
        )
        .body(Body::empty())
        .unwrap();

        let response = f.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(f.sessions.get_user_session(f.session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_cookie_leaves_sessions_untouched() {
        let f = fixture().await;
        let request = Request::builder().uri("/signout").body(Body::empty()).unwrap();

        let response = f.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!f.sessions.is_empty().await);
    }

    #[test]
    fn session_id_requires_uuid_cookie() {
        let id = Uuid::now_v7();
        let jar = CookieJar::new().add(Cookie::new("idp.sid", id.to_string()));
        assert_eq!(session_id_from_cookie(&jar, "idp.sid"), Some(id));

        let jar = CookieJar::new().add(Cookie::new("idp.sid", "not-a-uuid"));
        assert_eq!(session_id_from_cookie(&jar, "idp.sid"), None);
        assert_eq!(session_id_from_cookie(&CookieJar::new(), "idp.sid"), None);
    }
}
