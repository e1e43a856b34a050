//! Sign-out flow integration tests.

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use idp_model::{Client, User};
use idp_server::{Server, ServerConfig};
use idp_session::UserSession;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{encode, location, public_key_path, sign_hint, TestEnv};

const LOGOUT_URI: &str = "https://rp.example/logged-out";

async fn env_with_session() -> anyhow::Result<(TestEnv, UserSession)> {
    let env = TestEnv::new()?;
    env.create_client(Client::new("rp-1").with_post_logout_redirect_uri(LOGOUT_URI))
        .await?;
    let session = env.sign_in(User::new("sub-1", "alice")).await?;
    Ok((env, session))
}

fn signed_hint() -> anyhow::Result<String> {
    sign_hint(&json!({ "iss": "https://op.example", "sub": "sub-1", "aud": "rp-1" }))
}

fn clears_cookie(response: &Response<Body>, name: &str) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&format!("{name}=")) && v.contains("Max-Age=0"))
}

#[tokio::test]
async fn test_registered_redirect_ends_session() -> anyhow::Result<()> {
    let (env, session) = env_with_session().await?;

    let hint = signed_hint()?;
    let uri = format!(
        "/signout?{}",
        encode(&[
            ("id_token_hint", hint.as_str()),
            ("post_logout_redirect_uri", LOGOUT_URI),
            ("state", "s1"),
        ])
    );
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://rp.example/logged-out?state=s1")
    );
    assert!(clears_cookie(&response, &env.config.oidc().session_cookie));
    assert!(!env.session_exists(&session).await?);
    Ok(())
}

#[tokio::test]
async fn test_unregistered_redirect_falls_back_to_no_content() -> anyhow::Result<()> {
    let (env, session) = env_with_session().await?;

    let hint = signed_hint()?;
    let uri = format!(
        "/signout?{}",
        encode(&[
            ("id_token_hint", hint.as_str()),
            ("post_logout_redirect_uri", "https://evil.example/"),
        ])
    );
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(location(&response).is_none());
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    assert!(!env.session_exists(&session).await?);
    Ok(())
}

#[tokio::test]
async fn test_unsendable_state_falls_back_to_no_content() -> anyhow::Result<()> {
    let (env, session) = env_with_session().await?;

    let hint = signed_hint()?;
    let uri = format!(
        "/signout?{}",
        encode(&[
            ("id_token_hint", hint.as_str()),
            ("post_logout_redirect_uri", LOGOUT_URI),
            ("state", "a\nb"),
        ])
    );
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(location(&response).is_none());
    assert!(clears_cookie(&response, &env.config.oidc().session_cookie));
    assert!(!env.session_exists(&session).await?);
    Ok(())
}

#[tokio::test]
async fn test_signout_without_hint_ends_session() -> anyhow::Result<()> {
    let (env, session) = env_with_session().await?;

    let uri = format!("/signout?{}", encode(&[("post_logout_redirect_uri", LOGOUT_URI)]));
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!env.session_exists(&session).await?);
    Ok(())
}

#[tokio::test]
async fn test_forged_hint_keeps_session() -> anyhow::Result<()> {
    let (env, session) = env_with_session().await?;

    let uri = format!(
        "/signout?{}",
        encode(&[("id_token_hint", "not.a.jwt"), ("post_logout_redirect_uri", LOGOUT_URI)])
    );
    let response = env.get(&uri, Some(&session)).await?;

    assert!(response.status().is_server_error());
    assert!(location(&response).is_none());
    assert!(env.session_exists(&session).await?);
    Ok(())
}

#[tokio::test]
async fn test_signout_form_post() -> anyhow::Result<()> {
    let (env, session) = env_with_session().await?;

    let hint = signed_hint()?;
    let response = env
        .post_form(
            "/signout",
            &[("id_token_hint", hint.as_str()), ("post_logout_redirect_uri", LOGOUT_URI)],
            Some(&session),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some(LOGOUT_URI));
    assert!(!env.session_exists(&session).await?);
    Ok(())
}

#[tokio::test]
async fn test_server_loads_key_from_config() -> anyhow::Result<()> {
    let server = Server::new(ServerConfig::for_testing(&public_key_path())).await?;
    server
        .state()
        .providers
        .clients
        .insert(Client::new("rp-1").with_post_logout_redirect_uri(LOGOUT_URI))
        .await?;

    let hint = signed_hint()?;
    let request = Request::builder()
        .uri(format!(
            "/signout?{}",
            encode(&[("id_token_hint", hint.as_str()), ("post_logout_redirect_uri", LOGOUT_URI)])
        ))
        .body(Body::empty())?;
    let response = server.router().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some(LOGOUT_URI));
    Ok(())
}

#[tokio::test]
async fn test_server_rejects_missing_key_file() {
    let config = ServerConfig::for_testing("/nonexistent/key.pem");
    assert!(Server::new(config).await.is_err());
}
