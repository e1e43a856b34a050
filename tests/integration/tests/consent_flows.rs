//! Consent flow integration tests.

use axum::http::{header, StatusCode};
use idp_model::{Client, User};
use idp_protocol_oidc::{SessionStateCalculator, Sha384SessionState};

use crate::common::{body_json, body_string, encode, location, TestEnv};

const REDIRECT_URI: &str = "https://rp.example/cb";

fn client() -> Client {
    Client::new("rp-1")
        .with_name("Example RP")
        .with_client_uri("https://rp.example/home")
        .with_redirect_uri(REDIRECT_URI)
}

fn user() -> User {
    User::new("sub-1", "alice").with_names("Alice", "Liddell")
}

fn authorize_uri(extra: &[(&str, &str)]) -> String {
    let mut params = vec![
        ("response_type", "code"),
        ("client_id", "rp-1"),
        ("redirect_uri", REDIRECT_URI),
        ("scope", "openid email"),
        ("state", "xyz"),
    ];
    params.extend_from_slice(extra);
    format!("/authorize?{}", encode(&params))
}

#[tokio::test]
async fn test_trusted_client_skips_consent() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client().trusted()).await?;
    let session = env.sign_in(user()).await?;

    let response = env.get(&authorize_uri(&[]), Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let grant = body_json(response).await?;
    assert_eq!(grant["client_id"], "rp-1");
    assert_eq!(grant["subject"], "sub-1");
    assert_eq!(grant["state"], "xyz");
    assert_eq!(grant["scope"], serde_json::json!(["openid", "email"]));
    Ok(())
}

#[tokio::test]
async fn test_prior_consent_is_reused() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;
    env.grant_consent("sub-1", "rp-1").await;

    let response = env.get(&authorize_uri(&[]), Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let grant = body_json(response).await?;
    assert_eq!(grant["subject"], "sub-1");
    Ok(())
}

#[tokio::test]
async fn test_missing_consent_renders_prompt() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let response = env.get(&authorize_uri(&[]), Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_string(response).await?;
    assert!(html.contains("Example RP"));
    assert!(html.contains("Alice Liddell"));
    assert!(html.contains(r#"name="authorize" value="true""#));
    assert!(html.contains("Access your email address"));
    Ok(())
}

#[tokio::test]
async fn test_prompt_none_without_consent_redirects_with_error() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let client = client();
    env.create_client(client.clone()).await?;
    let session = env.sign_in(user()).await?;

    let response = env
        .get(&authorize_uri(&[("prompt", "none")]), Some(&session))
        .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    let expected_state = Sha384SessionState.calculate(&client, &session.opbs);
    assert_eq!(
        location(&response).as_deref(),
        Some(
            format!(
                "{REDIRECT_URI}?error=consent_required&state=xyz&session_state={expected_state}"
            )
            .as_str()
        )
    );
    Ok(())
}

#[tokio::test]
async fn test_prompt_none_implicit_flow_uses_fragment() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let uri = format!(
        "/authorize?{}",
        encode(&[
            ("response_type", "id_token token"),
            ("client_id", "rp-1"),
            ("redirect_uri", REDIRECT_URI),
            ("scope", "openid"),
            ("prompt", "none"),
        ])
    );
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = location(&response).unwrap_or_default();
    assert!(location.starts_with(&format!("{REDIRECT_URI}#error=consent_required&session_state=")));
    Ok(())
}

#[tokio::test]
async fn test_prompt_none_without_redirect_uri_is_invalid() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let uri = format!(
        "/authorize?{}",
        encode(&[("response_type", "code"), ("client_id", "rp-1"), ("prompt", "none")])
    );
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await?;
    assert_eq!(error["error"], "invalid_request");
    Ok(())
}

#[tokio::test]
async fn test_consent_approval_completes_request() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let response = env
        .post_form(
            "/authorize",
            &[
                ("response_type", "code"),
                ("client_id", "rp-1"),
                ("redirect_uri", REDIRECT_URI),
                ("scope", "openid"),
                ("state", "xyz"),
                ("code_challenge", "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"),
                ("code_challenge_method", "S256"),
                ("max_age", "later"),
                ("authorize", "true"),
            ],
            Some(&session),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let grant = body_json(response).await?;
    assert_eq!(grant["client_id"], "rp-1");
    assert_eq!(grant["redirect_uri"], REDIRECT_URI);
    assert_eq!(grant["code_challenge_method"], "S256");
    assert!(grant.get("max_age").is_none());
    Ok(())
}

#[tokio::test]
async fn test_consent_denial_redirects_with_access_denied() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let response = env
        .post_form(
            "/authorize",
            &[
                ("response_type", "code"),
                ("client_id", "rp-1"),
                ("redirect_uri", REDIRECT_URI),
                ("state", "xyz"),
                ("authorize", "false"),
            ],
            Some(&session),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://rp.example/cb?error=access_denied&state=xyz")
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_session_requires_login() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;

    let response = env.get(&authorize_uri(&[]), None).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await?;
    assert_eq!(error["error"], "login_required");
    Ok(())
}

#[tokio::test]
async fn test_unknown_client_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let session = env.sign_in(user()).await?;

    let response = env.get(&authorize_uri(&[]), Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = body_json(response).await?;
    assert_eq!(error["error"], "invalid_client");
    Ok(())
}

#[tokio::test]
async fn test_resumed_request_without_consent_goes_to_authorize() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let uri = authorize_uri(&[("display", "dialog"), ("provider", "google")])
        .replacen("/authorize", &env.config.oidc().resume_path, 1);
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = location(&response).unwrap_or_default();
    let (path, query) = location.split_once('?').unwrap_or_default();
    assert_eq!(path, "/authorize");

    let forwarded: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
    let value = |name: &str| {
        forwarded
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(value("client_id"), Some("rp-1"));
    assert_eq!(value("state"), Some("xyz"));
    assert_eq!(value("display"), Some("dialog"));
    assert_eq!(value("provider"), Some("google"));
    assert_eq!(value("authorize"), None);
    Ok(())
}

#[tokio::test]
async fn test_resumed_request_for_trusted_client_completes() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client().trusted()).await?;
    let session = env.sign_in(user()).await?;

    let uri = authorize_uri(&[]).replacen("/authorize", &env.config.oidc().resume_path, 1);
    let response = env.get(&uri, Some(&session)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let grant = body_json(response).await?;
    assert_eq!(grant["client_id"], "rp-1");
    Ok(())
}

#[tokio::test]
async fn test_consent_form_carries_unknown_parameters() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.create_client(client()).await?;
    let session = env.sign_in(user()).await?;

    let response = env
        .get(&authorize_uri(&[("max_age", "soon"), ("provider", "google")]), Some(&session))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await?;
    assert!(html.contains(r#"name="provider" value="google""#));
    assert!(html.contains(r#"name="max_age" value="soon""#));
    Ok(())
}
