//! Common test utilities and fixtures.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use idp_crypto::SignatureAlgorithm;
use idp_model::{Client, User};
use idp_protocol_oidc::JwtIdTokenDecoder;
use idp_server::{create_router, AppState, ServerConfig, StorageProviders};
use idp_session::{SessionProvider, UserSession};
use idp_storage::ConsentRecord;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

/// Key signing ID token hints accepted by the server.
pub const PRIVATE_KEY: &str = include_str!("../testdata/es384_private.pem");
/// Verification key configured on the server.
pub const PUBLIC_KEY: &str = include_str!("../testdata/es384_public.pem");

/// Path of the verification key on disk.
pub fn public_key_path() -> String {
    format!("{}/testdata/es384_public.pem", env!("CARGO_MANIFEST_DIR"))
}

/// Test environment around an in-process router.
pub struct TestEnv {
    /// Stores behind the router.
    pub providers: Arc<StorageProviders>,
    /// Configuration the router was built with.
    pub config: ServerConfig,
    router: Router,
}

impl TestEnv {
    /// Creates an environment with the default test configuration.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(ServerConfig::for_testing(&public_key_path()))
    }

    /// Creates an environment with a custom configuration.
    pub fn with_config(config: ServerConfig) -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("idp=debug,idp_protocol_oidc=debug,idp_server=debug")
            .with_test_writer()
            .try_init();

        let decoder = JwtIdTokenDecoder::from_pem(SignatureAlgorithm::Es384, PUBLIC_KEY.as_bytes())?;
        let providers = Arc::new(StorageProviders::new());
        let state = AppState::new(config.clone(), providers.clone(), Arc::new(decoder));

        Ok(Self {
            router: create_router(state),
            providers,
            config,
        })
    }

    /// Registers a client.
    pub async fn create_client(&self, client: Client) -> anyhow::Result<()> {
        self.providers.clients.insert(client).await?;
        Ok(())
    }

    /// Creates a user with an active session.
    pub async fn sign_in(&self, user: User) -> anyhow::Result<UserSession> {
        let session = UserSession::new(user.id.clone());
        self.providers.users.insert(user).await?;
        self.providers.sessions.create_user_session(&session).await?;
        Ok(session)
    }

    /// Records that `subject_id` has consented to `client_id`.
    pub async fn grant_consent(&self, subject_id: &str, client_id: &str) {
        self.providers
            .consents
            .grant(ConsentRecord::new(subject_id, client_id, ["openid"]))
            .await;
    }

    /// Returns whether the session still exists.
    pub async fn session_exists(&self, session: &UserSession) -> anyhow::Result<bool> {
        Ok(self.providers.sessions.get_user_session(session.id).await?.is_some())
    }

    /// Sends a GET request, optionally with the session cookie.
    pub async fn get(&self, uri: &str, session: Option<&UserSession>) -> anyhow::Result<Response<Body>> {
        let request = self
            .request("GET", uri, session)
            .body(Body::empty())?;
        Ok(self.router.clone().oneshot(request).await?)
    }

    /// Sends a form POST, optionally with the session cookie.
    pub async fn post_form(
        &self,
        uri: &str,
        form: &[(&str, &str)],
        session: Option<&UserSession>,
    ) -> anyhow::Result<Response<Body>> {
        let body = encode(form);
        let request = self
            .request("POST", uri, session)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))?;
        Ok(self.router.clone().oneshot(request).await?)
    }

    fn request(
        &self,
        method: &str,
        uri: &str,
        session: Option<&UserSession>,
    ) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match session {
            Some(session) => builder.header(
                header::COOKIE,
                format!("{}={}", self.config.oidc().session_cookie, session.id),
            ),
            None => builder,
        }
    }
}

/// Signs an ID token hint with the test key.
pub fn sign_hint(claims: &Value) -> anyhow::Result<String> {
    let key = EncodingKey::from_ec_pem(PRIVATE_KEY.as_bytes())?;
    Ok(jsonwebtoken::encode(&Header::new(Algorithm::ES384), claims, &key)?)
}

/// Reads a response body as a string.
pub async fn body_string(response: Response<Body>) -> anyhow::Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> anyhow::Result<Value> {
    Ok(serde_json::from_str(&body_string(response).await?)?)
}

/// Returns the `Location` header.
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Builds a query string or form body.
pub fn encode(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}
