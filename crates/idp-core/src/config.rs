//! Configuration management.
//!
//! The server crate populates these structures from environment variables;
//! they are plain serde types so they can also be loaded from files.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Signature algorithms accepted for ID token hints.
///
/// ES256, RS256 and PS256 are not accepted.
pub const SUPPORTED_ID_TOKEN_ALGORITHMS: &[&str] = &["ES384", "RS384", "RS512", "PS384", "PS512"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// OIDC protocol configuration.
    pub oidc: OidcConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Base URL for the server.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// OIDC protocol configuration for the consent and sign-out endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Canonical path of the authorization endpoint.
    ///
    /// Consent is rendered only when the request arrives on this path;
    /// requests on any other path are redirected here.
    pub authorize_path: String,
    /// Path where an authorization request resumes after sign-in.
    ///
    /// Runs the same consent step as the authorize path, so a request that
    /// still needs consent is sent on to `authorize_path`.
    pub resume_path: String,
    /// Path of the RP-initiated sign-out endpoint.
    pub signout_path: String,
    /// Name of the cookie carrying the user session ID.
    pub session_cookie: String,
    /// JWA name of the algorithm used to sign ID tokens.
    pub id_token_algorithm: String,
    /// Path to the PEM encoded public key verifying ID token hints.
    pub id_token_public_key_path: Option<String>,
    /// Expected issuer of ID token hints, if enforced.
    pub id_token_issuer: Option<String>,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            authorize_path: "/authorize".to_string(),
            resume_path: "/login/resume".to_string(),
            signout_path: "/signout".to_string(),
            session_cookie: "idp.sid".to_string(),
            id_token_algorithm: "ES384".to_string(),
            id_token_public_key_path: None,
            id_token_issuer: None,
        }
    }
}

impl OidcConfig {
    /// Validates the configured paths and algorithm.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("authorize_path", &self.authorize_path),
            ("resume_path", &self.resume_path),
            ("signout_path", &self.signout_path),
        ] {
            if !path.starts_with('/') {
                return Err(Error::Config(format!("{name} must start with '/': {path}")));
            }
        }

        if self.authorize_path == self.signout_path
            || self.authorize_path == self.resume_path
            || self.resume_path == self.signout_path
        {
            return Err(Error::Config(
                "authorize_path, resume_path and signout_path must differ".to_string(),
            ));
        }

        if self.session_cookie.trim().is_empty() {
            return Err(Error::Config("session_cookie must not be empty".to_string()));
        }

        if !SUPPORTED_ID_TOKEN_ALGORITHMS.contains(&self.id_token_algorithm.as_str()) {
            return Err(Error::Config(format!(
                "unsupported ID token algorithm: {}",
                self.id_token_algorithm
            )));
        }

        Ok(())
    }
}
