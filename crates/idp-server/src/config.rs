//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use idp_core::{Config, OidcConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener and protocol settings shared with the library crates.
    pub core: Config,

    /// Path to a JSON file seeding clients, users, consents and sessions.
    pub fixtures_path: Option<String>,

    /// CORS allowed origins (comma-separated).
    pub cors_origins: Vec<String>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// `IDP_ID_TOKEN_PUBLIC_KEY` is required.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut core = Config::default();

        core.server.host = std::env::var("IDP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        core.server.port = std::env::var("IDP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        core.server.base_url = std::env::var("IDP_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", core.server.host, core.server.port));

        let defaults = OidcConfig::default();
        core.oidc = OidcConfig {
            authorize_path: std::env::var("IDP_AUTHORIZE_PATH")
                .unwrap_or(defaults.authorize_path),
            resume_path: std::env::var("IDP_RESUME_PATH").unwrap_or(defaults.resume_path),
            signout_path: std::env::var("IDP_SIGNOUT_PATH").unwrap_or(defaults.signout_path),
            session_cookie: std::env::var("IDP_SESSION_COOKIE")
                .unwrap_or(defaults.session_cookie),
            id_token_algorithm: std::env::var("IDP_ID_TOKEN_ALGORITHM")
                .map(|alg| alg.to_uppercase())
                .unwrap_or(defaults.id_token_algorithm),
            id_token_public_key_path: Some(std::env::var("IDP_ID_TOKEN_PUBLIC_KEY").map_err(
                |_| anyhow::anyhow!("IDP_ID_TOKEN_PUBLIC_KEY environment variable is required"),
            )?),
            id_token_issuer: std::env::var("IDP_ID_TOKEN_ISSUER")
                .ok()
                .filter(|iss| !iss.is_empty()),
        };
        core.oidc.validate()?;

        let fixtures_path = std::env::var("IDP_FIXTURES").ok().filter(|p| !p.is_empty());

        let cors_origins = std::env::var("IDP_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            core,
            fixtures_path,
            cors_origins,
            log_level,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(public_key_path: &str) -> Self {
        let mut core = Config::default();
        core.server.host = "127.0.0.1".to_string();
        core.server.port = 0; // Random port
        core.oidc.id_token_public_key_path = Some(public_key_path.to_string());

        Self {
            core,
            fixtures_path: None,
            cors_origins: vec!["*".to_string()],
            log_level: "debug".to_string(),
        }
    }

    /// Returns the OIDC protocol settings.
    #[must_use]
    pub const fn oidc(&self) -> &OidcConfig {
        &self.core.oidc
    }

    /// Returns the `host:port` address to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.core.server.host, self.core.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            core: Config::default(),
            fixtures_path: None,
            cors_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}
