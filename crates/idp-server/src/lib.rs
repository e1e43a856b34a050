//! # idp-server
//!
//! Axum server for the identity provider's consent and sign-out endpoints.
//!
//! This crate wires together:
//! - The authorize pipeline (session context, consent resolution, hand-off)
//! - RP-initiated sign-out
//! - Health check endpoints
//!
//! ## Architecture
//!
//! Providers are injected at runtime. The binary runs on in-memory stores,
//! optionally seeded from a JSON fixtures file.
//!
//! ## Usage
//!
//! ```ignore
//! use idp_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authorize;
pub mod config;
pub mod providers;
pub mod router;
pub mod state;
pub mod ui;

pub use config::ServerConfig;
pub use providers::{Fixtures, StorageProviders};
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use idp_crypto::SignatureAlgorithm;
use idp_protocol_oidc::JwtIdTokenDecoder;
use tokio::net::TcpListener;

/// The identity provider server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// Loads the ID token verification key and the fixtures file, if any.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let oidc = config.oidc();

        let key_path = oidc
            .id_token_public_key_path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("ID token public key path is not configured"))?;
        let pem = tokio::fs::read(key_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read ID token public key {key_path}: {e}"))?;

        let algorithm: SignatureAlgorithm = oidc.id_token_algorithm.parse()?;
        let mut decoder = JwtIdTokenDecoder::from_pem(algorithm, &pem)?;
        if let Some(issuer) = &oidc.id_token_issuer {
            decoder = decoder.with_issuer(issuer);
        }

        tracing::info!(algorithm = %algorithm, "ID token hint verification key loaded");

        let providers = StorageProviders::new();
        if let Some(path) = &config.fixtures_path {
            providers.seed(Fixtures::load(path).await?).await?;
        }

        let state = AppState::new(config.clone(), Arc::new(providers), Arc::new(decoder));

        Ok(Self { config, state })
    }

    /// Runs the server.
    ///
    /// This starts the HTTP server and blocks until it receives a shutdown signal.
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();

        // Bind to address
        let addr: SocketAddr = self.config.bind_address().parse()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on http://{}", addr);

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the shared application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router without starting the server.
    ///
    /// This is useful for integration testing.
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
