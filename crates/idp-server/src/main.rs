//! # idp-server
//!
//! Main entry point for the identity provider server.

#![forbid(unsafe_code)]

use idp_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        authorize_path = %config.oidc().authorize_path,
        resume_path = %config.oidc().resume_path,
        signout_path = %config.oidc().signout_path,
        "Identity provider starting"
    );

    Server::new(config).await?.run().await
}
