//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use idp_protocol_oidc::{oidc_router, prompt_to_authorize};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authorize::{authorization_context, complete_authorization};
use crate::state::AppState;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let oidc = state.config.oidc();
    let authorize_path = oidc.authorize_path.clone();
    let resume_path = oidc.resume_path.clone();
    let signout_path = oidc.signout_path.clone();

    // Layers run outermost first: the context is built, then consent resolved.
    // A request resumed after sign-in that still needs consent is sent on to
    // the authorize path.
    let authorize = Router::new()
        .route(
            &authorize_path,
            get(complete_authorization).post(complete_authorization),
        )
        .route(&resume_path, get(complete_authorization))
        .route_layer(middleware::from_fn_with_state(
            state.oidc_state(),
            prompt_to_authorize,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authorization_context,
        ));

    let signout = oidc_router(&signout_path).with_state(state.oidc_state());

    // Create health check routes
    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check));

    Router::new()
        .merge(authorize)
        .merge(signout)
        .merge(health)
        .route("/", get(root))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
}

/// Builds the CORS layer from the configured origins.
///
/// `*` allows any origin; entries that are not valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> Json<ServerInfo> {
    Json(ServerInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Server information response.
#[derive(Serialize)]
pub struct ServerInfo {
    name: String,
    version: String,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Kubernetes liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe.
///
/// The stores are in memory, so the server is ready once it listens.
async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
