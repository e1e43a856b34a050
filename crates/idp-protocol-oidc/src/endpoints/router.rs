//! OIDC router configuration.

use axum::{routing::get, Router};

use super::signout::{signout_get, signout_post};
use super::state::OidcState;

/// Creates the OIDC protocol router.
///
/// | Method | Path            | Handler        |
/// |--------|-----------------|----------------|
/// | GET    | `signout_path`  | `signout_get`  |
/// | POST   | `signout_path`  | `signout_post` |
///
/// The authorization endpoint is assembled by the host: it needs the host's
/// authentication layer in front of [`super::prompt_to_authorize`].
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(oidc_router("/signout"))
///     .with_state(oidc_state);
/// ```
pub fn oidc_router(signout_path: &str) -> Router<OidcState> {
    Router::new().route(signout_path, get(signout_get).post(signout_post))
}
