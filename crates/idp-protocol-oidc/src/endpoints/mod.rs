//! OIDC endpoint handlers for Axum.
//!
//! - [`prompt_to_authorize`] - consent middleware for the authorize pipeline
//! - [`signout_get`] / [`signout_post`] - RP-initiated logout
//!
//! ## Router Setup
//!
//! ```rust,ignore
//! use idp_protocol_oidc::endpoints::{oidc_router, prompt_to_authorize};
//!
//! let app = Router::new()
//!     .route("/authorize", get(finish).post(finish))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), prompt_to_authorize))
//!     .merge(oidc_router("/signout"))
//!     .with_state(state);
//! ```

mod authorization;
mod router;
mod signout;
mod state;

pub use authorization::prompt_to_authorize;
pub use router::oidc_router;
pub use signout::{session_id_from_cookie, signout_get, signout_post};
pub use state::{ConsentView, OidcState};
