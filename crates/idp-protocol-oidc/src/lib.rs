//! # idp-protocol-oidc
//!
//! `OpenID` Connect request-time decisions for the identity provider:
//!
//! - Consent resolution for authorization requests ([`ConsentResolver`])
//! - RP-initiated sign-out ([`SignoutCoordinator`])
//!
//! ## Modules
//!
//! - [`claims`] - claims read from ID token hints
//! - [`consent`] - consent policy and resolver
//! - [`endpoints`] - Axum middleware and handlers
//! - [`error`] - OIDC error types following RFC 6749
//! - [`request`] - authorization and end-session request types
//! - [`session_state`] - session management fingerprints
//! - [`signout`] - sign-out stages and coordinator
//! - [`token`] - ID token hint verification
//! - [`types`] - prompt, response separator and consent decision types
//!
//! ## Signature algorithms
//!
//! ID token hints are verified with ES384, RS384, RS512, PS384 or PS512.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod claims;
pub mod consent;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod session_state;
pub mod signout;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use claims::{Audience, IdTokenHintClaims};
pub use consent::{
    AuthorizationContext, ConsentOutcome, ConsentPolicy, ConsentPrompt, ConsentResolver,
    ExistingConsentPolicy,
};
pub use endpoints::{oidc_router, prompt_to_authorize, ConsentView, OidcState};
pub use error::{ErrorResponse, OidcError, OidcResult};
pub use request::{AuthorizationRequest, EndSessionRequest};
pub use session_state::{SessionStateCalculator, Sha384SessionState};
pub use signout::{SessionTerminator, SignoutCoordinator, SignoutResponse, SignoutStage, StageOutcome};
pub use token::{IdTokenHintDecoder, JwtIdTokenDecoder};
pub use types::{response_separator, ConsentDecision, Prompt, ResponseSeparator};
