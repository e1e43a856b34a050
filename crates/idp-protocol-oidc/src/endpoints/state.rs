//! Shared state for OIDC endpoints.

use std::sync::Arc;

use idp_session::SessionProvider;

use crate::consent::{ConsentPrompt, ConsentResolver};
use crate::error::OidcResult;
use crate::signout::SignoutCoordinator;

/// Renders the interactive consent page.
///
/// Implement this trait in the host application with its template engine.
pub trait ConsentView: Send + Sync {
    /// Renders the consent page as HTML.
    ///
    /// ## Errors
    ///
    /// Returns an error if the template fails to render.
    fn render(&self, prompt: &ConsentPrompt) -> OidcResult<String>;
}

/// Shared state for OIDC endpoints.
#[derive(Clone)]
pub struct OidcState {
    /// Consent resolver for the authorize pipeline.
    pub consent: Arc<ConsentResolver>,
    /// Sign-out coordinator.
    pub signout: Arc<SignoutCoordinator>,
    /// Session store used to end sessions.
    pub sessions: Arc<dyn SessionProvider>,
    /// Consent page renderer.
    pub consent_view: Arc<dyn ConsentView>,
    /// Name of the session cookie.
    pub session_cookie: String,
}

impl OidcState {
    /// Creates a new OIDC state.
    pub fn new(
        consent: ConsentResolver,
        signout: SignoutCoordinator,
        sessions: Arc<dyn SessionProvider>,
        consent_view: Arc<dyn ConsentView>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            consent: Arc::new(consent),
            signout: Arc::new(signout),
            sessions,
            consent_view,
            session_cookie: session_cookie.into(),
        }
    }
}
