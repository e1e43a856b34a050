//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.

use std::sync::Arc;

use idp_protocol_oidc::{
    ConsentResolver, ExistingConsentPolicy, IdTokenHintDecoder, OidcState, Sha384SessionState,
    SignoutCoordinator,
};

use crate::config::ServerConfig;
use crate::providers::StorageProviders;
use crate::ui::AskamaConsentView;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// Storage providers.
    pub providers: Arc<StorageProviders>,

    /// State for the OIDC middleware and endpoints.
    pub oidc: OidcState,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: ServerConfig,
        providers: Arc<StorageProviders>,
        id_token_decoder: Arc<dyn IdTokenHintDecoder>,
    ) -> Self {
        let oidc_config = config.oidc();

        let consent = ConsentResolver::new(
            Arc::new(ExistingConsentPolicy::new(providers.consents.clone())),
            Arc::new(Sha384SessionState),
            oidc_config.authorize_path.clone(),
        );
        let signout = SignoutCoordinator::new(providers.clients.clone(), id_token_decoder);
        let consent_view = Arc::new(AskamaConsentView::new(oidc_config.authorize_path.clone()));

        let oidc = OidcState::new(
            consent,
            signout,
            providers.sessions.clone(),
            consent_view,
            oidc_config.session_cookie.clone(),
        );

        Self {
            config,
            providers,
            oidc,
        }
    }

    /// Gets the OIDC state for the protocol endpoints.
    #[must_use]
    pub fn oidc_state(&self) -> OidcState {
        self.oidc.clone()
    }
}
