//! OIDC session management `session_state` values.
//!
//! The fingerprint binds a client, the origin it runs on and the browser
//! state of the user's session, so a relying party can detect session
//! changes without a round trip.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use idp_model::Client;
use url::Url;

/// Computes `session_state` values.
pub trait SessionStateCalculator: Send + Sync {
    /// Returns the fingerprint for `client` and the browser state `opbs`.
    fn calculate(&self, client: &Client, opbs: &str) -> String;
}

/// Default calculator: `base64url(SHA-384(client_id " " origin " " opbs))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha384SessionState;

impl SessionStateCalculator for Sha384SessionState {
    fn calculate(&self, client: &Client, opbs: &str) -> String {
        let origin = client_origin(client.client_uri.as_deref());
        let input = format!("{} {} {}", client.id, origin, opbs);
        URL_SAFE_NO_PAD.encode(idp_crypto::sha384(input.as_bytes()))
    }
}

/// Derives the origin of a client URI.
///
/// Falls back to the raw value when it has no tuple origin and to an empty
/// string when the client has no URI.
fn client_origin(client_uri: Option<&str>) -> String {
    let Some(raw) = client_uri else {
        return String::new();
    };

    match Url::parse(raw) {
        Ok(url) if url.origin().is_tuple() => url.origin().ascii_serialization(),
        _ => raw.to_string(),
    }
}
