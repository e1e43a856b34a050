//! ID token hint decoding.
//!
//! Sign-out requests identify the client through a previously issued ID
//! token. The hint must carry a valid signature from the provider's key, but
//! it may be expired and its audience is read rather than checked.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use idp_crypto::SignatureAlgorithm;

use crate::claims::IdTokenHintClaims;
use crate::error::{OidcError, OidcResult};

/// Decodes and verifies ID token hints.
pub trait IdTokenHintDecoder: Send + Sync {
    /// Verifies the token signature and returns its claims.
    ///
    /// ## Errors
    ///
    /// Returns `OidcError::TokenValidation` if the token is malformed,
    /// signed with another key or algorithm, or from an unexpected issuer.
    fn decode(&self, token: &str) -> OidcResult<IdTokenHintClaims>;
}

/// JWT decoder backed by a single public signature key.
pub struct JwtIdTokenDecoder {
    algorithm: SignatureAlgorithm,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtIdTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdTokenDecoder")
            .field("algorithm", &self.algorithm)
            .field("decoding_key", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtIdTokenDecoder {
    /// Creates a decoder from a PEM encoded public key.
    ///
    /// ## Errors
    ///
    /// Returns an error if the key cannot be parsed for the algorithm.
    pub fn from_pem(algorithm: SignatureAlgorithm, public_key_pem: &[u8]) -> OidcResult<Self> {
        let decoding_key = if algorithm.is_ecdsa() {
            DecodingKey::from_ec_pem(public_key_pem)
        } else {
            DecodingKey::from_rsa_pem(public_key_pem)
        }
        .map_err(|e| OidcError::TokenValidation(e.to_string()))?;

        Ok(Self {
            algorithm,
            decoding_key,
            issuer: None,
        })
    }

    /// Requires hints to carry this issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Returns the `jsonwebtoken` algorithm.
    const fn jwt_algorithm(&self) -> Algorithm {
        match self.algorithm {
            SignatureAlgorithm::Es384 => Algorithm::ES384,
            SignatureAlgorithm::Rs384 => Algorithm::RS384,
            SignatureAlgorithm::Rs512 => Algorithm::RS512,
            SignatureAlgorithm::Ps384 => Algorithm::PS384,
            SignatureAlgorithm::Ps512 => Algorithm::PS512,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.jwt_algorithm());
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

impl IdTokenHintDecoder for JwtIdTokenDecoder {
    fn decode(&self, token: &str) -> OidcResult<IdTokenHintClaims> {
        let token_data = decode::<IdTokenHintClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| OidcError::TokenValidation(e.to_string()))?;

        Ok(token_data.claims)
    }
}
