//! Signed, short-lived identity tokens.
//!
//! Tokens are HS256 JWTs carrying a single identity claim (an email address)
//! in the `payload` field. The same token shape is used for email
//! verification links, password reset links, and login sessions. Nothing is
//! persisted, so a token stays valid until `exp`.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of every issued token.
pub const TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Errors from token verification or signing.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed token, bad signature, or wrong key.
    #[error("invalid token")]
    Invalid,

    /// Token is past its expiry.
    #[error("token expired")]
    Expired,

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// JWT body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity claim (email).
    pub payload: String,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies tokens with a fixed signing key.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from the access secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for `claim`, valid for [`TOKEN_TTL`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, claim: &str) -> Result<String, TokenError> {
        self.issue_at(claim, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(&self, claim: &str, issued_at: i64) -> Result<String, TokenError> {
        #[allow(clippy::cast_possible_wrap)]
        let ttl = TOKEN_TTL.as_secs() as i64;
        let claims = Claims {
            payload: claim.to_owned(),
            iat: issued_at,
            exp: issued_at + ttl,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify a token and return its claim.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` past `exp` and `TokenError::Invalid` for
    /// anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.payload)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
