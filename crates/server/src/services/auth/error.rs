//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::db::RepositoryError;
use crate::services::mail::DeliveryError;

/// Errors that can occur during authentication flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The store rejected an insert because the email already exists.
    #[error("email already registered")]
    DuplicateEmail,

    /// An account with this email exists (caught before insert).
    #[error("account already exists")]
    AccountExists,

    /// No account for the given email.
    #[error("account not found")]
    NotFound,

    /// Verification requested for an account that is already verified.
    #[error("account already verified")]
    AlreadyVerified,

    /// Unknown email, missing password, or password mismatch.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token is malformed, has a bad signature, or was signed with another key.
    #[error("invalid token")]
    TokenInvalid,

    /// Token is past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// No usable session token was presented.
    #[error("unauthorized")]
    Unauthorized,

    /// Notification could not be delivered.
    #[error("delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),

    /// Request data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token could not be signed.
    #[error("token signing error: {0}")]
    TokenSigning(jsonwebtoken::errors::Error),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::TokenInvalid,
            TokenError::Expired => Self::TokenExpired,
            TokenError::Signing(e) => Self::TokenSigning(e),
        }
    }
}

impl From<wednfest_core::EmailError> for AuthError {
    fn from(err: wednfest_core::EmailError) -> Self {
        Self::InvalidInput(format!("invalid email: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_auth_errors() {
        assert!(matches!(
            AuthError::from(TokenError::Invalid),
            AuthError::TokenInvalid
        ));
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_email_error_is_invalid_input() {
        let err = AuthError::from(wednfest_core::EmailError::Empty);
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }
}
