//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every failure is rendered as `{"success": false, "message": "..."}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use wednfest_core::Email;

use crate::services::auth::AuthError;

/// Application-level error type for the auth service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => match err {
                AuthError::AccountExists
                | AuthError::DuplicateEmail
                | AuthError::AlreadyVerified => StatusCode::CONFLICT,
                AuthError::NotFound => StatusCode::NOT_FOUND,
                AuthError::InvalidCredentials
                | AuthError::TokenInvalid
                | AuthError::TokenExpired
                | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
                AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AuthError::DeliveryFailed(_) => StatusCode::BAD_GATEWAY,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Client-facing message. Server-side details are never exposed.
    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Auth(err) => match err {
                AuthError::AccountExists | AuthError::DuplicateEmail => {
                    "An account with this email already exists".to_string()
                }
                AuthError::NotFound => {
                    "Email is not registered with us, please sign up first".to_string()
                }
                AuthError::AlreadyVerified => "Email is already verified".to_string(),
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::TokenInvalid => "Invalid or malformed token".to_string(),
                AuthError::TokenExpired => "Link has expired, please request a new one".to_string(),
                AuthError::Unauthorized => "Unauthorized access".to_string(),
                AuthError::InvalidInput(msg) => msg.clone(),
                AuthError::DeliveryFailed(_) => {
                    "Could not send email, please try again later".to_string()
                }
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning(_) => {
                    "Internal server error".to_string()
                }
            },
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            message: self.message(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for an authenticated request.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &Email) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;
    use crate::db::RepositoryError;
    use crate::services::mail::DeliveryError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: impl Into<AppError>) -> StatusCode {
            err.into().into_response().status()
        }

        assert_eq!(get_status(AuthError::AccountExists), StatusCode::CONFLICT);
        assert_eq!(get_status(AuthError::DuplicateEmail), StatusCode::CONFLICT);
        assert_eq!(get_status(AuthError::AlreadyVerified), StatusCode::CONFLICT);
        assert_eq!(get_status(AuthError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AuthError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AuthError::TokenInvalid), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AuthError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AuthError::InvalidInput("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::DeliveryFailed(DeliveryError::Rejected(
                "x".to_string()
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AuthError::Repository(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AuthError::PasswordHash),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_hides_internal_details() {
        let err = AppError::from(AuthError::Repository(RepositoryError::DataCorruption(
            "invalid email in database".to_string(),
        )));
        let response = err.into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Internal server error");
    }
}
