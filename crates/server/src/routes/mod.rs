//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Liveness check
//! GET  /health/ready                         - Readiness check (credential store)
//!
//! # Auth (/api/v1)
//! POST /api/v1/signup/user                   - Customer signup
//! POST /api/v1/signup/vendor                 - Vendor registration
//! POST /api/v1/login                         - Login, sets `token` cookie
//! POST /api/v1/forgot-password               - Email a reset link
//! GET  /api/v1/reset-password/{token}        - Exchange reset link token
//! POST /api/v1/reset-password/{token}        - Set a new password
//! GET  /api/v1/verify-email/{token}          - Verify email
//! POST /api/v1/resend-email-verification     - Resend verification email
//!
//! # Account (requires auth)
//! GET  /api/v1/me                            - Identity behind the token
//! ```

pub mod account;
pub mod auth;

use axum::{
    Router,
    extract::{FromRequest, State},
    http::{Request, StatusCode},
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// JSON body extractor that rejects with the standard error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the `/api/v1` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/signup/user", post(auth::signup_user))
        .route("/signup/vendor", post(auth::signup_vendor))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route(
            "/reset-password/{token}",
            get(auth::verify_reset_token).post(auth::reset_password),
        )
        .route("/verify-email/{token}", get(auth::verify_email))
        .route(
            "/resend-email-verification",
            post(auth::resend_verification),
        )
        .route("/me", get(account::me))
}

/// Build the full application router with tracing and request IDs.
///
/// Sentry layers are left to the binary so tests run without them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/v1", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the credential store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
