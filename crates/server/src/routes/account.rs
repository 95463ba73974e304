//! Account route handlers.
//!
//! These routes require authentication.

use axum::Json;
use serde::Serialize;

use wednfest_core::Email;

use crate::middleware::RequireAuth;

/// Identity behind the presented access token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub email: Email,
}

/// GET /api/v1/me
pub async fn me(RequireAuth(email): RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        email,
    })
}
