//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (added by the binary, outermost)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded into the request span)
//!
//! The session gate is an extractor, [`RequireAuth`], applied per handler.

pub mod auth;
pub mod request_id;

pub use auth::{RequireAuth, TOKEN_COOKIE, session_cookie};
pub use request_id::request_id_middleware;
