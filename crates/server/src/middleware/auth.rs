//! Session gate.
//!
//! A request is authenticated by an access token in the `token` cookie or, if
//! there is no cookie, in an `Authorization: Bearer <token>` header.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use cookie::{Cookie, SameSite, time::Duration};

use wednfest_core::Email;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::TOKEN_TTL;
use crate::state::AppState;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Extractor that requires a valid access token.
///
/// Rejects with `401` and the standard error body when the token is missing,
/// malformed, or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(email): RequireAuth) -> String {
///     format!("Hello, {email}!")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Email);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers);
        let email = state.auth().authenticate(token.as_deref())?;
        set_sentry_user(&email);
        Ok(Self(email))
    }
}

/// Find the access token, preferring the cookie over the header.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == TOKEN_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_owned())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

/// Build the `token` cookie set after login or a reset hand-off.
///
/// The cookie lives exactly as long as the token it carries.
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    #[allow(clippy::cast_possible_wrap)]
    let max_age = Duration::seconds(TOKEN_TTL.as_secs() as i64);

    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_cookie_token() {
        let h = headers(&[("cookie", "theme=dark; token=abc.def.ghi")]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token() {
        let h = headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_wins_over_header() {
        let h = headers(&[
            ("cookie", "token=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_missing_or_malformed() {
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
        assert_eq!(
            token_from_headers(&headers(&[("authorization", "Bearer")])),
            None
        );
        assert_eq!(
            token_from_headers(&headers(&[("authorization", "Basic dXNlcjpwYXNz")])),
            None
        );
        assert_eq!(token_from_headers(&headers(&[("cookie", "token=")])), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_owned(), true);
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Max-Age=900"));
    }
}
