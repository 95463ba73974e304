//! HTTP surface tests: the full router driven with `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use wednfest_integration_tests::TestContext;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, cookie, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn alice_signup() -> Value {
    json!({
        "email": "alice@x.com",
        "password": "Passw0rd!",
        "firstName": "Alice",
        "lastName": "Liddell",
    })
}

fn vendor_signup(email: &str) -> Value {
    json!({
        "email": email,
        "firstName": "Meera",
        "lastName": "Rao",
        "businessName": "Rao Studios",
        "businessCategory": "Hair & Makeup",
        "phone": "+919876543210",
        "state": "Tamil Nadu",
    })
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let response = ctx.app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.app().oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_user_created() {
    let ctx = TestContext::new();
    let (status, _, body) = send(ctx.app(), post_json("/api/v1/signup/user", &alice_signup())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "alice@x.com");
    assert_eq!(body["data"]["verified"], false);
    assert!(body["data"].get("passwordHash").is_none());
    assert_eq!(ctx.outbox.sent().await.len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_across_account_spaces() {
    let ctx = TestContext::new();
    let (status, _, _) = send(ctx.app(), post_json("/api/v1/signup/user", &alice_signup())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = send(
        ctx.app(),
        post_json("/api/v1/signup/vendor", &vendor_signup("alice@x.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(ctx.store.len().await, 1);
}

#[tokio::test]
async fn test_signup_vendor_sends_no_email() {
    let ctx = TestContext::new();
    let (status, _, body) = send(
        ctx.app(),
        post_json("/api/v1/signup/vendor", &vendor_signup("meera@x.com")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["kind"], "vendor");
    assert!(ctx.outbox.sent().await.is_empty());

    // No password yet, so login is refused.
    let (status, _, _) = send(
        ctx.app(),
        post_json(
            "/api/v1/login",
            &json!({"email": "meera@x.com", "password": "anything1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let ctx = TestContext::new();

    let (status, _, body) = send(
        ctx.app(),
        post_json(
            "/api/v1/signup/user",
            &json!({"email": "not-an-email", "password": "Passw0rd!", "firstName": "A", "lastName": "B"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email entered");

    let request = Request::post("/api/v1/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(ctx.app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_login_sets_cookie_and_me_accepts_it() {
    let ctx = TestContext::new();
    send(ctx.app(), post_json("/api/v1/signup/user", &alice_signup())).await;

    let (status, cookie, body) = send(
        ctx.app(),
        post_json(
            "/api/v1/login",
            &json!({"email": "alice@x.com", "password": "Passw0rd!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = cookie.unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    let token = body["token"].as_str().unwrap().to_owned();

    // Cookie
    let request = Request::get("/api/v1/me")
        .header(header::COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(ctx.app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@x.com");

    // Bearer
    let request = Request::get("/api/v1/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(ctx.app(), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let ctx = TestContext::new();

    let (status, _, body) = send(ctx.app(), get("/api/v1/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let request = Request::get("/api/v1/me")
        .header(header::AUTHORIZATION, "Bearer garbage")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(ctx.app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new();
    send(ctx.app(), post_json("/api/v1/signup/user", &alice_signup())).await;

    let (status, cookie, _) = send(
        ctx.app(),
        post_json(
            "/api/v1/login",
            &json!({"email": "alice@x.com", "password": "wrong-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
}

#[tokio::test]
async fn test_verify_and_reset_over_http() {
    let ctx = TestContext::new();
    send(ctx.app(), post_json("/api/v1/signup/user", &alice_signup())).await;
    let token = ctx.outbox.last_token().await.unwrap();

    let (status, _, _) = send(ctx.app(), get(&format!("/api/v1/verify-email/{token}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        ctx.app(),
        post_json("/api/v1/resend-email-verification", &json!({"email": "alice@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(
        ctx.app(),
        post_json("/api/v1/forgot-password", &json!({"email": "alice@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let link_token = ctx.outbox.last_token().await.unwrap();

    let (status, cookie, body) =
        send(ctx.app(), get(&format!("/api/v1/reset-password/{link_token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie.unwrap().starts_with("token="));
    let fresh = body["token"].as_str().unwrap().to_owned();

    let (status, _, _) = send(
        ctx.app(),
        post_json(
            &format!("/api/v1/reset-password/{fresh}"),
            &json!({"password": "short"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        ctx.app(),
        post_json(
            &format!("/api/v1/reset-password/{fresh}"),
            &json!({"password": "NewPass1!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        ctx.app(),
        post_json(
            "/api/v1/login",
            &json!({"email": "alice@x.com", "password": "NewPass1!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_unknown_email_is_not_found() {
    let ctx = TestContext::new();
    let (status, _, body) = send(
        ctx.app(),
        post_json("/api/v1/forgot-password", &json!({"email": "ghost@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_reset_with_bad_link_is_unauthorized_before_password_check() {
    let ctx = TestContext::new();

    let (status, _, body) = send(
        ctx.app(),
        post_json("/api/v1/reset-password/garbage", &json!({"password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}
