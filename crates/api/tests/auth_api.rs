//! HTTP-level integration tests for the session endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, get, get_auth, post_auth, post_json, sign_up, signed_in_token,
};
use serde_json::json;

#[tokio::test]
async fn test_sign_up_returns_session() {
    let app = build_test_app();
    let session = sign_up(app.router(), "  Ada@Example.com ", "secret1").await;

    assert!(session["access_token"].is_string());
    assert!(session["refresh_token"].is_string());
    assert_eq!(session["token_type"], "bearer");
    assert_eq!(session["expires_in"], 3600);
    assert_eq!(session["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = build_test_app();

    let response = post_json(
        app.router(),
        "/api/v1/auth/signup",
        json!({ "email": "ada@example.com", "password": "12345" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        app.router(),
        "/api/v1/auth/signup",
        json!({ "email": "not-an-email", "password": "123456" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_sign_up_conflicts() {
    let app = build_test_app();
    sign_up(app.router(), "ada@example.com", "secret1").await;

    let response = post_json(
        app.router(),
        "/api/v1/auth/signup",
        json!({ "email": "ADA@example.com", "password": "secret2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = build_test_app();
    sign_up(app.router(), "ada@example.com", "secret1").await;

    let response = post_json(
        app.router(),
        "/api/v1/auth/login",
        json!({ "email": "ada@example.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["access_token"].is_string());

    let response = post_json(
        app.router(),
        "/api/v1/auth/login",
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_current_session_or_null() {
    let app = build_test_app();

    let response = get(app.router(), "/api/v1/auth/session").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].is_null());

    let token = signed_in_token(app.router(), "ada@example.com").await;
    let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "ada@example.com");

    let response = get_auth(app.router(), "/api/v1/auth/session", "garbage").await;
    assert!(body_json(response).await["data"].is_null());
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = build_test_app();
    let token = signed_in_token(app.router(), "ada@example.com").await;

    let response = post_auth(app.router(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.router(), "/api/v1/analyses", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
    assert!(body_json(response).await["data"].is_null());
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = build_test_app();
    let session = sign_up(app.router(), "ada@example.com", "secret1").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let response = post_json(
        app.router(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], session["refresh_token"]);

    let response = get_auth(
        app.router(),
        "/api/v1/analyses",
        rotated["access_token"].as_str().unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The old refresh token was consumed.
    let response = post_json(
        app.router(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = build_test_app();

    for uri in ["/api/v1/analyses", "/api/v1/dashboard", "/api/v1/chat"] {
        let response = get(app.router(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_event_stream_only_carries_own_events() {
    use http_body_util::BodyExt;

    let app = build_test_app();
    let token = signed_in_token(app.router(), "ada@example.com").await;

    let response = get_auth(app.router(), "/api/v1/auth/events", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/event-stream"
    );
    let mut body = response.into_body();

    // Someone else's activity is not delivered.
    signed_in_token(app.router(), "bob@example.com").await;
    let response = post_auth(app.router(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let frame = body
        .frame()
        .await
        .expect("stream should yield a frame")
        .expect("frame should be readable")
        .into_data()
        .expect("frame should carry data");
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: auth.signed_out"), "{text}");
}
