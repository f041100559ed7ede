// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP-level tests for session auth, the admin gate, and the profile API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

// ─── Public surface ──────────────────────────────────────────

#[tokio::test]
async fn test_health_is_public() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ─── Session authentication ──────────────────────────────────

#[tokio::test]
async fn test_profile_requires_session() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app
        .oneshot(get_request("/api/profile", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_session_cookie_is_invalid_token() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app
        .oneshot(get_request("/api/profile", Some("qb_session=garbage.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_token");
}

#[tokio::test]
async fn test_login_sets_session_cookie_and_returns_profile() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/google",
            None,
            &json!({"credential": "cred-user"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("qb_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"));

    let profile = body_json(response).await;
    assert_eq!(profile["id"], "u1");
    assert_eq!(profile["email"], "a@b.com");
    assert_eq!(
        profile["preferences"]["watchlist"],
        json!(["CDR.WA", "PKN.WA", "PKOBP"])
    );
}

#[tokio::test]
async fn test_login_with_bad_credential_is_unauthorized() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/google",
            None,
            &json!({"credential": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app
        .oneshot(json_request("POST", "/auth/logout", None, &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("qb_session="));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

// ─── Profile API ─────────────────────────────────────────────

#[tokio::test]
async fn test_profile_roundtrip_normalizes_preferences() {
    let (app, state, _tmp) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "u1", Some("a@b.com"));

    // First access creates the profile with defaults.
    let response = app
        .clone()
        .oneshot(get_request("/api/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // PUT with a messy watchlist normalizes before persisting.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile",
            Some(&cookie),
            &json!({"preferences": {"watchlist": ["xyz.WA", " xyz.WA ", "abc"]}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["preferences"]["watchlist"], json!(["XYZ.WA", "ABC"]));

    // The normalized form survives a subsequent read.
    let response = app
        .oneshot(get_request("/api/profile", Some(&cookie)))
        .await
        .unwrap();
    let profile = body_json(response).await;
    assert_eq!(profile["preferences"]["watchlist"], json!(["XYZ.WA", "ABC"]));
}

#[tokio::test]
async fn test_me_returns_session_claims() {
    let (app, state, _tmp) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "u1", Some("a@b.com"));

    let response = app
        .oneshot(get_request("/api/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me = body_json(response).await;
    assert_eq!(me["sub"], "u1");
    assert_eq!(me["email"], "a@b.com");
    assert!(
        me["expiresAt"].is_i64(),
        "claims serialize in camelCase like every other body: {me}"
    );
}

// ─── Admin gate ──────────────────────────────────────────────

#[tokio::test]
async fn test_admins_listing_requires_session() {
    let (app, _, _tmp) = common::create_test_app();
    let response = app.oneshot(get_request("/api/admins", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_session_is_forbidden() {
    let (app, state, _tmp) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "u1", Some("a@b.com"));

    let response = app
        .oneshot(get_request("/api/admins", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_without_email_is_forbidden() {
    let (app, state, _tmp) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "no-email-sub", None);

    let response = app
        .oneshot(get_request("/api/admins", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["details"], "no email on record");
}

#[tokio::test]
async fn test_admin_lists_bootstrap_entries() {
    let (app, state, _tmp) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "admin-sub", Some("Admin@Quantboard.dev"));

    let response = app
        .oneshot(get_request("/api/admins", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let admins = body_json(response).await;
    let emails: Vec<&str> = admins
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"admin@quantboard.dev"));
}

#[tokio::test]
async fn test_admin_add_then_duplicate_then_malformed() {
    let (app, state, _tmp) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "admin-sub", Some("admin@quantboard.dev"));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admins",
            Some(&cookie),
            &json!({"email": " New@Admin.com "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let admins = body_json(response).await;
    let entry = admins
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["email"] == "new@admin.com")
        .expect("entry for new admin");
    assert_eq!(entry["addedBy"], "admin@quantboard.dev");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admins",
            Some(&cookie),
            &json!({"email": "new@admin.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admins",
            Some(&cookie),
            &json!({"email": "nonsense"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_newly_granted_admin_passes_the_gate() {
    let (app, state, _tmp) = common::create_test_app();
    let admin_cookie = common::session_cookie_for(&state, "admin-sub", Some("admin@quantboard.dev"));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admins",
            Some(&admin_cookie),
            &json!({"email": "second@admin.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let second_cookie = common::session_cookie_for(&state, "sub-2", Some("Second@Admin.com"));
    let response = app
        .oneshot(get_request("/api/admins", Some(&second_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
