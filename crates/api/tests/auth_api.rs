//! Integration tests for signup, login, logout and `/api/userid`.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use cheddit_api::auth::jwt::{encode_claims, verify_session_token, Claims};
use common::{body_json, build_test_app, get, post_json, post_raw, signup};
use serde_json::json;

fn set_cookie_headers(response: &axum::http::Response<axum::body::Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_then_login_with_same_credentials() {
    let app = build_test_app();

    let response = post_json(
        &app.router,
        "/api/auth/signup",
        json!({
            "name": "Ada",
            "email": "ada@campus.edu",
            "password": "analytical-engine",
            "isFaculty": true,
        }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(set_cookie_headers(&response).is_empty());

    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "ada@campus.edu");
    assert_eq!(json["user"]["is_faculty"], true);
    assert!(json["user"].get("password_hash").is_none());

    let claims = verify_session_token(json["token"].as_str().unwrap(), &app.config.jwt).unwrap();
    assert_eq!(claims.email, "ada@campus.edu");
    assert!(claims.is_faculty);

    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "ada@campus.edu", "password": "analytical-engine" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["name"], "Ada");
    assert!(json["token"].is_string());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = build_test_app();
    signup(&app.router, "First", "dup@campus.edu", false).await;

    let response = post_json(
        &app.router,
        "/api/auth/signup",
        json!({
            "name": "Second",
            "email": "dup@campus.edu",
            "password": "another-password",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User already exists");
}

#[tokio::test]
async fn signup_validates_fields() {
    let app = build_test_app();

    for body in [
        json!({ "name": "", "email": "a@campus.edu", "password": "long-enough" }),
        json!({ "name": "   ", "email": "a@campus.edu", "password": "long-enough" }),
        json!({ "name": "A", "email": "not-an-email", "password": "long-enough" }),
        json!({ "name": "A", "email": "a@campus.edu", "password": "short" }),
    ] {
        let response = post_json(&app.router, "/api/auth/signup", body, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn signup_missing_fields_are_json_400s() {
    let app = build_test_app();

    for body in [
        json!({ "name": "A", "password": "long-enough" }),
        json!({ "email": "a@campus.edu", "password": "long-enough" }),
        json!({ "name": "A", "email": "a@campus.edu" }),
    ] {
        let response = post_json(&app.router, "/api/auth/signup", body, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"], "Missing required fields");
    }
}

#[tokio::test]
async fn whitespace_name_is_not_stored() {
    let app = build_test_app();
    let response = post_json(
        &app.router,
        "/api/auth/signup",
        json!({ "name": "   ", "email": "blank@campus.edu", "password": "long-enough" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "blank@campus.edu", "password": "long-enough" }),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_missing_password_is_a_json_400() {
    let app = build_test_app();
    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "someone@campus.edu" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Missing email or password");
}

#[tokio::test]
async fn malformed_login_body_is_a_json_400() {
    let app = build_test_app();
    let response = post_raw(&app.router, "/api/auth/login", "{not json", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn login_sets_session_cookie() {
    let app = build_test_app();
    signup(&app.router, "Cookie", "cookie@campus.edu", false).await;

    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "cookie@campus.edu", "password": "correct-horse-battery" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert!(cookie.starts_with("authToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"));

    let json = body_json(response).await;
    let token = json["token"].as_str().unwrap();
    assert!(cookie.contains(token));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = build_test_app();
    signup(&app.router, "Known", "known@campus.edu", false).await;

    let wrong_password = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "known@campus.edu", "password": "not-the-password" }),
        None,
    )
    .await;
    let unknown_email = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "ghost@campus.edu", "password": "not-the-password" }),
        None,
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie_headers(&wrong_password).is_empty());

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a["code"], "INVALID_CREDENTIALS");
    assert_eq!(a["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Logout and current user
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clears_cookie() {
    let app = build_test_app();
    let user = signup(&app.router, "Leaving", "bye@campus.edu", false).await;

    let response = post_json(&app.router, "/api/logout", json!({}), Some(&user.token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("authToken=;"));
    assert!(cookies[0].contains("Max-Age=0"));
    assert!(cookies[0].contains("Path=/"));

    assert_eq!(body_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn userid_reflects_session() {
    let app = build_test_app();
    let user = signup(&app.router, "Who", "who@campus.edu", false).await;

    let json = body_json(get(&app.router, "/api/userid", Some(&user.token)).await).await;
    assert_eq!(json["id"], user.id.as_str());

    let json = body_json(get(&app.router, "/api/userid", None).await).await;
    assert!(json["id"].is_null());

    let response = get(&app.router, "/api/userid", Some("tampered.token.value")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["id"].is_null());
}

#[tokio::test]
async fn expired_session_is_rejected_by_protected_routes() {
    let app = build_test_app();
    let user = signup(&app.router, "Old", "old@campus.edu", false).await;

    let now = chrono::Utc::now().timestamp();
    let expired = encode_claims(
        &Claims {
            id: user.id.parse().unwrap(),
            email: user.email.clone(),
            is_faculty: false,
            exp: now - 1,
            iat: now - 3600,
        },
        &app.config.jwt,
    )
    .unwrap();

    let response = post_json(
        &app.router,
        "/api/push-subscribe",
        json!({ "subscription": { "endpoint": "https://push.example/x" } }),
        Some(&expired),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");

    let response = post_json(
        &app.router,
        "/api/push-subscribe",
        json!({ "subscription": { "endpoint": "https://push.example/x" } }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}
