#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cheddit_api::auth::jwt::JwtConfig;
use cheddit_api::config::{PushConfig, ServerConfig, StorageBackend, StorageConfig};
use cheddit_api::router::build_app_router;
use cheddit_api::state::AppState;
use cheddit_db::memory::MemoryStore;
use cheddit_events::EventBus;
use cheddit_storage::LocalObjectStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_SIGNING_SECRET: &str = "integration-signing-secret";
pub const MULTIPART_BOUNDARY: &str = "cheddit-test-boundary";

/// Build a test `ServerConfig` with local storage rooted at `storage_root`.
pub fn test_config(storage_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        public_base_url: "http://localhost:3000".to_string(),
        cookie_secure: false,
        min_password_length: 8,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            session_expiry_days: 7,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            bucket: "pdf".to_string(),
            local_path: storage_root.to_path_buf(),
            signing_secret: TEST_SIGNING_SECRET.to_string(),
            s3_endpoint_url: None,
            signed_url_ttl_secs: 30,
        },
        push: PushConfig {
            vapid_private_key: None,
            vapid_subject: "mailto:admin@localhost".to_string(),
        },
    }
}

/// The router plus handles on everything behind it.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub store: Arc<MemoryStore>,
    pub objects: Arc<LocalObjectStore>,
    pub event_bus: Arc<EventBus>,
    _storage_root: TempDir,
}

/// Build the full application router over an in-memory store and a local
/// object store in a fresh temp directory.
pub fn build_test_app() -> TestApp {
    let storage_root = tempfile::tempdir().expect("tempdir");
    let config = test_config(storage_root.path());

    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(LocalObjectStore::new(
        storage_root.path(),
        config.storage.bucket.clone(),
        config.public_base_url.clone(),
        TEST_SIGNING_SECRET,
    ));
    let event_bus = Arc::new(EventBus::default());

    let state = AppState {
        store: store.clone(),
        objects: objects.clone(),
        config: Arc::new(config.clone()),
        event_bus: event_bus.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        store,
        objects,
        event_bus,
        _storage_root: storage_root,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn with_session(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(COOKIE, format!("authToken={token}")),
        None => builder,
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let request = with_session(Request::builder().method(Method::GET).uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> Response<Body> {
    let request = with_session(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json"),
        token,
    )
    .body(Body::from(serde_json::to_vec(&body).unwrap()))
    .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value, token: Option<&str>) -> Response<Body> {
    json_request(app, Method::POST, uri, body, token).await
}

/// POST a body verbatim with a JSON content type.
pub async fn post_raw(app: &Router, uri: &str, body: &str, token: Option<&str>) -> Response<Body> {
    let request = with_session(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json"),
        token,
    )
    .body(Body::from(body.to_string()))
    .unwrap();
    send(app, request).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body, token).await
}

/// POST a single-file multipart body to `/api/upload`.
pub async fn upload_file(
    app: &Router,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    token: Option<&str>,
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = with_session(
        Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            ),
        token,
    )
    .body(Body::from(body))
    .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A signed-up user and their session token.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub async fn signup(app: &Router, name: &str, email: &str, is_faculty: bool) -> TestUser {
    let response = post_json(
        app,
        "/api/auth/signup",
        json!({
            "name": name,
            "email": email,
            "password": "correct-horse-battery",
            "isFaculty": is_faculty,
        }),
        None,
    )
    .await;
    assert_eq!(response.status(), 201, "signup of {email} should succeed");
    let json = body_json(response).await;
    TestUser {
        id: json["user"]["id"].as_str().unwrap().to_string(),
        email: email.to_string(),
        token: json["token"].as_str().unwrap().to_string(),
    }
}

/// Upload `name` as `owner` and return the stored path.
pub async fn upload_pdf(app: &Router, owner: &TestUser, name: &str) -> String {
    let response = upload_file(
        app,
        name,
        "application/pdf",
        b"%PDF-1.7 test document",
        Some(&owner.token),
    )
    .await;
    assert_eq!(response.status(), 200, "upload of {name} should succeed");
    let json = body_json(response).await;
    json["record"]["storage_path"].as_str().unwrap().to_string()
}

/// Strip the public origin from an absolute URL so it can be sent to the router.
pub fn local_path_of(url: &str) -> String {
    url.strip_prefix("http://localhost:3000")
        .unwrap_or(url)
        .to_string()
}
