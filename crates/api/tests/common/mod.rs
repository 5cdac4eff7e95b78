#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use deepguard_api::auth::jwt::JwtConfig;
use deepguard_api::config::{ServerConfig, StorageBackend, StorageConfig};
use deepguard_api::router::build_app_router;
use deepguard_api::state::{AppState, Backends};
use deepguard_cloud::{CannedChatFunction, ChatFunction, MemoryObjectStorage};
use deepguard_db::store::{MemoryAnalysisStore, MemoryIdentityStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const BOUNDARY: &str = "deepguard-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and the default 5-second analysis delay.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
        analysis_delay_secs: 5,
        storage: StorageConfig {
            backend: StorageBackend::Local,
            root: std::env::temp_dir().join("deepguard-test-storage"),
            public_base_url: "memory://deepfake-videos".to_string(),
            s3_bucket: None,
        },
        chat: None,
        database_url: None,
    }
}

/// The router plus handles on the in-memory backends behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage: Arc<MemoryObjectStorage>,
    pub analyses: Arc<MemoryAnalysisStore>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application with in-memory stores, in-memory storage and
/// the canned assistant.
pub fn build_test_app() -> TestApp {
    build_test_app_with_chat(Arc::new(CannedChatFunction::new()))
}

pub fn build_test_app_with_chat(chat: Arc<dyn ChatFunction>) -> TestApp {
    let config = test_config();
    let storage = Arc::new(MemoryObjectStorage::default());
    let analyses = Arc::new(MemoryAnalysisStore::new());

    let state = AppState::new(
        &config,
        Backends {
            analyses: analyses.clone(),
            identity: Arc::new(MemoryIdentityStore::new()),
            storage: storage.clone(),
            chat,
        },
    );
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        storage,
        analyses,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST an empty body with a bearer token.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

fn part_head(file_name: &str, content_type: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
         filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
}

fn part_tail() -> String {
    format!("\r\n--{BOUNDARY}--\r\n")
}

/// Upload one file in a `file` field.
pub async fn upload_file(
    app: Router,
    token: &str,
    file_name: &str,
    content_type: &str,
    contents: &[u8],
) -> Response<Body> {
    let mut body = part_head(file_name, content_type).into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(part_tail().as_bytes());
    send(app, multipart_request(token, Body::from(body))).await
}

/// Upload `size_mib` MiB of zeros without materializing the whole body.
pub async fn upload_streamed(
    app: Router,
    token: &str,
    file_name: &str,
    content_type: &str,
    size_mib: usize,
) -> Response<Body> {
    static MIB: [u8; 1024 * 1024] = [0; 1024 * 1024];

    let head = Bytes::from(part_head(file_name, content_type));
    let tail = Bytes::from(part_tail());
    let chunks = std::iter::once(head)
        .chain(std::iter::repeat(Bytes::from_static(&MIB)).take(size_mib))
        .chain(std::iter::once(tail))
        .map(Ok::<_, std::convert::Infallible>);

    let body = Body::from_stream(futures::stream::iter(chunks));
    send(app, multipart_request(token, body)).await
}

fn multipart_request(token: &str, body: Body) -> Request<Body> {
    Request::post("/api/v1/analyses")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(body)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Session helpers
// ---------------------------------------------------------------------------

/// Sign up through the API and return the response body.
pub async fn sign_up(app: Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Sign up a fresh user and return their access token.
pub async fn signed_in_token(app: Router, email: &str) -> String {
    let session = sign_up(app, email, "secret-password").await;
    session["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}
