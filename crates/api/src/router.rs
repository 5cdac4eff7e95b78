//! The Deep Guard HTTP surface: `/health`, `/api/v1`, and (for the local
//! storage backend) the uploaded videos themselves.
//!
//! `main.rs` and the integration tests both call [`build_app_router`], so a
//! test request passes through the same layers as a production one.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{storage_mount_path, ServerConfig, StorageBackend};
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assemble routes, the optional video mount, and the middleware layers.
///
/// Outermost first, a request meets: CORS, request-id assignment, the trace
/// span, request-id echo on the response, the timeout, and panic recovery.
/// Upload bodies are bounded separately on the analyses route.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes());

    // Stored video URLs point back at this server when files live on disk.
    if config.storage.backend == StorageBackend::Local {
        app = app.nest_service(&storage_mount_path(), ServeDir::new(&config.storage.root));
    }

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    app.layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// CORS for the browser client: the configured origins, the three methods
/// the API uses, and bearer-token headers.
///
/// Panics at startup on an unparseable origin.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
