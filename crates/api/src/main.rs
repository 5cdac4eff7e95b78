use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use deepguard_api::config::{ServerConfig, StorageBackend};
use deepguard_api::router::build_app_router;
use deepguard_api::state::{AppState, Backends};
use deepguard_cloud::{
    CannedChatFunction, ChatFunction, HttpChatFunction, LocalObjectStorage, ObjectStorage,
    S3ObjectStorage,
};
use deepguard_db::store::{
    AnalysisStore, IdentityStore, MemoryAnalysisStore, MemoryIdentityStore, PgAnalysisStore,
    PgIdentityStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepguard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Record + identity stores ---
    let (analyses, identity) = build_stores(&config).await;

    // --- Object storage ---
    let storage = build_storage(&config).await;

    // --- Chat callable ---
    let chat: Arc<dyn ChatFunction> = match &config.chat {
        Some(chat_config) => {
            tracing::info!(url = %chat_config.url, "Using remote chat function");
            Arc::new(
                HttpChatFunction::new(chat_config.clone())
                    .expect("Failed to build chat function client"),
            )
        }
        None => {
            tracing::warn!("CHAT_FUNCTION_URL not set, using the canned local assistant");
            Arc::new(CannedChatFunction::new())
        }
    };

    // --- App state ---
    let state = AppState::new(
        &config,
        Backends {
            analyses,
            identity,
            storage,
            chat,
        },
    );
    let simulator = Arc::clone(&state.simulator);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain_timeout, simulator.drain())
        .await
        .is_err()
    {
        tracing::warn!(
            pending = simulator.pending(),
            "Timed out waiting for simulated analyses; pending records stay pending"
        );
    }

    tracing::info!("Graceful shutdown complete");
}

/// Postgres when `DATABASE_URL` is set, otherwise in-memory stores.
async fn build_stores(config: &ServerConfig) -> (Arc<dyn AnalysisStore>, Arc<dyn IdentityStore>) {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, using in-memory stores; data is lost on restart");
        return (
            Arc::new(MemoryAnalysisStore::new()),
            Arc::new(MemoryIdentityStore::new()),
        );
    };

    let pool = deepguard_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    deepguard_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    deepguard_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    (
        Arc::new(PgAnalysisStore::new(pool.clone())),
        Arc::new(PgIdentityStore::new(pool)),
    )
}

async fn build_storage(config: &ServerConfig) -> Arc<dyn ObjectStorage> {
    let storage = &config.storage;
    match storage.backend {
        StorageBackend::Local => {
            tokio::fs::create_dir_all(&storage.root)
                .await
                .expect("Failed to create storage directory");
            tracing::info!(root = %storage.root.display(), "Using local object storage");
            Arc::new(LocalObjectStorage::new(
                storage.root.clone(),
                storage.public_base_url.clone(),
            ))
        }
        StorageBackend::S3 => {
            let bucket = storage
                .s3_bucket
                .clone()
                .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3");
            tracing::info!(%bucket, "Using S3 object storage");
            Arc::new(
                S3ObjectStorage::from_env(bucket, storage.public_base_url.clone())
                    .await
                    .expect("Failed to configure S3 storage"),
            )
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
