use std::path::PathBuf;

use deepguard_cloud::ChatFunctionConfig;
use deepguard_core::analysis::{DEFAULT_ANALYSIS_DELAY_SECS, VIDEO_BUCKET};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development
/// (except `JWT_SECRET`). In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`, uploads can be large).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for pending analyses, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Delay before a simulated analysis completes (default: `5`).
    pub analysis_delay_secs: u64,
    /// Where uploaded videos go.
    pub storage: StorageConfig,
    /// Remote `chat` callable; `None` selects the canned local assistant.
    pub chat: Option<ChatFunctionConfig>,
    /// Postgres URL; `None` selects the in-memory stores.
    pub database_url: Option<String>,
}

/// Object storage backend selected by `STORAGE_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory the local backend writes under.
    pub root: PathBuf,
    /// Base URL public object URLs are built from.
    pub public_base_url: String,
    /// Bucket name for the S3 backend.
    pub s3_bucket: Option<String>,
}

/// URL prefix the local storage directory is served under.
pub fn storage_mount_path() -> String {
    format!("/storage/{VIDEO_BUCKET}")
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                         |
    /// |-------------------------|-------------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                       |
    /// | `PORT`                  | `3000`                                          |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                         |
    /// | `REQUEST_TIMEOUT_SECS`  | `120`                                           |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                            |
    /// | `ANALYSIS_DELAY_SECS`   | `5`                                             |
    /// | `STORAGE_BACKEND`       | `local` (`local` or `s3`)                       |
    /// | `STORAGE_ROOT`          | `./storage/deepfake-videos`                     |
    /// | `STORAGE_PUBLIC_URL`    | `http://localhost:{PORT}/storage/deepfake-videos` |
    /// | `S3_BUCKET`             | -- (required when `STORAGE_BACKEND=s3`)         |
    /// | `CHAT_FUNCTION_URL`     | -- (unset: canned local assistant)              |
    /// | `CHAT_FUNCTION_KEY`     | --                                              |
    /// | `CHAT_TIMEOUT_SECS`     | `30`                                            |
    /// | `DATABASE_URL`          | -- (unset: in-memory stores)                    |
    ///
    /// # Panics
    ///
    /// Panics on unparsable numbers, an unknown storage backend, or a
    /// missing `S3_BUCKET` for the S3 backend.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let analysis_delay_secs: u64 = std::env::var("ANALYSIS_DELAY_SECS")
            .unwrap_or_else(|_| DEFAULT_ANALYSIS_DELAY_SECS.to_string())
            .parse()
            .expect("ANALYSIS_DELAY_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let storage = StorageConfig::from_env(port);
        let chat = chat_config_from_env();
        let database_url = non_empty_var("DATABASE_URL");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            analysis_delay_secs,
            storage,
            chat,
            database_url,
        }
    }
}

impl StorageConfig {
    fn from_env(port: u16) -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let root = std::env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage").join(VIDEO_BUCKET));

        let public_base_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}{}", storage_mount_path()));

        let s3_bucket = non_empty_var("S3_BUCKET");
        if backend == StorageBackend::S3 {
            assert!(
                s3_bucket.is_some(),
                "S3_BUCKET must be set when STORAGE_BACKEND=s3"
            );
        }

        Self {
            backend,
            root,
            public_base_url,
            s3_bucket,
        }
    }
}

fn chat_config_from_env() -> Option<ChatFunctionConfig> {
    let url = non_empty_var("CHAT_FUNCTION_URL")?;

    let timeout_secs: u64 = std::env::var("CHAT_TIMEOUT_SECS")
        .unwrap_or_else(|_| deepguard_cloud::functions::http::DEFAULT_TIMEOUT_SECS.to_string())
        .parse()
        .expect("CHAT_TIMEOUT_SECS must be a valid u64");

    Some(ChatFunctionConfig {
        url,
        api_key: non_empty_var("CHAT_FUNCTION_KEY"),
        timeout_secs,
    })
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
