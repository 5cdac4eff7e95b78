use thiserror::Error;

/// Errors from object storage and callable functions.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The HTTP request could not be sent or completed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The remote service answered with a non-success status.
    #[error("remote returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The storage backend rejected the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Object path is empty, absolute, or escapes its bucket.
    #[error("invalid object path '{0}'")]
    InvalidPath(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
