//! Upload validation and object-path derivation.
//!
//! Validation runs before any storage or database call. Both checks are
//! terminal: the caller re-selects a file rather than retrying.

use crate::error::CoreError;
use crate::types::UserId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted upload size (100 MiB). Files of exactly this size pass.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Required MIME type prefix for uploads.
pub const VIDEO_CONTENT_TYPE_PREFIX: &str = "video/";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject anything whose declared content type is not `video/*`.
///
/// A missing content type is treated as non-video.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), CoreError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with(VIDEO_CONTENT_TYPE_PREFIX) => Ok(()),
        Some(ct) => Err(CoreError::Validation(format!(
            "Invalid file type '{ct}'. Please select a video file"
        ))),
        None => Err(CoreError::Validation(
            "Missing file type. Please select a video file".into(),
        )),
    }
}

/// Reject files larger than [`MAX_UPLOAD_BYTES`].
pub fn validate_size(size_bytes: u64) -> Result<(), CoreError> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File too large ({size_bytes} bytes). Please select a video smaller than 100MB"
        )));
    }
    Ok(())
}

/// Run both upload checks: content type first, then size.
pub fn validate_upload(content_type: Option<&str>, size_bytes: u64) -> Result<(), CoreError> {
    validate_content_type(content_type)?;
    validate_size(size_bytes)
}

// ---------------------------------------------------------------------------
// Object paths
// ---------------------------------------------------------------------------

/// Extension used for the stored object: the text after the last `.`,
/// or the whole name when it has no dot.
///
/// Any directory part a client sent with the name is dropped first, so the
/// extension never contains a path separator.
pub fn file_extension(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    base.rsplit('.').next().unwrap_or(base)
}

/// Per-user object path keyed by upload time: `{user_id}/{unix_millis}.{ext}`.
pub fn object_path(user_id: UserId, file_name: &str, unix_millis: i64) -> String {
    format!("{user_id}/{unix_millis}.{}", file_extension(file_name))
}
