//! Route definitions for the `/analyses` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use deepguard_core::upload::MAX_UPLOAD_BYTES;

use crate::handlers::analyses;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 4 * 1024 * 1024;

/// Routes mounted at `/analyses`.
///
/// ```text
/// GET  /       -> list
/// POST /       -> upload (multipart, field `file`)
/// GET  /{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(analyses::list).post(analyses::upload))
        .route("/{id}", get(analyses::get_by_id))
        .layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES as usize + MULTIPART_OVERHEAD_BYTES,
        ))
}
