//! Route definitions for the assistant transcript.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET    /           -> transcript
/// DELETE /           -> reset
/// POST   /messages   -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chat::transcript).delete(chat::reset))
        .route("/messages", post(chat::send_message))
}
