//! Handlers for the assistant transcript of the caller's session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use deepguard_core::chat::ChatMessage;
use serde::Deserialize;

use crate::assistant::ChatExchange;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// GET /api/v1/chat
pub async fn transcript(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<DataResponse<Vec<ChatMessage>>> {
    Json(DataResponse {
        data: state.assistant.transcript(auth.session_id),
    })
}

/// POST /api/v1/chat/messages
///
/// A callable failure is not an HTTP error: the apology is appended and the
/// response carries `degraded: true`.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<DataResponse<ChatExchange>>> {
    let exchange = state
        .assistant
        .send(auth.user_id, auth.session_id, &input.content)
        .await?;
    Ok(Json(DataResponse { data: exchange }))
}

/// DELETE /api/v1/chat
pub async fn reset(State(state): State<AppState>, auth: AuthUser) -> StatusCode {
    state.assistant.reset(auth.session_id);
    StatusCode::NO_CONTENT
}
