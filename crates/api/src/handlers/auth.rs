//! Handlers for the `/auth` resource (sign-up, login, refresh, logout,
//! current session).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::response::DataResponse;
use crate::session::{Session, SessionUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup` and `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<Session>)> {
    let session = state.sessions.sign_up(&input.email, &input.password).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<Session>> {
    let session = state.sessions.sign_in(&input.email, &input.password).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The
/// assistant transcript follows the session onto its replacement.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<Session>> {
    let rotation = state.sessions.refresh(&input.refresh_token).await?;
    state
        .assistant
        .carry_over(rotation.replaced_session_id, rotation.session.user.session_id);
    Ok(Json(rotation.session))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user and drop their assistant
/// transcripts. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.sessions.sign_out(auth.user_id).await?;
    state.assistant.end_user(auth.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
///
/// The current user, or `null` when the request carries no usable token.
pub async fn current(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<Option<SessionUser>>>> {
    let user = match bearer_token(&headers) {
        Ok(token) => state.sessions.current(token).await?,
        Err(_) => None,
    };
    Ok(Json(DataResponse { data: user }))
}
