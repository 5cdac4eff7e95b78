pub mod analyses;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                     sign up (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/session                                    current user or null (public)
/// /auth/events                                     SSE event stream (requires auth)
///
/// /analyses                                        list, upload (multipart)
/// /analyses/{id}                                   get
///
/// /dashboard                                       records + verdict counts
///
/// /chat                                            transcript, reset (DELETE)
/// /chat/messages                                   send (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/analyses", analyses::router())
        .nest("/dashboard", dashboard::router())
        .nest("/chat", chat::router())
}
