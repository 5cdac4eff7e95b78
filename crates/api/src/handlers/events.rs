//! Server-Sent Events stream of the caller's session and analysis events.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/auth/events
///
/// Each event is sent with its `event_type` as the SSE event name and the
/// JSON-encoded [`PlatformEvent`](deepguard_events::PlatformEvent) as data.
/// Only events owned by the caller are delivered.
pub async fn stream(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = auth.user_id;
    tracing::debug!(user_id = %user_id, "Event stream opened");

    let events = BroadcastStream::new(state.sessions.subscribe()).filter_map(move |item| {
        match item {
            Ok(event) if event.is_for(user_id) => Event::default()
                .event(event.event_type.clone())
                .json_data(&event)
                .ok()
                .map(Ok),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(user_id = %user_id, skipped, "Event stream lagged");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
