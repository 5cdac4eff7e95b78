//! Broadcast fan-out for Deep Guard events.
//!
//! Every event belongs to exactly one user. The server holds a single
//! [`EventBus`]; each `/auth/events` stream subscribes to it and keeps the
//! events whose owner matches the signed-in caller.

use chrono::{DateTime, Utc};
use deepguard_core::types::{DbId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// Something that happened to a user's account or one of their analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// One of the [`event_types`](crate::event_types) names.
    pub event_type: String,

    /// The user whose session or record changed.
    pub user_id: UserId,

    /// Record kind and id for `analysis.*` events; absent for `auth.*`.
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,

    /// Event-specific fields, e.g. the verdict of a completed analysis.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>, user_id: UserId) -> Self {
        Self {
            event_type: event_type.into(),
            user_id,
            source_entity_type: None,
            source_entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is_for(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Events buffered per subscriber before the oldest are overwritten.
const DEFAULT_CAPACITY: usize = 1024;

/// Single-process event hub over a [`broadcast`] channel.
///
/// A subscriber that falls more than the channel capacity behind receives
/// `RecvError::Lagged` and skips ahead; events are never persisted.
///
/// ```rust
/// use deepguard_events::bus::{EventBus, PlatformEvent};
/// use uuid::Uuid;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("analysis.created", Uuid::nil()));
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Hand an event to every open stream. Nobody listening is not an error.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn completed_analysis_reaches_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let user = Uuid::new_v4();

        bus.publish(
            PlatformEvent::new("analysis.completed", user)
                .with_source("video_analysis", 42)
                .with_payload(serde_json::json!({"result": "deepfake"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "analysis.completed");
        assert_eq!(received.source_entity_type.as_deref(), Some("video_analysis"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.payload["result"], "deepfake");
    }

    #[test]
    fn ownership_check() {
        let user = Uuid::new_v4();
        let event = PlatformEvent::new("auth.signed_in", user);
        assert!(event.is_for(user));
        assert!(!event.is_for(Uuid::new_v4()));
        assert!(event.source_entity_id.is_none());
    }

    #[tokio::test]
    async fn every_stream_gets_its_own_copy() {
        let bus = EventBus::default();
        let mut first_tab = bus.subscribe();
        let mut second_tab = bus.subscribe();

        bus.publish(PlatformEvent::new("auth.signed_out", Uuid::nil()));

        assert_eq!(first_tab.recv().await.unwrap().event_type, "auth.signed_out");
        assert_eq!(second_tab.recv().await.unwrap().event_type, "auth.signed_out");
    }

    #[test]
    fn publishing_without_streams_is_fine() {
        EventBus::default().publish(PlatformEvent::new("analysis.created", Uuid::nil()));
    }

    #[tokio::test]
    async fn slow_stream_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..3 {
            bus.publish(PlatformEvent::new("analysis.created", Uuid::nil()));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }
}
