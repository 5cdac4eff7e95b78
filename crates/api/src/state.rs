use std::sync::Arc;
use std::time::Duration;

use deepguard_cloud::{ChatFunction, ObjectStorage};
use deepguard_db::store::{AnalysisStore, IdentityStore};
use deepguard_events::EventBus;

use crate::analysis::{AnalysisSimulator, UploadWorkflow};
use crate::assistant::ChatRelay;
use crate::config::ServerConfig;
use crate::session::SessionProvider;

/// The external services the workflow talks to, chosen at startup.
pub struct Backends {
    pub analyses: Arc<dyn AnalysisStore>,
    pub identity: Arc<dyn IdentityStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub chat: Arc<dyn ChatFunction>,
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (everything is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record store, read directly by the list/dashboard handlers.
    pub analyses: Arc<dyn AnalysisStore>,
    pub sessions: Arc<SessionProvider>,
    pub uploads: Arc<UploadWorkflow>,
    /// Kept here so shutdown can drain pending simulations.
    pub simulator: Arc<AnalysisSimulator>,
    pub assistant: Arc<ChatRelay>,
}

impl AppState {
    /// Wire the services together around one event bus. Sessions publish to
    /// it and the event stream reads it back through the session provider.
    pub fn new(config: &ServerConfig, backends: Backends) -> Self {
        let event_bus = Arc::new(EventBus::default());

        let simulator = Arc::new(AnalysisSimulator::new(
            Arc::clone(&backends.analyses),
            Arc::clone(&event_bus),
            Duration::from_secs(config.analysis_delay_secs),
        ));
        let uploads = Arc::new(UploadWorkflow::new(
            backends.storage,
            Arc::clone(&backends.analyses),
            Arc::clone(&simulator),
            Arc::clone(&event_bus),
        ));
        let sessions = Arc::new(SessionProvider::new(
            backends.identity,
            config.jwt.clone(),
            event_bus,
        ));
        let assistant = Arc::new(ChatRelay::new(backends.chat));

        Self {
            analyses: backends.analyses,
            sessions,
            uploads,
            simulator,
            assistant,
        }
    }
}
