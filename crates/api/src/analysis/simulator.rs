//! Stub analysis simulator.
//!
//! No media is inspected. After a fixed delay the record stored under a
//! video URL is marked `completed` with a randomly drawn verdict (see
//! [`SimulatedOutcome::draw`]). Failures are logged and never retried; a
//! scheduled simulation cannot be cancelled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use deepguard_core::simulation::SimulatedOutcome;
use deepguard_core::types::{DbId, UserId};
use deepguard_db::models::video_analysis::CompleteVideoAnalysis;
use deepguard_db::store::{AnalysisStore, StoreError};
use deepguard_events::{event_types, EventBus, PlatformEvent};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use super::ENTITY_VIDEO_ANALYSIS;

/// A record waiting for its simulated verdict.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub record_id: DbId,
    pub user_id: UserId,
    pub video_url: String,
}

pub struct AnalysisSimulator {
    analyses: Arc<dyn AnalysisStore>,
    events: Arc<EventBus>,
    delay: Duration,
    tracker: TaskTracker,
}

impl AnalysisSimulator {
    pub fn new(analyses: Arc<dyn AnalysisStore>, events: Arc<EventBus>, delay: Duration) -> Self {
        Self {
            analyses,
            events,
            delay,
            tracker: TaskTracker::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Complete `pending` after the configured delay, on a tracked task.
    pub fn schedule(&self, pending: PendingAnalysis) -> JoinHandle<()> {
        let analyses = Arc::clone(&self.analyses);
        let events = Arc::clone(&self.events);
        let delay = self.delay;

        tracing::debug!(
            record_id = pending.record_id,
            delay_secs = delay.as_secs(),
            "Scheduled simulated analysis"
        );

        self.tracker.spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = SimulatedOutcome::draw(&mut rand::rng());
            if let Err(e) = complete(analyses.as_ref(), &events, &pending, outcome).await {
                tracing::error!(
                    record_id = pending.record_id,
                    video_url = %pending.video_url,
                    error = %e,
                    "Simulated analysis failed to update record"
                );
            }
        })
    }

    /// Number of simulations still waiting on their timer.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting new simulations and wait for the scheduled ones.
    pub async fn drain(&self) {
        self.tracker.close();
        tracing::info!(pending = self.tracker.len(), "Draining simulated analyses");
        self.tracker.wait().await;
    }
}

/// Apply `outcome` to every not-yet-completed record stored under the
/// pending video URL and announce it.
pub async fn complete(
    analyses: &dyn AnalysisStore,
    events: &EventBus,
    pending: &PendingAnalysis,
    outcome: SimulatedOutcome,
) -> Result<u64, StoreError> {
    let update = CompleteVideoAnalysis::from_outcome(outcome, Utc::now());
    let updated = analyses
        .complete_by_video_url(&pending.video_url, &update)
        .await?;

    if updated == 0 {
        tracing::warn!(
            record_id = pending.record_id,
            video_url = %pending.video_url,
            "No pending record matched the video URL"
        );
        return Ok(0);
    }

    tracing::info!(
        record_id = pending.record_id,
        result = %outcome.result,
        confidence_score = outcome.confidence_score,
        "Simulated analysis completed"
    );

    events.publish(
        PlatformEvent::new(event_types::ANALYSIS_COMPLETED, pending.user_id)
            .with_source(ENTITY_VIDEO_ANALYSIS, pending.record_id)
            .with_payload(serde_json::json!({
                "result": outcome.result,
                "confidence_score": outcome.confidence_score,
                "analysis_details": outcome.details,
            })),
    );
    Ok(updated)
}
