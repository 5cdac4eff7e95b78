//! Upload workflow: validate, store the object, insert the record, then
//! hand it to the simulator.
//!
//! There is no compensation: if the insert fails after the object was
//! stored, the object stays orphaned in storage.

use std::sync::Arc;

use chrono::Utc;
use deepguard_cloud::ObjectStorage;
use deepguard_core::types::UserId;
use deepguard_core::upload::{object_path, validate_upload};
use deepguard_db::models::video_analysis::{CreateVideoAnalysis, VideoAnalysis};
use deepguard_db::store::AnalysisStore;
use deepguard_events::{event_types, EventBus, PlatformEvent};

use super::simulator::{AnalysisSimulator, PendingAnalysis};
use super::ENTITY_VIDEO_ANALYSIS;
use crate::error::AppResult;

/// A fully received upload.
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct UploadWorkflow {
    storage: Arc<dyn ObjectStorage>,
    analyses: Arc<dyn AnalysisStore>,
    simulator: Arc<AnalysisSimulator>,
    events: Arc<EventBus>,
}

impl UploadWorkflow {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        analyses: Arc<dyn AnalysisStore>,
        simulator: Arc<AnalysisSimulator>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            storage,
            analyses,
            simulator,
            events,
        }
    }

    /// Run the workflow for one video and return the new `pending` record.
    ///
    /// Validation failures return before any storage or store call.
    pub async fn submit(&self, user_id: UserId, video: UploadedVideo) -> AppResult<VideoAnalysis> {
        let file_size = video.bytes.len() as u64;
        validate_upload(Some(&video.content_type), file_size)?;

        let path = object_path(user_id, &video.file_name, Utc::now().timestamp_millis());
        self.storage
            .upload(&path, video.bytes, &video.content_type)
            .await?;
        let video_url = self.storage.public_url(&path);
        tracing::debug!(user_id = %user_id, path = %path, file_size, "Stored uploaded video");

        let record = self
            .analyses
            .insert(&CreateVideoAnalysis {
                user_id,
                video_url: video_url.clone(),
                file_name: video.file_name,
                file_size: file_size as i64,
            })
            .await?;
        tracing::info!(
            user_id = %user_id,
            record_id = record.id,
            file_size,
            "Video analysis record created"
        );

        self.events.publish(
            PlatformEvent::new(event_types::ANALYSIS_CREATED, user_id)
                .with_source(ENTITY_VIDEO_ANALYSIS, record.id)
                .with_payload(serde_json::json!({
                    "file_name": record.file_name,
                    "video_url": record.video_url,
                })),
        );

        self.simulator.schedule(PendingAnalysis {
            record_id: record.id,
            user_id,
            video_url,
        });

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use deepguard_cloud::{CloudError, MemoryObjectStorage};
    use deepguard_core::analysis::{AnalysisResult, AnalysisStatus};
    use deepguard_core::error::CoreError;
    use deepguard_core::upload::MAX_UPLOAD_BYTES;
    use deepguard_db::store::MemoryAnalysisStore;
    use uuid::Uuid;

    use super::*;
    use crate::error::AppError;

    struct Harness {
        storage: Arc<MemoryObjectStorage>,
        store: Arc<MemoryAnalysisStore>,
        workflow: UploadWorkflow,
    }

    fn harness() -> Harness {
        let storage = Arc::new(MemoryObjectStorage::default());
        let store = Arc::new(MemoryAnalysisStore::new());
        let events = Arc::new(EventBus::default());
        let simulator = Arc::new(AnalysisSimulator::new(
            store.clone(),
            events.clone(),
            Duration::from_secs(5),
        ));
        let workflow = UploadWorkflow::new(storage.clone(), store.clone(), simulator, events);
        Harness {
            storage,
            store,
            workflow,
        }
    }

    fn video(name: &str, content_type: &str, len: usize) -> UploadedVideo {
        UploadedVideo {
            file_name: name.into(),
            content_type: content_type.into(),
            bytes: vec![0u8; len],
        }
    }

    #[tokio::test]
    async fn stores_object_and_inserts_pending_record() {
        let h = harness();
        let user = Uuid::new_v4();

        let record = h
            .workflow
            .submit(user, video("clip.mp4", "video/mp4", 1024))
            .await
            .unwrap();

        assert_eq!(record.status, AnalysisStatus::Pending);
        assert_eq!(record.result, AnalysisResult::Unknown);
        assert_eq!(record.file_name, "clip.mp4");
        assert_eq!(record.file_size, 1024);
        assert!(record.confidence_score.is_none());

        let paths = h.storage.paths().await;
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with(&format!("{user}/")));
        assert!(paths[0].ends_with(".mp4"));
        assert_eq!(record.video_url, h.storage.public_url(&paths[0]));
    }

    #[tokio::test]
    async fn non_video_is_rejected_before_any_io() {
        let h = harness();
        let err = h
            .workflow
            .submit(Uuid::new_v4(), video("image.png", "image/png", 10))
            .await
            .unwrap_err();

        assert_matches!(err, AppError::Core(CoreError::Validation(_)));
        assert!(h.storage.is_empty().await);
        assert!(h.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn exactly_the_limit_is_accepted() {
        let h = harness();
        let record = h
            .workflow
            .submit(
                Uuid::new_v4(),
                video("big.mp4", "video/mp4", MAX_UPLOAD_BYTES as usize),
            )
            .await
            .unwrap();
        assert_eq!(record.file_size as u64, MAX_UPLOAD_BYTES);
    }

    struct FailingStorage;

    #[async_trait]
    impl ObjectStorage for FailingStorage {
        async fn upload(&self, _: &str, _: Vec<u8>, _: &str) -> Result<(), CloudError> {
            Err(CloudError::Storage("bucket offline".into()))
        }

        fn public_url(&self, path: &str) -> String {
            path.to_string()
        }
    }

    #[tokio::test]
    async fn storage_failure_creates_no_record() {
        let store = Arc::new(MemoryAnalysisStore::new());
        let events = Arc::new(EventBus::default());
        let simulator = Arc::new(AnalysisSimulator::new(
            store.clone(),
            events.clone(),
            Duration::from_secs(5),
        ));
        let workflow = UploadWorkflow::new(Arc::new(FailingStorage), store.clone(), simulator, events);

        let err = workflow
            .submit(Uuid::new_v4(), video("clip.mp4", "video/mp4", 10))
            .await
            .unwrap_err();
        assert_matches!(err, AppError::Cloud(CloudError::Storage(_)));
        assert!(store.all().await.is_empty());
    }
}
