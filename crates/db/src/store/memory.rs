//! In-memory stores for tests and database-less development.
//!
//! State is lost on restart. Ordering and ownership rules match the
//! Postgres queries.

use async_trait::async_trait;
use chrono::Utc;
use deepguard_core::analysis::{AnalysisResult, AnalysisStatus};
use deepguard_core::types::{DbId, UserId};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnalysisStore, IdentityStore, StoreError};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, User};
use crate::models::video_analysis::{CompleteVideoAnalysis, CreateVideoAnalysis, VideoAnalysis};

// ---------------------------------------------------------------------------
// Analyses
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct AnalysisTable {
    rows: Vec<VideoAnalysis>,
    last_id: DbId,
}

/// In-memory [`AnalysisStore`].
#[derive(Debug, Default)]
pub struct MemoryAnalysisStore {
    table: RwLock<AnalysisTable>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record regardless of owner, in insertion order.
    pub async fn all(&self) -> Vec<VideoAnalysis> {
        self.table.read().await.rows.clone()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn insert(&self, input: &CreateVideoAnalysis) -> Result<VideoAnalysis, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let row = VideoAnalysis {
            id: table.last_id,
            user_id: input.user_id,
            video_url: input.video_url.clone(),
            file_name: input.file_name.clone(),
            file_size: input.file_size,
            status: AnalysisStatus::Pending,
            result: AnalysisResult::Unknown,
            confidence_score: None,
            analysis_details: None,
            created_at: now,
            completed_at: None,
            updated_at: now,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn complete_by_video_url(
        &self,
        video_url: &str,
        input: &CompleteVideoAnalysis,
    ) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        let now = Utc::now();
        let mut updated = 0;
        for row in table.rows.iter_mut().filter(|row| {
            row.video_url == video_url
                && matches!(
                    row.status,
                    AnalysisStatus::Pending | AnalysisStatus::Processing
                )
        }) {
            row.status = AnalysisStatus::Completed;
            row.result = input.result;
            row.confidence_score = Some(input.confidence_score);
            row.analysis_details = Some(Json(input.details));
            row.completed_at = Some(input.completed_at);
            row.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<VideoAnalysis>, StoreError> {
        let table = self.table.read().await;
        let mut rows: Vec<_> = table
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<VideoAnalysis>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| row.id == id && row.user_id == user_id)
            .cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct IdentityTables {
    users: Vec<User>,
    sessions: Vec<UserSession>,
    last_session_id: DbId,
}

/// In-memory [`IdentityStore`].
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    tables: RwLock<IdentityTables>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::Duplicate("uq_users_email".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_session_id += 1;
        let now = Utc::now();
        let session = UserSession {
            id: tables.last_session_id,
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash.clone(),
            expires_at: input.expires_at,
            is_revoked: false,
            created_at: now,
            updated_at: now,
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_active_session(&self, id: DbId) -> Result<Option<UserSession>, StoreError> {
        let tables = self.tables.read().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.id == id && s.is_active(now))
            .cloned())
    }

    async fn find_session_by_refresh_hash(
        &self,
        hash: &str,
    ) -> Result<Option<UserSession>, StoreError> {
        let tables = self.tables.read().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.refresh_token_hash == hash && s.is_active(now))
            .cloned())
    }

    async fn revoke_session(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        match tables
            .sessions
            .iter_mut()
            .find(|s| s.id == id && !s.is_revoked)
        {
            Some(session) => {
                session.is_revoked = true;
                session.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_sessions(&self, user_id: UserId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut revoked = 0;
        for session in tables
            .sessions
            .iter_mut()
            .filter(|s| s.user_id == user_id && !s.is_revoked)
        {
            session.is_revoked = true;
            session.updated_at = now;
            revoked += 1;
        }
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use deepguard_core::analysis::AnalysisDetails;

    use super::*;

    fn upload(user_id: UserId, url: &str) -> CreateVideoAnalysis {
        CreateVideoAnalysis {
            user_id,
            video_url: url.to_string(),
            file_name: "clip.mp4".to_string(),
            file_size: 10 * 1024 * 1024,
        }
    }

    fn completion(result: AnalysisResult) -> CompleteVideoAnalysis {
        CompleteVideoAnalysis {
            result,
            confidence_score: 88,
            details: AnalysisDetails {
                temporal_anomalies: true,
                ..Default::default()
            },
            completed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_creates_pending_unknown_record() {
        let store = MemoryAnalysisStore::new();
        let row = store.insert(&upload(Uuid::new_v4(), "u/1.mp4")).await.unwrap();

        assert_eq!(row.id, 1);
        assert_eq!(row.status, AnalysisStatus::Pending);
        assert_eq!(row.result, AnalysisResult::Unknown);
        assert!(row.confidence_score.is_none());
        assert!(row.completed_at.is_none());
    }

    #[tokio::test]
    async fn complete_matches_on_video_url_once() {
        let store = MemoryAnalysisStore::new();
        let user = Uuid::new_v4();
        store.insert(&upload(user, "u/1.mp4")).await.unwrap();
        store.insert(&upload(user, "u/2.mp4")).await.unwrap();

        let updated = store
            .complete_by_video_url("u/1.mp4", &completion(AnalysisResult::Deepfake))
            .await
            .unwrap();
        assert_eq!(updated, 1);

        // A second completion of the same record is a no-op.
        let again = store
            .complete_by_video_url("u/1.mp4", &completion(AnalysisResult::Authentic))
            .await
            .unwrap();
        assert_eq!(again, 0);

        let rows = store.all().await;
        assert_eq!(rows[0].status, AnalysisStatus::Completed);
        assert_eq!(rows[0].result, AnalysisResult::Deepfake);
        assert_eq!(rows[0].confidence_score, Some(88));
        assert!(rows[0].analysis_details.as_ref().unwrap().0.temporal_anomalies);
        assert_eq!(rows[1].status, AnalysisStatus::Pending);
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let store = MemoryAnalysisStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.insert(&upload(alice, "a/1.mp4")).await.unwrap();
        store.insert(&upload(bob, "b/1.mp4")).await.unwrap();
        store.insert(&upload(alice, "a/2.mp4")).await.unwrap();

        let rows = store.list_for_user(alice).await.unwrap();
        let urls: Vec<_> = rows.iter().map(|r| r.video_url.as_str()).collect();
        assert_eq!(urls, vec!["a/2.mp4", "a/1.mp4"]);
    }

    #[tokio::test]
    async fn find_hides_other_users_records() {
        let store = MemoryAnalysisStore::new();
        let alice = Uuid::new_v4();
        let row = store.insert(&upload(alice, "a/1.mp4")).await.unwrap();

        assert!(store.find_for_user(alice, row.id).await.unwrap().is_some());
        assert!(store
            .find_for_user(Uuid::new_v4(), row.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryIdentityStore::new();
        let input = CreateUser {
            email: "a@example.com".into(),
            password_hash: "hash".into(),
        };
        store.create_user(&input).await.unwrap();
        assert_matches!(
            store.create_user(&input).await,
            Err(StoreError::Duplicate(_))
        );
    }

    #[tokio::test]
    async fn revoked_sessions_are_not_found() {
        let store = MemoryIdentityStore::new();
        let user = store
            .create_user(&CreateUser {
                email: "a@example.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        let session = store
            .create_session(&CreateSession {
                user_id: user.id,
                refresh_token_hash: "abc".into(),
                expires_at: Utc::now() + chrono::Duration::days(1),
            })
            .await
            .unwrap();

        assert!(store.find_active_session(session.id).await.unwrap().is_some());
        assert_eq!(store.revoke_all_sessions(user.id).await.unwrap(), 1);
        assert!(store.find_active_session(session.id).await.unwrap().is_none());
        assert!(store
            .find_session_by_refresh_hash("abc")
            .await
            .unwrap()
            .is_none());
        assert!(!store.revoke_session(session.id).await.unwrap());
    }

    #[tokio::test]
    async fn expired_sessions_are_not_active() {
        let store = MemoryIdentityStore::new();
        let session = store
            .create_session(&CreateSession {
                user_id: Uuid::new_v4(),
                refresh_token_hash: "old".into(),
                expires_at: Utc::now() - chrono::Duration::minutes(1),
            })
            .await
            .unwrap();
        assert!(store.find_active_session(session.id).await.unwrap().is_none());
    }
}
