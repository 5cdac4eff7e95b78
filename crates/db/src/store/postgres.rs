//! Postgres-backed stores delegating to the repositories.

use async_trait::async_trait;
use deepguard_core::types::{DbId, UserId};

use super::{AnalysisStore, IdentityStore, StoreError};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, User};
use crate::models::video_analysis::{CompleteVideoAnalysis, CreateVideoAnalysis, VideoAnalysis};
use crate::repositories::{SessionRepo, UserRepo, VideoAnalysisRepo};
use crate::DbPool;

/// [`AnalysisStore`] over the `video_analyses` table.
#[derive(Debug, Clone)]
pub struct PgAnalysisStore {
    pool: DbPool,
}

impl PgAnalysisStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn insert(&self, input: &CreateVideoAnalysis) -> Result<VideoAnalysis, StoreError> {
        Ok(VideoAnalysisRepo::create(&self.pool, input).await?)
    }

    async fn complete_by_video_url(
        &self,
        video_url: &str,
        input: &CompleteVideoAnalysis,
    ) -> Result<u64, StoreError> {
        Ok(VideoAnalysisRepo::complete_by_video_url(&self.pool, video_url, input).await?)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<VideoAnalysis>, StoreError> {
        Ok(VideoAnalysisRepo::list_by_user(&self.pool, user_id).await?)
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<VideoAnalysis>, StoreError> {
        Ok(VideoAnalysisRepo::find_by_id_for_user(&self.pool, id, user_id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

/// [`IdentityStore`] over the `users` and `user_sessions` tables.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: DbPool,
}

impl PgIdentityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_insert)
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn find_active_session(&self, id: DbId) -> Result<Option<UserSession>, StoreError> {
        Ok(SessionRepo::find_active_by_id(&self.pool, id).await?)
    }

    async fn find_session_by_refresh_hash(
        &self,
        hash: &str,
    ) -> Result<Option<UserSession>, StoreError> {
        Ok(SessionRepo::find_by_refresh_token_hash(&self.pool, hash).await?)
    }

    async fn revoke_session(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(SessionRepo::revoke(&self.pool, id).await?)
    }

    async fn revoke_all_sessions(&self, user_id: UserId) -> Result<u64, StoreError> {
        Ok(SessionRepo::revoke_all_for_user(&self.pool, user_id).await?)
    }
}
