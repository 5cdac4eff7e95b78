//! Store traits used by the API layer.
//!
//! The handlers never touch a pool directly; they go through these traits so
//! the same workflow runs against Postgres in production and against the
//! in-memory backends in tests and database-less development.
//!
//! Ownership scoping lives here: every read takes the caller's user id.

use async_trait::async_trait;
use deepguard_core::types::{DbId, UserId};

use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, User};
use crate::models::video_analysis::{CompleteVideoAnalysis, CreateVideoAnalysis, VideoAnalysis};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::{MemoryAnalysisStore, MemoryIdentityStore};
pub use postgres::{PgAnalysisStore, PgIdentityStore};

/// Record store for video analyses.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert a `pending` / `unknown` record.
    async fn insert(&self, input: &CreateVideoAnalysis) -> Result<VideoAnalysis, StoreError>;

    /// Complete every not-yet-completed record stored under `video_url`.
    /// Returns the number of records updated.
    async fn complete_by_video_url(
        &self,
        video_url: &str,
        input: &CompleteVideoAnalysis,
    ) -> Result<u64, StoreError>;

    /// The user's records ordered by creation time, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<VideoAnalysis>, StoreError>;

    /// One of the user's records; `None` if missing or owned by someone else.
    async fn find_for_user(
        &self,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<VideoAnalysis>, StoreError>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Users and refresh-token sessions backing the identity service.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a user. A duplicate email yields [`StoreError::Duplicate`].
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError>;

    /// A session that is neither revoked nor expired.
    async fn find_active_session(&self, id: DbId) -> Result<Option<UserSession>, StoreError>;

    /// An active session by refresh token hash.
    async fn find_session_by_refresh_hash(
        &self,
        hash: &str,
    ) -> Result<Option<UserSession>, StoreError>;

    /// Returns `true` if the session was active and is now revoked.
    async fn revoke_session(&self, id: DbId) -> Result<bool, StoreError>;

    /// Returns the number of sessions revoked.
    async fn revoke_all_sessions(&self, user_id: UserId) -> Result<u64, StoreError>;
}
