//! User session (refresh token) model and DTOs.

use deepguard_core::types::{DbId, Timestamp, UserId};
use sqlx::FromRow;

/// A row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: UserId,
    /// SHA-256 hex digest of the refresh token; the plaintext is never stored.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserSession {
    /// Not revoked and not yet expired.
    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// DTO for creating a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: UserId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
