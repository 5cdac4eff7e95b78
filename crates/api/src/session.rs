//! Session provider: sign-up, sign-in, sign-out, token refresh, the
//! "current user or none" query, and change notifications.
//!
//! Every access token is bound to a session row (`sid` claim). A token is
//! only honoured while that session is active, so signing out takes effect
//! immediately rather than at token expiry.

use std::sync::Arc;

use chrono::Utc;
use deepguard_core::error::CoreError;
use deepguard_core::types::{DbId, UserId};
use deepguard_db::models::session::CreateSession;
use deepguard_db::models::user::{CreateUser, User};
use deepguard_db::store::{IdentityStore, StoreError};
use deepguard_events::{event_types, EventBus, PlatformEvent};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, validate_token, JwtConfig,
};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// The signed-in user as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    /// Session the presented token belongs to.
    #[serde(skip)]
    pub session_id: DbId,
}

/// Tokens handed to a client after sign-up, sign-in, or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

/// A refreshed session and the session it replaced.
#[derive(Debug, Clone)]
pub struct Rotation {
    pub session: Session,
    pub replaced_session_id: DbId,
}

pub struct SessionProvider {
    identity: Arc<dyn IdentityStore>,
    jwt: JwtConfig,
    events: Arc<EventBus>,
}

impl SessionProvider {
    pub fn new(identity: Arc<dyn IdentityStore>, jwt: JwtConfig, events: Arc<EventBus>) -> Self {
        Self {
            identity,
            jwt,
            events,
        }
    }

    /// Register a new account and sign it in.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = normalize_email(email)?;
        validate_password_strength(password, MIN_PASSWORD_LENGTH)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let user = match self
            .identity
            .create_user(&CreateUser {
                email,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            Err(StoreError::Duplicate(_)) => {
                return Err(AppError::Core(CoreError::Conflict(
                    "An account with this email already exists".into(),
                )))
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(user_id = %user.id, "User signed up");

        let session = self.open_session(&user).await?;
        self.notify(event_types::AUTH_SIGNED_UP, user.id);
        self.notify(event_types::AUTH_SIGNED_IN, user.id);
        Ok(session)
    }

    /// Exchange email and password for a session.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = normalize_email(email)
            .map_err(|_| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

        let user = self
            .identity
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !password_valid {
            tracing::info!(user_id = %user.id, "Sign-in rejected: wrong password");
            return Err(AppError::Core(CoreError::Unauthorized(
                INVALID_CREDENTIALS.into(),
            )));
        }

        let session = self.open_session(&user).await?;
        tracing::info!(user_id = %user.id, "User signed in");
        self.notify(event_types::AUTH_SIGNED_IN, user.id);
        Ok(session)
    }

    /// Revoke every session of the user.
    pub async fn sign_out(&self, user_id: UserId) -> AppResult<()> {
        let revoked = self.identity.revoke_all_sessions(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "User signed out");
        self.notify(event_types::AUTH_SIGNED_OUT, user_id);
        Ok(())
    }

    /// Rotate a refresh token: the old session is revoked and a new one issued.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<Rotation> {
        let invalid =
            || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

        let hash = hash_refresh_token(refresh_token);
        let old = self
            .identity
            .find_session_by_refresh_hash(&hash)
            .await?
            .ok_or_else(invalid)?;

        // Losing the race against a concurrent refresh of the same token.
        if !self.identity.revoke_session(old.id).await? {
            return Err(invalid());
        }

        let user = self
            .identity
            .find_user_by_id(old.user_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

        let session = self.open_session(&user).await?;
        tracing::debug!(
            user_id = %user.id,
            old_session_id = old.id,
            new_session_id = session.user.session_id,
            "Session refreshed"
        );
        self.notify(event_types::AUTH_TOKEN_REFRESHED, user.id);
        Ok(Rotation {
            session,
            replaced_session_id: old.id,
        })
    }

    /// Resolve an access token to its user, or `None` when the token is
    /// invalid, expired, or its session has been revoked.
    pub async fn current(&self, access_token: &str) -> AppResult<Option<SessionUser>> {
        let Ok(claims) = validate_token(access_token, &self.jwt) else {
            return Ok(None);
        };

        let session = self.identity.find_active_session(claims.sid).await?;
        Ok(session
            .filter(|s| s.user_id == claims.sub)
            .map(|s| SessionUser {
                id: claims.sub,
                email: claims.email,
                session_id: s.id,
            }))
    }

    /// Session change notifications. Receivers see events for every user and
    /// filter with [`PlatformEvent::is_for`].
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.events.subscribe()
    }

    async fn open_session(&self, user: &User) -> AppResult<Session> {
        let (refresh_token, refresh_hash) = generate_refresh_token();
        let expires_at = Utc::now() + chrono::Duration::days(self.jwt.refresh_token_expiry_days);

        let row = self
            .identity
            .create_session(&CreateSession {
                user_id: user.id,
                refresh_token_hash: refresh_hash,
                expires_at,
            })
            .await?;

        let access_token = generate_access_token(user.id, row.id, &user.email, &self.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

        Ok(Session {
            access_token,
            refresh_token,
            token_type: "bearer",
            expires_in: self.jwt.access_token_expiry_secs(),
            user: SessionUser {
                id: user.id,
                email: user.email.clone(),
                session_id: row.id,
            },
        })
    }

    fn notify(&self, event_type: &str, user_id: UserId) {
        self.events.publish(PlatformEvent::new(event_type, user_id));
    }
}

/// Trim and lowercase an email address; it must have a non-empty local part
/// and domain around a single `@`.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(CoreError::Validation("A valid email address is required".into())),
    }
}
