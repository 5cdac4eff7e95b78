//! Assistant relay: keeps one transcript per signed-in session and forwards
//! it to the `chat` callable.
//!
//! Sessions never see each other's transcripts, even when they belong to the
//! same user. At most one request per session is outstanding; a second send
//! while the first is in flight is rejected with a conflict. The transcript
//! lock is never held across the callable await.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use deepguard_cloud::ChatFunction;
use deepguard_core::chat::{normalize_user_input, ChatMessage, Conversation, ASSISTANT_APOLOGY};
use deepguard_core::error::CoreError;
use deepguard_core::types::{DbId, UserId};
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug)]
struct Slot {
    user_id: UserId,
    conversation: Conversation,
    in_flight: bool,
}

impl Slot {
    fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            conversation: Conversation::new(),
            in_flight: false,
        }
    }
}

/// Result of one send.
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    /// The assistant turn appended by this send.
    pub reply: ChatMessage,
    /// Full transcript after the send.
    pub messages: Vec<ChatMessage>,
    /// `true` when the callable failed and `reply` is the fixed apology.
    pub degraded: bool,
}

pub struct ChatRelay {
    function: Arc<dyn ChatFunction>,
    slots: Mutex<HashMap<DbId, Slot>>,
}

impl ChatRelay {
    pub fn new(function: Arc<dyn ChatFunction>) -> Self {
        Self {
            function,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Append a user turn, invoke the callable with the whole transcript,
    /// and append its reply (or the apology on failure).
    ///
    /// Blank input is rejected without invoking anything. If the session ends
    /// while the callable is running, the reply is returned but not kept.
    pub async fn send(
        &self,
        user_id: UserId,
        session_id: DbId,
        input: &str,
    ) -> AppResult<ChatExchange> {
        let content = normalize_user_input(input).ok_or_else(|| {
            AppError::Core(CoreError::Validation("Message must not be empty".into()))
        })?;

        let transcript = {
            let mut slots = self.lock();
            let slot = slots
                .entry(session_id)
                .or_insert_with(|| Slot::new(user_id));
            if slot.in_flight {
                return Err(AppError::Core(CoreError::Conflict(
                    "A reply is still being generated".into(),
                )));
            }
            slot.conversation.push(ChatMessage::user(content));
            slot.in_flight = true;
            slot.conversation.messages().to_vec()
        };
        let _in_flight = InFlight {
            relay: self,
            session_id,
        };

        let (reply, degraded) = match self.function.invoke(&transcript).await {
            Ok(response) => (ChatMessage::assistant(response), false),
            Err(e) => {
                tracing::warn!(user_id = %user_id, session_id, error = %e, "Chat function failed");
                (ChatMessage::assistant(ASSISTANT_APOLOGY), true)
            }
        };

        let messages = match self.lock().get_mut(&session_id) {
            Some(slot) => {
                slot.conversation.push(reply.clone());
                slot.conversation.messages().to_vec()
            }
            None => {
                let mut messages = transcript;
                messages.push(reply.clone());
                messages
            }
        };
        Ok(ChatExchange {
            reply,
            messages,
            degraded,
        })
    }

    /// The session's transcript; a fresh one holds only the greeting.
    pub fn transcript(&self, session_id: DbId) -> Vec<ChatMessage> {
        self.lock()
            .get(&session_id)
            .map(|slot| slot.conversation.messages().to_vec())
            .unwrap_or_else(|| Conversation::new().messages().to_vec())
    }

    /// Drop the transcript back to the greeting. An in-flight reply still
    /// lands on the new transcript.
    pub fn reset(&self, session_id: DbId) {
        if let Some(slot) = self.lock().get_mut(&session_id) {
            slot.conversation = Conversation::new();
        }
    }

    /// Move a transcript onto the session that replaced it after a token
    /// refresh. A reply still in flight for the old session is not kept.
    pub fn carry_over(&self, from: DbId, to: DbId) {
        let mut slots = self.lock();
        if let Some(mut slot) = slots.remove(&from) {
            slot.in_flight = false;
            slots.insert(to, slot);
        }
    }

    /// Forget every transcript of a signed-out user.
    pub fn end_user(&self, user_id: UserId) {
        self.lock().retain(|_, slot| slot.user_id != user_id);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DbId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag when a send finishes or its future is dropped.
struct InFlight<'a> {
    relay: &'a ChatRelay,
    session_id: DbId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(slot) = self.relay.lock().get_mut(&self.session_id) {
            slot.in_flight = false;
        }
    }
}
