//! Assistant conversation transcript.
//!
//! The transcript lives in memory only; it is never persisted.

use serde::{Deserialize, Serialize};

/// Opening assistant message every new conversation starts with.
pub const ASSISTANT_GREETING: &str = "Hello! I'm your Deep Guard AI assistant. I can help you \
understand deep fake detection, explain analysis results, or answer any questions about our \
technology. How can I help you today?";

/// Reply appended locally when the remote callable cannot be reached.
pub const ASSISTANT_APOLOGY: &str = "I'm sorry, I encountered an error. Please try again.";

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One `{role, content}` turn, the wire shape of the `chat` callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation seeded with [`ASSISTANT_GREETING`].
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(ASSISTANT_GREETING)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim a user turn; `None` for empty or whitespace-only input.
pub fn normalize_user_input(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_starts_with_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::Assistant);
        assert_eq!(conversation.messages()[0].content, ASSISTANT_GREETING);
    }

    #[test]
    fn turns_are_kept_in_order() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::user("What is a deep fake?"));
        conversation.push(ChatMessage::assistant("A synthetic video."));

        let roles: Vec<_> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
        );
        assert_eq!(conversation.last().unwrap().content, "A synthetic video.");
    }

    #[test]
    fn blank_input_is_dropped() {
        assert_eq!(normalize_user_input(""), None);
        assert_eq!(normalize_user_input("   \n\t "), None);
        assert_eq!(normalize_user_input("  hi there "), Some("hi there"));
    }

    #[test]
    fn messages_use_callable_wire_shape() {
        let value = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(value, serde_json::json!({ "role": "user", "content": "hello" }));
    }
}
