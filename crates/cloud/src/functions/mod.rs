//! Callable remote functions.
//!
//! A callable is invoked by name with a JSON body and returns a JSON body.
//! The only one the service uses is `chat`: request `{ messages: [{role,
//! content}] }`, response `{ response: string }`.

use async_trait::async_trait;
use deepguard_core::chat::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

pub mod canned;
pub mod http;

pub use canned::CannedChatFunction;
pub use http::{ChatFunctionConfig, HttpChatFunction};

/// Request body of the `chat` callable.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [ChatMessage],
}

/// Response body of the `chat` callable.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// The assistant callable: full transcript in, one reply out.
#[async_trait]
pub trait ChatFunction: Send + Sync {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, CloudError>;
}
