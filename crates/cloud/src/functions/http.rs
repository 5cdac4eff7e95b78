//! HTTP transport for the `chat` callable.

use std::time::Duration;

use async_trait::async_trait;
use deepguard_core::chat::ChatMessage;

use super::{ChatFunction, ChatRequest, ChatResponse};
use crate::error::CloudError;

/// Default request timeout for the callable.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the callable.
#[derive(Debug, Clone)]
pub struct ChatFunctionConfig {
    /// Full URL of the function, e.g. `https://<project>/functions/v1/chat`.
    pub url: String,
    /// Optional bearer key sent as `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Invokes the callable with a JSON POST.
#[derive(Debug)]
pub struct HttpChatFunction {
    client: reqwest::Client,
    config: ChatFunctionConfig,
}

impl HttpChatFunction {
    pub fn new(config: ChatFunctionConfig) -> Result<Self, CloudError> {
        if config.url.trim().is_empty() {
            return Err(CloudError::Configuration("chat function URL is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CloudError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatFunction for HttpChatFunction {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, CloudError> {
        tracing::debug!(url = %self.config.url, turns = messages.len(), "Invoking chat function");

        let mut request = self
            .client
            .post(&self.config.url)
            .json(&ChatRequest { messages });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CloudError::Timeout(self.config.timeout_secs)
            } else {
                CloudError::Http(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Chat function returned error");
            return Err(CloudError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CloudError::Parse(e.to_string()))?;
        Ok(body.response)
    }
}
