//! Local stand-in for the `chat` callable.
//!
//! Used when no function URL is configured. Replies are canned and keyed on
//! a few words in the latest user turn; no model is involved.

use async_trait::async_trait;
use deepguard_core::chat::{ChatMessage, ChatRole};

use super::ChatFunction;
use crate::error::CloudError;

const WHAT_IS_A_DEEPFAKE: &str = "A deep fake is a video or image in which a person's face or \
voice has been synthetically altered, usually with generative neural networks, so that they \
appear to say or do something they never did.";

const HOW_DETECTION_WORKS: &str = "Uploaded videos are queued for analysis and checked for four \
signals: facial inconsistencies, temporal anomalies, audio-visual mismatch, and frequency \
artifacts. The result and the flagged signals appear on your dashboard once the analysis \
completes.";

const CONFIDENCE_SCORE: &str = "The confidence score is a percentage describing how strongly the \
analysis supports its verdict. Scores range from 70 to 99; higher means the verdict is \
more certain.";

const FALLBACK: &str = "I can help with questions about deep fakes, how detection works, and how \
to read your analysis results. Could you tell me a bit more about what you'd like to know?";

#[derive(Debug, Clone, Copy, Default)]
pub struct CannedChatFunction;

impl CannedChatFunction {
    pub fn new() -> Self {
        Self
    }

    fn reply_for(question: &str) -> &'static str {
        let question = question.to_lowercase();
        if question.contains("confidence") || question.contains("score") {
            CONFIDENCE_SCORE
        } else if question.contains("detect") || question.contains("work") {
            HOW_DETECTION_WORKS
        } else if question.contains("deep fake") || question.contains("deepfake") {
            WHAT_IS_A_DEEPFAKE
        } else {
            FALLBACK
        }
    }
}

#[async_trait]
impl ChatFunction for CannedChatFunction {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, CloudError> {
        let question = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(Self::reply_for(question).to_string())
    }
}
