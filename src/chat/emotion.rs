// ABOUTME: Pluggable emotion classification for incoming chat messages
// ABOUTME: Prompted LLM implementation that fails safe to neutral and reports degraded mode
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use crate::constants::chat::{
    CLASSIFICATION_MAX_TOKENS, CLASSIFICATION_TEMPERATURE, EMOTIONAL_LABEL,
};
use crate::errors::AppError;
use crate::llm::prompts::emotion_classifier_prompt;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Outcome of classifying one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the message warrants the empathetic branch
    pub is_emotional: bool,
    /// True when the classifier could not run and fell back to neutral
    pub degraded: bool,
}

impl Classification {
    /// Successful classification
    #[must_use]
    pub const fn decided(is_emotional: bool) -> Self {
        Self {
            is_emotional,
            degraded: false,
        }
    }

    /// Fail-safe neutral result
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            is_emotional: false,
            degraded: true,
        }
    }
}

/// Binary emotional/neutral judgment of a chat message
///
/// Never fails: implementations degrade to [`Classification::fallback`].
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify a validated, non-empty message
    async fn classify(&self, message: &str) -> Classification;
}

/// Classifier that asks the completion provider for an EMOTIONAL/NEUTRAL label
pub struct PromptedEmotionClassifier {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl PromptedEmotionClassifier {
    /// Create a classifier over a provider with a per-call timeout
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Whether a provider reply carries the emotional label, ignoring case
    #[must_use]
    pub fn parse_label(reply: &str) -> bool {
        reply.to_uppercase().contains(EMOTIONAL_LABEL)
    }

    async fn request_label(&self, message: &str) -> Result<String, AppError> {
        let request = ChatRequest::new(vec![ChatMessage::user(emotion_classifier_prompt(message))])
            .with_max_tokens(CLASSIFICATION_MAX_TOKENS)
            .with_temperature(CLASSIFICATION_TEMPERATURE);

        timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_or_else(
                |_| {
                    Err(AppError::external_unavailable(
                        self.provider.name(),
                        "Emotion classification timed out",
                    ))
                },
                |result| result.map(|response| response.content),
            )
    }
}

#[async_trait]
impl EmotionClassifier for PromptedEmotionClassifier {
    async fn classify(&self, message: &str) -> Classification {
        match self.request_label(message).await {
            Ok(reply) => {
                let is_emotional = Self::parse_label(&reply);
                debug!(is_emotional, "Classified chat message");
                Classification::decided(is_emotional)
            }
            Err(e) => {
                warn!(
                    error.code = ?e.code,
                    error.message = %e.message,
                    degraded = true,
                    "Emotion classification failed, treating message as neutral"
                );
                Classification::fallback()
            }
        }
    }
}
