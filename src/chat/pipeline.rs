// ABOUTME: Per-message chat pipeline: validate, classify, retrieve, compose, complete
// ABOUTME: Owns no session state; history comes in with each call and goes back truncated
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! # Chat Pipeline
//!
//! Each message is classified, optionally enriched with knowledge base
//! guidance, composed into a prompt, and completed. Nothing in between is
//! durable. Provider failures never fail the exchange: classification falls
//! back to neutral and the reply falls back to a fixed apology.

use super::emotion::{Classification, EmotionClassifier, PromptedEmotionClassifier};
use super::knowledge::KnowledgeBase;
use crate::config::ChatConfig;
use crate::constants::chat::{FALLBACK_RESPONSE, RESPONSE_MAX_TOKENS, RESPONSE_TEMPERATURE};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{casual_response_prompt, supportive_response_prompt, SYSTEM_PROMPT};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{ChatExchange, ConversationTurn};
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Reply produced by [`ChatPipeline::compose_response`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReply {
    /// Text shown to the user
    pub text: String,
    /// True when the provider failed and the apology was returned
    pub degraded: bool,
}

/// Everything a caller needs after one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    /// Classification and reply
    pub exchange: ChatExchange,
    /// Updated history for the caller to store and replay next turn
    pub history: Vec<ConversationTurn>,
    /// Classification fell back to neutral
    pub classification_degraded: bool,
    /// Reply fell back to the apology
    pub response_degraded: bool,
}

/// Emotion-aware reply pipeline
#[derive(Clone)]
pub struct ChatPipeline {
    provider: Arc<dyn LlmProvider>,
    classifier: Arc<dyn EmotionClassifier>,
    knowledge: Arc<KnowledgeBase>,
    config: ChatConfig,
}

impl ChatPipeline {
    /// Pipeline using the prompted classifier on the same provider
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        knowledge: Arc<KnowledgeBase>,
        config: ChatConfig,
    ) -> Self {
        let classifier = Arc::new(PromptedEmotionClassifier::new(
            Arc::clone(&provider),
            config.completion_timeout,
        ));
        Self {
            provider,
            classifier,
            knowledge,
            config,
        }
    }

    /// Replace the emotion classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Active limits
    #[must_use]
    pub const fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Knowledge base in use
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Reject empty or oversized messages before any network call
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank message and `ValueOutOfRange` for one
    /// longer than the configured limit
    pub fn validate_message<'a>(&self, message: &'a str) -> AppResult<&'a str> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("Message is required"));
        }
        let chars = trimmed.chars().count();
        if chars > self.config.max_message_chars {
            return Err(AppError::out_of_range(format!(
                "Message is {chars} characters; the limit is {}",
                self.config.max_message_chars
            )));
        }
        Ok(trimmed)
    }

    /// Classify a message, never failing
    pub async fn classify_emotion(&self, message: &str) -> Classification {
        self.classifier.classify(message).await
    }

    /// Retrieve guidance for the emotional branch
    #[must_use]
    pub fn retrieve_knowledge(&self, message: &str) -> String {
        self.knowledge.retrieve(message, self.config.knowledge_top_k)
    }

    /// Messages sent to the provider for a reply
    ///
    /// System prompt, then the trailing history window, then the composed
    /// instruction as the final user turn.
    #[must_use]
    pub fn compose_prompt(
        &self,
        message: &str,
        is_emotional: bool,
        history: &[ConversationTurn],
    ) -> Vec<ChatMessage> {
        let instruction = if is_emotional {
            supportive_response_prompt(message, &self.retrieve_knowledge(message))
        } else {
            casual_response_prompt(message)
        };

        let window_start = history.len().saturating_sub(self.config.history_window);
        let mut messages = Vec::with_capacity(history.len() - window_start + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(history[window_start..].iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(instruction));
        messages
    }

    /// Request a reply and record the exchange in `history`
    ///
    /// On success the user message and reply are appended and `history` is cut
    /// to the most recent retained turns. On provider failure the apology is
    /// returned and `history` is left untouched.
    #[instrument(skip_all, fields(is_emotional = is_emotional, history_len = history.len()))]
    pub async fn compose_response(
        &self,
        message: &str,
        is_emotional: bool,
        history: &mut Vec<ConversationTurn>,
    ) -> ComposedReply {
        let request = ChatRequest::new(self.compose_prompt(message, is_emotional, history))
            .with_max_tokens(RESPONSE_MAX_TOKENS)
            .with_temperature(RESPONSE_TEMPERATURE);

        let result = timeout(self.config.completion_timeout, self.provider.complete(&request))
            .await
            .map_or_else(
                |_| {
                    Err(AppError::external_unavailable(
                        self.provider.name(),
                        "Reply generation timed out",
                    ))
                },
                |result| result,
            );

        match result {
            Ok(response) => {
                history.push(ConversationTurn::user(message));
                history.push(ConversationTurn::assistant(response.content.clone()));
                truncate_history(history, self.config.history_retained);
                ComposedReply {
                    text: response.content,
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(
                    error.code = ?e.code,
                    error.message = %e.message,
                    degraded = true,
                    "Reply generation failed, returning fallback response"
                );
                ComposedReply {
                    text: FALLBACK_RESPONSE.to_owned(),
                    degraded: true,
                }
            }
        }
    }

    /// Run the whole pipeline for one message
    ///
    /// # Errors
    ///
    /// Only input validation fails; provider problems degrade instead
    pub async fn handle_message(
        &self,
        message: &str,
        mut history: Vec<ConversationTurn>,
    ) -> AppResult<ChatOutcome> {
        let message = self.validate_message(message)?;

        let classification = self.classify_emotion(message).await;
        let reply = self
            .compose_response(message, classification.is_emotional, &mut history)
            .await;

        info!(
            is_emotional = classification.is_emotional,
            classification_degraded = classification.degraded,
            response_degraded = reply.degraded,
            history_len = history.len(),
            "Chat message handled"
        );

        Ok(ChatOutcome {
            exchange: ChatExchange {
                is_emotional: classification.is_emotional,
                response: reply.text,
            },
            history,
            classification_degraded: classification.degraded,
            response_degraded: reply.degraded,
        })
    }

    /// [`Self::handle_message`] that stops as soon as `token` is cancelled
    ///
    /// The in-flight provider call is dropped rather than awaited.
    ///
    /// # Errors
    ///
    /// Returns `OperationCancelled` if the token fires first, otherwise the
    /// same errors as [`Self::handle_message`]
    pub async fn handle_message_cancellable(
        &self,
        message: &str,
        history: Vec<ConversationTurn>,
        token: &CancellationToken,
    ) -> AppResult<ChatOutcome> {
        if token.is_cancelled() {
            return Err(AppError::cancelled("Chat request"));
        }

        tokio::select! {
            biased;
            () = token.cancelled() => {
                info!("Chat request cancelled by caller");
                Err(AppError::cancelled("Chat request"))
            }
            result = self.handle_message(message, history) => result,
        }
    }
}

/// Keep only the most recent `retained` turns
pub fn truncate_history(history: &mut Vec<ConversationTurn>, retained: usize) {
    if history.len() > retained {
        history.drain(..history.len() - retained);
    }
}
