// ABOUTME: Scripted LLM provider for chat pipeline tests
// ABOUTME: Answers classification and reply requests separately and records every request
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use async_trait::async_trait;
use mindmate_server::constants::chat::CLASSIFICATION_MAX_TOKENS;
use mindmate_server::errors::AppError;
use mindmate_server::llm::{ChatRequest, ChatResponse, LlmProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How the stub answers one kind of request
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Return this text
    Text(String),
    /// Fail as if the endpoint were unreachable
    Fail,
    /// Never answer within any reasonable test timeout
    Hang,
}

impl StubBehavior {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Provider whose answers are fixed per request kind
///
/// A request with the classification token budget is a classification
/// request; anything else is a reply request.
pub struct StubLlmProvider {
    classification: StubBehavior,
    reply: StubBehavior,
    requests: Mutex<Vec<ChatRequest>>,
    calls: AtomicUsize,
}

impl StubLlmProvider {
    pub fn new(classification: StubBehavior, reply: StubBehavior) -> Self {
        Self {
            classification,
            reply,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Classifies as `label` and replies with `reply`
    pub fn answering(label: &str, reply: &str) -> Self {
        Self::new(StubBehavior::text(label), StubBehavior::text(reply))
    }

    /// Every request fails
    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self::new(StubBehavior::Fail, StubBehavior::Fail)
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in order
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The last reply (non-classification) request
    #[allow(dead_code)]
    pub fn last_reply_request(&self) -> Option<ChatRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| !is_classification(r))
    }
}

fn is_classification(request: &ChatRequest) -> bool {
    request.max_tokens == Some(CLASSIFICATION_MAX_TOKENS)
}

#[async_trait]
impl LlmProvider for StubLlmProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let behavior = if is_classification(request) {
            self.classification.clone()
        } else {
            self.reply.clone()
        };

        match behavior {
            StubBehavior::Text(content) => Ok(ChatResponse {
                content,
                model: "stub-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            StubBehavior::Fail => Err(AppError::external_unavailable(
                "stub",
                "connection refused",
            )),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::internal("stub hang elapsed"))
            }
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
