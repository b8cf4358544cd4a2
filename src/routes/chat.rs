// ABOUTME: Chat route handler for the emotion-aware reply pipeline
// ABOUTME: Validates the raw JSON body, runs the pipeline, and returns the updated history
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! Chat route
//!
//! `POST /api/chat` accepts `{message, conversationHistory?}` and returns
//! `{response, isEmotional, conversationHistory}`. The body is inspected as
//! raw JSON so a missing or non-string `message` is a 400 rather than an
//! extractor rejection.

use super::{parse_json_body, ServerResources};
use crate::errors::AppError;
use crate::models::{ConversationTurn, TurnRole};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Reply body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseBody {
    /// Assistant reply
    pub response: String,
    /// Whether the message was classified as emotional
    pub is_emotional: bool,
    /// History to send back with the next message
    pub conversation_history: Vec<ConversationTurn>,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat", post(Self::send_message))
            .with_state(resources)
    }

    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let payload: Value = parse_json_body(&body)?;
        let message = match payload.get("message") {
            None | Some(Value::Null) => return Err(AppError::invalid_input("Message is required")),
            Some(Value::String(message)) => message.as_str(),
            Some(_) => return Err(AppError::invalid_input("Message must be a string")),
        };
        let history = parse_history(payload.get("conversationHistory"))?;

        // Cancelled if this handler future is dropped before completion
        let token = CancellationToken::new();
        let _guard = token.clone().drop_guard();

        let outcome = resources
            .chat
            .handle_message_cancellable(message, history, &token)
            .await?;

        Ok(Json(ChatResponseBody {
            response: outcome.exchange.response,
            is_emotional: outcome.exchange.is_emotional,
            conversation_history: outcome.history,
        })
        .into_response())
    }
}

/// Read caller history, skipping turns with an unknown role or no text
fn parse_history(value: Option<&Value>) -> Result<Vec<ConversationTurn>, AppError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(AppError::invalid_input(
                "conversationHistory must be an array",
            ))
        }
    };

    let turns: Vec<ConversationTurn> = items
        .iter()
        .filter_map(|item| {
            let role = TurnRole::parse(item.get("role")?.as_str()?)?;
            let content = item.get("content")?.as_str()?;
            Some(ConversationTurn {
                role,
                content: content.to_owned(),
            })
        })
        .collect();

    if turns.len() < items.len() {
        debug!(
            skipped = items.len() - turns.len(),
            "Dropped malformed history turns"
        );
    }
    Ok(turns)
}
