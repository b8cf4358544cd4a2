// ABOUTME: Route module organization for the MindMate HTTP API
// ABOUTME: Shared request state, body parsing, and router assembly with tower-http layers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! Route module for the `MindMate` server
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the chat pipeline or the sleep service.

/// Emotion-aware chat endpoint
pub mod chat;
/// Health check and readiness routes
pub mod health;
/// Sleep logging, analytics, and mood score routes
pub mod sleep;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
pub use sleep::SleepRoutes;

use crate::chat::ChatPipeline;
use crate::constants::defaults::HTTP_REQUEST_TIMEOUT_SECS;
use crate::errors::{AppError, AppResult};
use crate::middleware::{make_request_span, setup_cors};
use crate::services::SleepService;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Header carrying the current user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared state handed to every handler
pub struct ServerResources {
    /// Chat pipeline
    pub chat: ChatPipeline,
    /// Sleep service
    pub sleep: SleepService,
}

impl ServerResources {
    /// Bundle the two cores
    #[must_use]
    pub const fn new(chat: ChatPipeline, sleep: SleepService) -> Self {
        Self { chat, sleep }
    }
}

/// Full application router with CORS, tracing, and a whole-request timeout
pub fn build_router(resources: Arc<ServerResources>, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(ChatRoutes::routes(Arc::clone(&resources)))
        .merge(SleepRoutes::routes(resources))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS),
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(setup_cors(cors_origins))
}

/// Current user from the `x-user-id` header
///
/// # Errors
///
/// Returns `AuthRequired` if the header is missing or not a UUID
pub fn require_user_id(headers: &HeaderMap) -> AppResult<Uuid> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or_else(AppError::auth_required)
}

/// Deserialize the query string, reporting problems as validation errors
///
/// # Errors
///
/// Returns `InvalidInput` when a parameter is malformed or out of its type's range
pub fn parse_query<T: DeserializeOwned>(uri: &Uri) -> AppResult<T> {
    Query::<T>::try_from_uri(uri)
        .map(|Query(query)| query)
        .map_err(|e| AppError::invalid_input(e.body_text()))
}

/// Deserialize a JSON body, reporting problems as validation errors
///
/// # Errors
///
/// Returns `InvalidInput` for an empty body, malformed JSON, or a shape mismatch
pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    if body.is_empty() {
        return Err(AppError::invalid_input("Request body is required"));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_input(format!("Invalid request body: {e}")))
}
