// ABOUTME: Sleep route handlers for logging, analytics, chart, dashboard, and mood scores
// ABOUTME: Resolves the current user from x-user-id and delegates to the sleep service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use super::{parse_json_body, parse_query, require_user_id, ServerResources};
use crate::errors::AppError;
use crate::models::SleepEntry;
use crate::services::{NewSleepEntry, SleepEntryUpdate};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// `?days=N`
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// Window length in days
    pub days: Option<u32>,
}

/// `?limit=N`
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    /// Maximum entries returned
    pub limit: Option<u32>,
}

/// Recent entries body
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    /// Newest first
    pub entries: Vec<SleepEntry>,
    /// Number of entries returned
    pub count: usize,
}

/// Mood score submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodScoreRequest {
    /// 1-10
    pub score: f64,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Recorded mood score
#[derive(Debug, Serialize)]
pub struct MoodScoreResponse {
    /// Date the score was filed under
    pub date: NaiveDate,
    /// Score as recorded
    pub score: f64,
}

/// Sleep routes handler
pub struct SleepRoutes;

impl SleepRoutes {
    /// Create all sleep and mood routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/sleep/analytics", get(Self::analytics))
            .route("/api/sleep/chart", get(Self::chart))
            .route("/api/sleep/dashboard", get(Self::dashboard))
            .route(
                "/api/sleep/entries",
                get(Self::list_entries).post(Self::create_entry),
            )
            .route(
                "/api/sleep/entries/:entry_id",
                put(Self::update_entry).delete(Self::delete_entry),
            )
            .route("/api/mood/scores", post(Self::record_mood_score))
            .with_state(resources)
    }

    async fn analytics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let query: PeriodQuery = parse_query(&uri)?;
        let analytics = resources.sleep.analytics(user_id, query.days).await?;
        Ok(Json(analytics).into_response())
    }

    async fn chart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let query: PeriodQuery = parse_query(&uri)?;
        let points = resources.sleep.chart(user_id, query.days).await?;
        Ok(Json(points).into_response())
    }

    async fn dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let query: PeriodQuery = parse_query(&uri)?;
        let dashboard = resources.sleep.dashboard(user_id, query.days).await?;
        Ok(Json(dashboard).into_response())
    }

    async fn list_entries(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let query: RecentQuery = parse_query(&uri)?;
        let entries = resources.sleep.recent_entries(user_id, query.limit).await?;
        Ok(Json(EntryListResponse {
            count: entries.len(),
            entries,
        })
        .into_response())
    }

    async fn create_entry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let request: NewSleepEntry = parse_json_body(&body)?;
        let entry = resources.sleep.create_entry(user_id, request).await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    async fn update_entry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(entry_id): Path<String>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let entry_id = parse_entry_id(&entry_id)?;
        let update: SleepEntryUpdate = parse_json_body(&body)?;
        let entry = resources
            .sleep
            .update_entry(user_id, entry_id, update)
            .await?;
        Ok(Json(entry).into_response())
    }

    async fn delete_entry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(entry_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let entry_id = parse_entry_id(&entry_id)?;
        resources.sleep.delete_entry(user_id, entry_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn record_mood_score(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user_id = require_user_id(&headers)?;
        let request: MoodScoreRequest = parse_json_body(&body)?;
        let date = resources
            .sleep
            .record_mood_score(user_id, request.date, request.score)
            .await?;
        Ok((
            StatusCode::CREATED,
            Json(MoodScoreResponse {
                date,
                score: request.score,
            }),
        )
            .into_response())
    }
}

fn parse_entry_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid entry id '{raw}'")))
}
