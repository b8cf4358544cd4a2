// ABOUTME: HTTP-level tests for sleep logging, analytics, mood scores, and health routes
// ABOUTME: Exercises status codes, user scoping by header, and camelCase response bodies
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::Router;
use chrono::{Duration, Local, NaiveDate};
use common::create_test_app;
use helpers::axum_test::AxumTestRequest;
use helpers::stub_llm::StubLlmProvider;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

async fn test_app() -> Router {
    let stub = Arc::new(StubLlmProvider::answering("NEUTRAL", "ok"));
    create_test_app(stub).await.0
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn log_night(app: &Router, user: Uuid, date: NaiveDate, quality: u8) -> Value {
    let response = AxumTestRequest::post("/api/sleep/entries")
        .user(user)
        .json(&json!({
            "entryDate": date,
            "bedtime": "23:00",
            "wakeTime": "07:00",
            "sleepQuality": quality,
            "moodAfterSleep": "Great"
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    response.json()
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = test_app().await;

    let response = AxumTestRequest::get("/health").send(app.clone()).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");

    let response = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["knowledgeEntries"], 3);
}

#[tokio::test]
async fn test_sleep_routes_require_user_identity() {
    let app = test_app().await;

    for uri in [
        "/api/sleep/analytics",
        "/api/sleep/chart",
        "/api/sleep/dashboard",
        "/api/sleep/entries",
    ] {
        let response = AxumTestRequest::get(uri).send(app.clone()).await;
        assert_eq!(response.status(), 401, "{uri}");
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    }

    let response = AxumTestRequest::get("/api/sleep/analytics")
        .header("x-user-id", "not-a-uuid")
        .send(app)
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_entry_lifecycle() {
    let app = test_app().await;
    let user = Uuid::new_v4();

    let created = log_night(&app, user, today(), 8).await;
    assert_eq!(created["sleepDurationHours"], 8.0);
    assert_eq!(created["bedtime"], "23:00");
    let id = created["id"].as_str().unwrap().to_owned();

    let list: Value = AxumTestRequest::get("/api/sleep/entries?limit=5")
        .user(user)
        .send(app.clone())
        .await
        .json();
    assert_eq!(list["count"], 1);
    assert_eq!(list["entries"][0]["id"], id.as_str());

    let response = AxumTestRequest::put(&format!("/api/sleep/entries/{id}"))
        .user(user)
        .json(&json!({"wakeTime": "06:00", "sleepQuality": 6}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["sleepDurationHours"], 7.0);
    assert_eq!(updated["sleepQuality"], 6);

    // another user cannot see or touch it
    let stranger = Uuid::new_v4();
    let response = AxumTestRequest::delete(&format!("/api/sleep/entries/{id}"))
        .user(stranger)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::delete(&format!("/api/sleep/entries/{id}"))
        .user(user)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 204);
    assert!(response.is_empty());

    let response = AxumTestRequest::delete(&format!("/api/sleep/entries/{id}"))
        .user(user)
        .send(app)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_entry_validation_errors() {
    let app = test_app().await;
    let user = Uuid::new_v4();

    let response = AxumTestRequest::post("/api/sleep/entries")
        .user(user)
        .json(&json!({
            "bedtime": "25:00",
            "wakeTime": "07:00",
            "sleepQuality": 7,
            "moodAfterSleep": "Good"
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::post("/api/sleep/entries")
        .user(user)
        .json(&json!({
            "bedtime": "23:00",
            "wakeTime": "07:00",
            "sleepQuality": 11,
            "moodAfterSleep": "Good"
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");

    let response = AxumTestRequest::post("/api/sleep/entries")
        .user(user)
        .raw_body("[]")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::put("/api/sleep/entries/not-a-uuid")
        .user(user)
        .json(&json!({"sleepQuality": 5}))
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_analytics_json_shape() {
    let app = test_app().await;
    let user = Uuid::new_v4();

    for offset in 0..7 {
        log_night(&app, user, today() - Duration::days(offset), 8).await;
    }

    let response = AxumTestRequest::get("/api/sleep/analytics?days=7")
        .user(user)
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();

    assert_eq!(body["periodDays"], 7);
    assert_eq!(body["totalEntries"], 7);
    assert_eq!(body["weeklyAverage"], 8.0);
    assert_eq!(body["qualityAverage"], 8.0);
    assert_eq!(body["consistencyScore"], 100);
    assert_eq!(body["qualityBreakdown"]["good"], 7);
    assert_eq!(body["averageBedtime"], "23:00");
    assert_eq!(body["averageWakeTime"], "07:00");
    assert_eq!(body["mostCommonMood"], "great");
    assert!(body["moodCorrelation"].is_null());
    assert!(body["insights"].as_array().is_some());
}

#[tokio::test]
async fn test_period_bounds_are_enforced() {
    let app = test_app().await;
    let user = Uuid::new_v4();

    for uri in [
        "/api/sleep/analytics?days=0",
        "/api/sleep/chart?days=366",
        "/api/sleep/dashboard?days=0",
        "/api/sleep/entries?limit=0",
        "/api/sleep/entries?limit=101",
    ] {
        let response = AxumTestRequest::get(uri).user(user).send(app.clone()).await;
        assert_eq!(response.status(), 400, "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_query_parameters_use_error_envelope() {
    let app = test_app().await;
    let user = Uuid::new_v4();

    for uri in [
        "/api/sleep/analytics?days=abc",
        "/api/sleep/analytics?days=-1",
        "/api/sleep/chart?days=7.5",
        "/api/sleep/dashboard?days=99999999999",
        "/api/sleep/entries?limit=ten",
    ] {
        let response = AxumTestRequest::get(uri).user(user).send(app.clone()).await;
        assert_eq!(response.status(), 400, "{uri}");
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "INVALID_INPUT", "{uri}");
        assert!(
            body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()),
            "{uri}"
        );
    }

    // Unknown parameters are ignored
    let response = AxumTestRequest::get("/api/sleep/analytics?days=7&verbose=1")
        .user(user)
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_chart_and_dashboard() {
    let app = test_app().await;
    let user = Uuid::new_v4();
    log_night(&app, user, today() - Duration::days(1), 7).await;

    let chart: Value = AxumTestRequest::get("/api/sleep/chart?days=3")
        .user(user)
        .send(app.clone())
        .await
        .json();
    let points = chart.as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert!(points[0]["durationHours"].is_null());
    assert_eq!(points[1]["durationHours"], 8.0);
    assert_eq!(points[1]["quality"], 7);
    assert!(points[2]["sleepScore"].is_null());

    let dashboard: Value = AxumTestRequest::get("/api/sleep/dashboard")
        .user(user)
        .send(app)
        .await
        .json();
    assert_eq!(dashboard["latestEntry"]["sleepQuality"], 7);
    assert_eq!(dashboard["analytics"]["totalEntries"], 1);
    assert_eq!(dashboard["chart"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_mood_scores_feed_correlation() {
    let app = test_app().await;
    let user = Uuid::new_v4();
    let day = today();

    let response = AxumTestRequest::post("/api/mood/scores")
        .user(user)
        .json(&json!({"score": 8.5, "date": day}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["score"], 8.5);
    assert_eq!(body["date"], json!(day));

    let response = AxumTestRequest::post("/api/mood/scores")
        .user(user)
        .json(&json!({"score": 11}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::post("/api/mood/scores")
        .json(&json!({"score": 5}))
        .send(app)
        .await;
    assert_eq!(response.status(), 401);
}
