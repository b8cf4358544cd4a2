// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, in-memory entry store, knowledge base, pipeline, and entry builders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `mindmate_server`

use chrono::{NaiveDate, Utc};
use mindmate_server::chat::{ChatPipeline, KnowledgeBase, KnowledgeEntry};
use mindmate_server::config::{ChatConfig, SleepConfig};
use mindmate_server::intelligence::compute_duration;
use mindmate_server::llm::LlmProvider;
use mindmate_server::models::SleepEntry;
use mindmate_server::routes::{build_router, ServerResources};
use mindmate_server::services::SleepService;
use mindmate_server::store::{EntryStore, SqliteEntryStore};
use std::sync::{Arc, Once};
use std::time::Duration;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory entry store with tables created
pub async fn create_test_store() -> Arc<SqliteEntryStore> {
    init_test_logging();
    Arc::new(
        SqliteEntryStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store"),
    )
}

/// Small knowledge base covering the topics chat tests use
pub fn test_knowledge_base() -> Arc<KnowledgeBase> {
    Arc::new(KnowledgeBase::new(vec![
        KnowledgeEntry::new(
            "How do I cope with feeling hopeless?",
            "Reach out to someone you trust and break the day into small, manageable steps.",
        ),
        KnowledgeEntry::new(
            "What helps with anxiety before bed?",
            "Slow breathing and a wind-down routine without screens can calm a racing mind.",
        ),
        KnowledgeEntry::new(
            "How can I stay motivated at work?",
            "Set small goals and celebrate progress.",
        ),
    ]))
}

/// Chat limits with a short completion timeout
pub fn test_chat_config() -> ChatConfig {
    ChatConfig {
        completion_timeout: Duration::from_secs(2),
        ..ChatConfig::default()
    }
}

/// Pipeline over `provider` with the test knowledge base
pub fn create_test_pipeline(provider: Arc<dyn LlmProvider>) -> ChatPipeline {
    ChatPipeline::new(provider, test_knowledge_base(), test_chat_config())
}

/// Sleep service over a fresh in-memory store
pub async fn create_test_sleep_service() -> (SleepService, Arc<SqliteEntryStore>) {
    let store = create_test_store().await;
    let service = SleepService::new(
        Arc::clone(&store) as Arc<dyn EntryStore>,
        SleepConfig::default(),
    );
    (service, store)
}

/// Full router over a stub provider and a fresh in-memory store
pub async fn create_test_app(
    provider: Arc<dyn LlmProvider>,
) -> (axum::Router, Arc<SqliteEntryStore>) {
    let (sleep, store) = create_test_sleep_service().await;
    let resources = Arc::new(ServerResources::new(create_test_pipeline(provider), sleep));
    (build_router(resources, &["*".to_owned()]), store)
}

/// Calendar date shorthand
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Entry with its duration derived from the two times
pub fn sleep_entry(
    user_id: Uuid,
    entry_date: NaiveDate,
    bedtime: &str,
    wake_time: &str,
    quality: u8,
    mood: &str,
) -> SleepEntry {
    let bedtime = bedtime.parse().expect("bedtime");
    let wake_time = wake_time.parse().expect("wake time");
    SleepEntry {
        id: Uuid::new_v4(),
        user_id,
        entry_date,
        bedtime,
        wake_time,
        sleep_duration_hours: compute_duration(bedtime, wake_time),
        sleep_quality: quality,
        mood_after_sleep: mood.to_owned(),
        notes: None,
        created_at: Utc::now(),
    }
}
