// ABOUTME: Integration tests for the SQLite entry store
// ABOUTME: Range and recent ordering, user scoping, mood score averaging, and CRUD round trips
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_store, date, sleep_entry};
use mindmate_server::errors::ErrorCode;
use mindmate_server::store::{EntryStore, SqliteEntryStore};
use std::error::Error as StdError;
use uuid::Uuid;

#[tokio::test]
async fn test_range_query_is_ascending_and_inclusive() {
    let store = create_test_store().await;
    let user = Uuid::new_v4();

    for day in [5, 1, 3, 7] {
        store
            .insert_entry(&sleep_entry(user, date(2024, 4, day), "23:00", "07:00", 7, "Good"))
            .await
            .unwrap();
    }

    let entries = store
        .query_entries_by_date_range(user, date(2024, 4, 1), date(2024, 4, 5))
        .await
        .unwrap();
    let days: Vec<_> = entries.iter().map(|e| e.entry_date).collect();
    assert_eq!(days, vec![date(2024, 4, 1), date(2024, 4, 3), date(2024, 4, 5)]);
}

#[tokio::test]
async fn test_recent_is_descending_and_limited() {
    let store = create_test_store().await;
    let user = Uuid::new_v4();

    for day in 1..=5 {
        store
            .insert_entry(&sleep_entry(user, date(2024, 4, day), "23:00", "07:00", 7, "Good"))
            .await
            .unwrap();
    }

    let recent = store.query_recent(user, 3).await.unwrap();
    let days: Vec<_> = recent.iter().map(|e| e.entry_date).collect();
    assert_eq!(days, vec![date(2024, 4, 5), date(2024, 4, 4), date(2024, 4, 3)]);
}

#[tokio::test]
async fn test_entries_are_scoped_to_their_owner() {
    let store = create_test_store().await;
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let entry = sleep_entry(owner, date(2024, 4, 1), "23:00", "07:00", 7, "Good");
    store.insert_entry(&entry).await.unwrap();

    assert!(store.get_entry(stranger, entry.id).await.unwrap().is_none());
    assert!(store.query_recent(stranger, 10).await.unwrap().is_empty());
    assert!(!store.delete_entry(stranger, entry.id).await.unwrap());

    let mut hijacked = entry.clone();
    hijacked.user_id = stranger;
    hijacked.sleep_quality = 1;
    assert!(!store.update_entry(&hijacked).await.unwrap());

    let stored = store.get_entry(owner, entry.id).await.unwrap().unwrap();
    assert_eq!(stored.sleep_quality, 7);
}

#[tokio::test]
async fn test_entry_round_trip_preserves_fields() {
    let store = create_test_store().await;
    let user = Uuid::new_v4();

    let mut entry = sleep_entry(user, date(2024, 4, 1), "22:45", "06:15", 6, "Fair");
    entry.notes = Some("Woke up once".to_owned());
    store.insert_entry(&entry).await.unwrap();

    let stored = store.get_entry(user, entry.id).await.unwrap().unwrap();
    assert_eq!(stored.id, entry.id);
    assert_eq!(stored.bedtime, entry.bedtime);
    assert_eq!(stored.wake_time, entry.wake_time);
    assert!((stored.sleep_duration_hours - 7.5).abs() < f64::EPSILON);
    assert_eq!(stored.mood_after_sleep, "Fair");
    assert_eq!(stored.notes.as_deref(), Some("Woke up once"));
    assert_eq!(stored.created_at.timestamp(), entry.created_at.timestamp());
}

#[tokio::test]
async fn test_update_and_delete() {
    let store = create_test_store().await;
    let user = Uuid::new_v4();

    let mut entry = sleep_entry(user, date(2024, 4, 1), "23:00", "07:00", 7, "Good");
    store.insert_entry(&entry).await.unwrap();

    entry.sleep_quality = 9;
    entry.notes = Some("Better than expected".to_owned());
    assert!(store.update_entry(&entry).await.unwrap());
    let stored = store.get_entry(user, entry.id).await.unwrap().unwrap();
    assert_eq!(stored.sleep_quality, 9);

    assert!(store.delete_entry(user, entry.id).await.unwrap());
    assert!(store.get_entry(user, entry.id).await.unwrap().is_none());
    assert!(!store.delete_entry(user, entry.id).await.unwrap());
}

#[tokio::test]
async fn test_mood_scores_are_averaged_per_date() {
    let store = create_test_store().await;
    let user = Uuid::new_v4();

    store.record_mood_score(user, date(2024, 4, 1), 6.0).await.unwrap();
    store.record_mood_score(user, date(2024, 4, 1), 8.0).await.unwrap();
    store.record_mood_score(user, date(2024, 4, 2), 3.0).await.unwrap();
    store.record_mood_score(user, date(2024, 4, 9), 9.0).await.unwrap();
    store
        .record_mood_score(Uuid::new_v4(), date(2024, 4, 1), 1.0)
        .await
        .unwrap();

    let scores = store
        .query_mood_scores_by_date(user, &[date(2024, 4, 1), date(2024, 4, 2), date(2024, 4, 3)])
        .await
        .unwrap();

    assert_eq!(scores.len(), 2);
    assert!((scores[&date(2024, 4, 1)] - 7.0).abs() < f64::EPSILON);
    assert!((scores[&date(2024, 4, 2)] - 3.0).abs() < f64::EPSILON);

    assert!(store
        .query_mood_scores_by_date(user, &[])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_file_backed_store_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mindmate.db");
    let url = format!("sqlite:{}", path.display());

    let store = SqliteEntryStore::connect(&url).await.unwrap();
    store.health_check().await.unwrap();
    assert!(path.exists());

    // Reopening runs the idempotent migrations again
    let user = Uuid::new_v4();
    store
        .insert_entry(&sleep_entry(user, date(2024, 4, 1), "23:00", "07:00", 7, "Good"))
        .await
        .unwrap();
    drop(store);

    let reopened = SqliteEntryStore::connect(&url).await.unwrap();
    assert_eq!(reopened.query_recent(user, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unusable_parent_directory_reports_database_error_with_cause() {
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let path = blocker.path().join("nested").join("mindmate.db");
    let url = format!("sqlite:{}", path.display());

    let error = SqliteEntryStore::connect(&url).await.err().unwrap();
    assert_eq!(error.code, ErrorCode::DatabaseError);
    assert!(error.message.contains("Failed to create database directory"));
    assert!(StdError::source(&error).is_some());
}
