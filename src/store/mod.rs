// ABOUTME: Entry store contract consumed by the sleep service
// ABOUTME: Range, recent, and mood-score queries plus sleep entry CRUD behind an async trait
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! # Entry Store
//!
//! The analytics engine never talks to storage directly. The sleep service
//! holds an `Arc<dyn EntryStore>` injected at construction, so tests can run
//! against an in-memory `SQLite` store or any other implementation.

/// `SQLite` implementation
pub mod sqlite;

pub use sqlite::SqliteEntryStore;

use crate::errors::AppResult;
use crate::models::SleepEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

/// Persistent storage for sleep entries and mood scores
///
/// Every query is scoped to one user; an entry belonging to someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Entries with `start <= entry_date <= end`, ascending by date
    async fn query_entries_by_date_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<SleepEntry>>;

    /// Most recent entries, descending by date
    async fn query_recent(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<SleepEntry>>;

    /// Mean mood score (1-10) per date, for the dates that have any
    async fn query_mood_scores_by_date(
        &self,
        user_id: Uuid,
        dates: &[NaiveDate],
    ) -> AppResult<HashMap<NaiveDate, f64>>;

    /// Store a new entry
    async fn insert_entry(&self, entry: &SleepEntry) -> AppResult<()>;

    /// Fetch one entry owned by `user_id`
    async fn get_entry(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<Option<SleepEntry>>;

    /// Overwrite an existing entry; `false` if no row matched id and owner
    async fn update_entry(&self, entry: &SleepEntry) -> AppResult<bool>;

    /// Delete one entry; `false` if no row matched id and owner
    async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<bool>;

    /// Record a 1-10 mood score for a date
    async fn record_mood_score(&self, user_id: Uuid, date: NaiveDate, score: f64)
        -> AppResult<()>;

    /// Whether the backend is reachable
    async fn health_check(&self) -> AppResult<()>;
}
