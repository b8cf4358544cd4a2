// ABOUTME: SQLite-backed entry store built on an sqlx connection pool
// ABOUTME: Creates its tables on startup and maps rows into sleep entries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use super::EntryStore;
use crate::errors::{AppError, AppResult};
use crate::models::{ClockTime, SleepEntry};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Pool size for file-backed databases
const FILE_POOL_SIZE: u32 = 5;

const ENTRY_COLUMNS: &str = "id, user_id, entry_date, bedtime, wake_time, sleep_duration_hours, \
                             sleep_quality, mood_after_sleep, notes, created_at";

/// Entry store over a `SQLite` database
#[derive(Clone)]
pub struct SqliteEntryStore {
    pool: SqlitePool,
}

impl SqliteEntryStore {
    /// Open (creating if needed) the database at `database_url` and run migrations
    ///
    /// `sqlite::memory:` uses a single pooled connection so every query sees
    /// the same in-memory database.
    ///
    /// # Errors
    ///
    /// Returns a database error if the URL is invalid, the file cannot be
    /// opened, or table creation fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        if !in_memory {
            ensure_parent_dir(options.get_filename()).await?;
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(db_error("Failed to open entry store"))?;

        let store = Self { pool };
        store.migrate().await?;
        info!(in_memory, "Entry store ready");
        Ok(store)
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns a database error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS sleep_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                entry_date TEXT NOT NULL,
                bedtime TEXT NOT NULL,
                wake_time TEXT NOT NULL,
                sleep_duration_hours REAL NOT NULL,
                sleep_quality INTEGER NOT NULL CHECK (sleep_quality BETWEEN 1 AND 10),
                mood_after_sleep TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_sleep_entries_user_date ON sleep_entries(user_id, entry_date)",
            r"
            CREATE TABLE IF NOT EXISTS mood_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                entry_date TEXT NOT NULL,
                score REAL NOT NULL CHECK (score BETWEEN 1 AND 10),
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_mood_entries_user_date ON mood_entries(user_id, entry_date)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(db_error("Migration failed"))?;
        }
        Ok(())
    }

    fn row_to_entry(row: &SqliteRow) -> AppResult<SleepEntry> {
        let column = |name: &str, e: sqlx::Error| {
            AppError::database(format!("Failed to read column {name}: {e}")).with_source(e)
        };

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let user_id: String = row.try_get("user_id").map_err(|e| column("user_id", e))?;
        let entry_date: String = row
            .try_get("entry_date")
            .map_err(|e| column("entry_date", e))?;
        let bedtime: String = row.try_get("bedtime").map_err(|e| column("bedtime", e))?;
        let wake_time: String = row
            .try_get("wake_time")
            .map_err(|e| column("wake_time", e))?;
        let quality: i64 = row
            .try_get("sleep_quality")
            .map_err(|e| column("sleep_quality", e))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| column("created_at", e))?;

        Ok(SleepEntry {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            entry_date: parse_date(&entry_date)?,
            bedtime: parse_clock(&bedtime)?,
            wake_time: parse_clock(&wake_time)?,
            sleep_duration_hours: row
                .try_get("sleep_duration_hours")
                .map_err(|e| column("sleep_duration_hours", e))?,
            sleep_quality: u8::try_from(quality)
                .map_err(|_| AppError::database(format!("Stored quality {quality} out of range")))?,
            mood_after_sleep: row
                .try_get("mood_after_sleep")
                .map_err(|e| column("mood_after_sleep", e))?,
            notes: row.try_get("notes").map_err(|e| column("notes", e))?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| AppError::database(format!("Invalid stored timestamp: {e}")))?
                .with_timezone(&Utc),
        })
    }

    fn rows_to_entries(rows: &[SqliteRow]) -> AppResult<Vec<SleepEntry>> {
        rows.iter().map(Self::row_to_entry).collect()
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    #[instrument(skip(self))]
    async fn query_entries_by_date_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<SleepEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM sleep_entries \
             WHERE user_id = ?1 AND entry_date BETWEEN ?2 AND ?3 \
             ORDER BY entry_date ASC, created_at ASC"
        ))
        .bind(user_id.to_string())
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to query sleep entries"))?;

        debug!(rows = rows.len(), "Fetched sleep entries by date range");
        Self::rows_to_entries(&rows)
    }

    #[instrument(skip(self))]
    async fn query_recent(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<SleepEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM sleep_entries \
             WHERE user_id = ?1 \
             ORDER BY entry_date DESC, created_at DESC \
             LIMIT ?2"
        ))
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to query recent sleep entries"))?;

        Self::rows_to_entries(&rows)
    }

    #[instrument(skip(self, dates), fields(dates = dates.len()))]
    async fn query_mood_scores_by_date(
        &self,
        user_id: Uuid,
        dates: &[NaiveDate],
    ) -> AppResult<HashMap<NaiveDate, f64>> {
        if dates.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT entry_date, AVG(score) AS score FROM mood_entries WHERE user_id = ",
        );
        builder.push_bind(user_id.to_string());
        builder.push(" AND entry_date IN (");
        let mut separated = builder.separated(", ");
        for date in dates {
            separated.push_bind(date.to_string());
        }
        separated.push_unseparated(") GROUP BY entry_date");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to query mood scores"))?;

        rows.iter()
            .map(|row| {
                let date: String = row
                    .try_get("entry_date")
                    .map_err(db_error("Failed to read entry_date"))?;
                let score: f64 = row
                    .try_get("score")
                    .map_err(db_error("Failed to read score"))?;
                Ok((parse_date(&date)?, score))
            })
            .collect()
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id))]
    async fn insert_entry(&self, entry: &SleepEntry) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO sleep_entries (id, user_id, entry_date, bedtime, wake_time,
                sleep_duration_hours, sleep_quality, mood_after_sleep, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.entry_date.to_string())
        .bind(entry.bedtime.to_string())
        .bind(entry.wake_time.to_string())
        .bind(entry.sleep_duration_hours)
        .bind(i64::from(entry.sleep_quality))
        .bind(&entry.mood_after_sleep)
        .bind(entry.notes.as_deref())
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert sleep entry"))?;

        Ok(())
    }

    async fn get_entry(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<Option<SleepEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM sleep_entries WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(entry_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch sleep entry"))?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id))]
    async fn update_entry(&self, entry: &SleepEntry) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE sleep_entries
            SET entry_date = ?1, bedtime = ?2, wake_time = ?3, sleep_duration_hours = ?4,
                sleep_quality = ?5, mood_after_sleep = ?6, notes = ?7
            WHERE id = ?8 AND user_id = ?9
            ",
        )
        .bind(entry.entry_date.to_string())
        .bind(entry.bedtime.to_string())
        .bind(entry.wake_time.to_string())
        .bind(entry.sleep_duration_hours)
        .bind(i64::from(entry.sleep_quality))
        .bind(&entry.mood_after_sleep)
        .bind(entry.notes.as_deref())
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update sleep entry"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sleep_entries WHERE id = ?1 AND user_id = ?2")
            .bind(entry_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete sleep entry"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn record_mood_score(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        score: f64,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO mood_entries (id, user_id, entry_date, score, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(date.to_string())
        .bind(score)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record mood score"))?;

        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("Entry store unreachable"))?;
        Ok(())
    }
}

/// Map an sqlx failure to a database error that keeps the driver error as its source
fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::database(format!("{context}: {e}")).with_source(e)
}

async fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::database(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
                .with_source(e)
            })
        }
        _ => Ok(()),
    }
}

fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::database(format!("Invalid stored id: {e}")))
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::database(format!("Invalid stored date {value}: {e}")))
}

fn parse_clock(value: &str) -> AppResult<ClockTime> {
    value
        .parse()
        .map_err(|e: AppError| AppError::database(format!("Invalid stored time: {}", e.message)))
}
