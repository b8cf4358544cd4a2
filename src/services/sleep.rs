// ABOUTME: Sleep service combining entry store queries with the analytics engine
// ABOUTME: Entry CRUD with validation, period analytics, chart series, and the dashboard view
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use crate::config::SleepConfig;
use crate::constants::sleep::{
    DEFAULT_RECENT_LIMIT, MAX_MOOD_LABEL_CHARS, MAX_NOTES_CHARS, MAX_RECENT_LIMIT,
    MOOD_SCORE_MAX, MOOD_SCORE_MIN, QUALITY_MAX, QUALITY_MIN,
};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{
    chart_series, compute_duration, period_analytics, window_start, SleepAnalytics,
    SleepChartPoint,
};
use crate::models::{ClockTime, SleepEntry};
use crate::store::EntryStore;
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Payload for logging a night of sleep
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSleepEntry {
    /// Defaults to today when absent
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    /// `HH:MM`
    pub bedtime: String,
    /// `HH:MM`
    pub wake_time: String,
    /// 1-10
    pub sleep_quality: i64,
    /// Wake mood label
    pub mood_after_sleep: String,
    /// Free text
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of an existing entry; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntryUpdate {
    /// New calendar date
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    /// New bedtime, `HH:MM`
    #[serde(default)]
    pub bedtime: Option<String>,
    /// New wake time, `HH:MM`
    #[serde(default)]
    pub wake_time: Option<String>,
    /// New quality rating, 1-10
    #[serde(default)]
    pub sleep_quality: Option<i64>,
    /// New wake mood label
    #[serde(default)]
    pub mood_after_sleep: Option<String>,
    /// An empty string clears the notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Everything the sleep screen shows on load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDashboard {
    /// Most recent entry regardless of the window
    pub latest_entry: Option<SleepEntry>,
    /// Analytics over the window
    pub analytics: SleepAnalytics,
    /// One point per day of the window
    pub chart: Vec<SleepChartPoint>,
}

/// Store-backed sleep operations
///
/// The store is injected at construction; the service holds no other state
/// and is safe to share between concurrent requests.
#[derive(Clone)]
pub struct SleepService {
    store: Arc<dyn EntryStore>,
    config: SleepConfig,
}

impl SleepService {
    /// Build a service over the given store
    #[must_use]
    pub const fn new(store: Arc<dyn EntryStore>, config: SleepConfig) -> Self {
        Self { store, config }
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    /// Today's wall-clock date
    #[must_use]
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Apply the default and validate the bound of an analytics window
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for zero or more than the configured maximum
    pub fn resolve_days(&self, days: Option<u32>) -> AppResult<u32> {
        let days = days.unwrap_or(self.config.default_period_days);
        if days == 0 || days > self.config.max_period_days {
            return Err(AppError::out_of_range(format!(
                "days must be between 1 and {}",
                self.config.max_period_days
            )));
        }
        Ok(days)
    }

    /// Analytics over the last `days` days ending today
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or the store's error
    pub async fn analytics(&self, user_id: Uuid, days: Option<u32>) -> AppResult<SleepAnalytics> {
        self.analytics_as_of(user_id, days, Self::today()).await
    }

    /// Analytics over the `days` days ending at `today`
    ///
    /// Entries and mood scores are fetched concurrently; either failing fails
    /// the whole call.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or the store's error
    #[instrument(skip(self))]
    pub async fn analytics_as_of(
        &self,
        user_id: Uuid,
        days: Option<u32>,
        today: NaiveDate,
    ) -> AppResult<SleepAnalytics> {
        let days = self.resolve_days(days)?;
        let start = window_start(today, days);
        let dates = window_dates(start, today);

        let (entries, mood_scores) = tokio::try_join!(
            self.store.query_entries_by_date_range(user_id, start, today),
            self.store.query_mood_scores_by_date(user_id, &dates),
        )?;

        debug!(
            entries = entries.len(),
            mood_days = mood_scores.len(),
            "Computing period analytics"
        );
        Ok(period_analytics(&entries, &mood_scores, days))
    }

    /// Chart series over the last `days` days ending today
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or the store's error
    pub async fn chart(&self, user_id: Uuid, days: Option<u32>) -> AppResult<Vec<SleepChartPoint>> {
        self.chart_as_of(user_id, days, Self::today()).await
    }

    /// Chart series over the `days` days ending at `today`
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or the store's error
    #[instrument(skip(self))]
    pub async fn chart_as_of(
        &self,
        user_id: Uuid,
        days: Option<u32>,
        today: NaiveDate,
    ) -> AppResult<Vec<SleepChartPoint>> {
        let days = self.resolve_days(days)?;
        let entries = self
            .store
            .query_entries_by_date_range(user_id, window_start(today, days), today)
            .await?;
        Ok(chart_series(&entries, today, days))
    }

    /// Latest entry, analytics, and chart ending today
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or the first store error
    pub async fn dashboard(&self, user_id: Uuid, days: Option<u32>) -> AppResult<SleepDashboard> {
        self.dashboard_as_of(user_id, days, Self::today()).await
    }

    /// Latest entry, analytics, and chart ending at `today`
    ///
    /// The three store queries run concurrently and share one entry fetch
    /// between analytics and chart.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or the first store error
    #[instrument(skip(self))]
    pub async fn dashboard_as_of(
        &self,
        user_id: Uuid,
        days: Option<u32>,
        today: NaiveDate,
    ) -> AppResult<SleepDashboard> {
        let days = self.resolve_days(days)?;
        let start = window_start(today, days);
        let dates = window_dates(start, today);

        let (latest, entries, mood_scores) = tokio::try_join!(
            self.store.query_recent(user_id, 1),
            self.store.query_entries_by_date_range(user_id, start, today),
            self.store.query_mood_scores_by_date(user_id, &dates),
        )?;

        Ok(SleepDashboard {
            latest_entry: latest.into_iter().next(),
            analytics: period_analytics(&entries, &mood_scores, days),
            chart: chart_series(&entries, today, days),
        })
    }

    /// Most recent entries, newest first
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a limit outside 1-100, or the store's error
    pub async fn recent_entries(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> AppResult<Vec<SleepEntry>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        if limit == 0 || limit > MAX_RECENT_LIMIT {
            return Err(AppError::out_of_range(format!(
                "limit must be between 1 and {MAX_RECENT_LIMIT}"
            )));
        }
        self.store.query_recent(user_id, limit).await
    }

    /// Validate and store a new entry, deriving its duration
    ///
    /// # Errors
    ///
    /// Returns a validation error before touching the store, or the store's error
    #[instrument(skip(self, request))]
    pub async fn create_entry(
        &self,
        user_id: Uuid,
        request: NewSleepEntry,
    ) -> AppResult<SleepEntry> {
        let bedtime = parse_time("bedtime", &request.bedtime)?;
        let wake_time = parse_time("wakeTime", &request.wake_time)?;

        let entry = SleepEntry {
            id: Uuid::new_v4(),
            user_id,
            entry_date: request.entry_date.unwrap_or_else(Self::today),
            bedtime,
            wake_time,
            sleep_duration_hours: compute_duration(bedtime, wake_time),
            sleep_quality: validate_quality(request.sleep_quality)?,
            mood_after_sleep: validate_mood_label(&request.mood_after_sleep)?,
            notes: normalize_notes(request.notes)?,
            created_at: Utc::now(),
        };

        self.store.insert_entry(&entry).await?;
        info!(entry_id = %entry.id, date = %entry.entry_date, "Sleep entry created");
        Ok(entry)
    }

    /// Apply a partial update; duration is recomputed only when a time changes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the entry does not exist for this user,
    /// a validation error, or the store's error
    #[instrument(skip(self, update))]
    pub async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        update: SleepEntryUpdate,
    ) -> AppResult<SleepEntry> {
        let mut entry = self
            .store
            .get_entry(user_id, entry_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sleep entry {entry_id}")))?;

        let mut times_changed = false;
        if let Some(bedtime) = update.bedtime.as_deref() {
            entry.bedtime = parse_time("bedtime", bedtime)?;
            times_changed = true;
        }
        if let Some(wake_time) = update.wake_time.as_deref() {
            entry.wake_time = parse_time("wakeTime", wake_time)?;
            times_changed = true;
        }
        if times_changed {
            entry.sleep_duration_hours = compute_duration(entry.bedtime, entry.wake_time);
        }

        if let Some(date) = update.entry_date {
            entry.entry_date = date;
        }
        if let Some(quality) = update.sleep_quality {
            entry.sleep_quality = validate_quality(quality)?;
        }
        if let Some(mood) = update.mood_after_sleep.as_deref() {
            entry.mood_after_sleep = validate_mood_label(mood)?;
        }
        if update.notes.is_some() {
            entry.notes = normalize_notes(update.notes)?;
        }

        if !self.store.update_entry(&entry).await? {
            return Err(AppError::not_found(format!("Sleep entry {entry_id}")));
        }
        info!(entry_id = %entry.id, times_changed, "Sleep entry updated");
        Ok(entry)
    }

    /// Delete one entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the entry does not exist for this user,
    /// or the store's error
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<()> {
        if self.store.delete_entry(user_id, entry_id).await? {
            info!(%entry_id, "Sleep entry deleted");
            Ok(())
        } else {
            Err(AppError::not_found(format!("Sleep entry {entry_id}")))
        }
    }

    /// Record a 1-10 mood score, defaulting the date to today
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a non-finite or out-of-scale score, or
    /// the store's error
    #[instrument(skip(self))]
    pub async fn record_mood_score(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
        score: f64,
    ) -> AppResult<NaiveDate> {
        if !score.is_finite() || !(MOOD_SCORE_MIN..=MOOD_SCORE_MAX).contains(&score) {
            return Err(AppError::out_of_range(format!(
                "score must be between {MOOD_SCORE_MIN} and {MOOD_SCORE_MAX}"
            )));
        }
        let date = date.unwrap_or_else(Self::today);
        self.store.record_mood_score(user_id, date, score).await?;
        Ok(date)
    }
}

fn window_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

fn parse_time(field: &str, value: &str) -> AppResult<ClockTime> {
    if value.trim().is_empty() {
        return Err(AppError::missing_field(field));
    }
    value
        .parse()
        .map_err(|e: AppError| AppError::invalid_input(format!("{field}: {}", e.message)))
}

fn validate_quality(quality: i64) -> AppResult<u8> {
    u8::try_from(quality)
        .ok()
        .filter(|q| (QUALITY_MIN..=QUALITY_MAX).contains(q))
        .ok_or_else(|| {
            AppError::out_of_range(format!(
                "sleepQuality must be between {QUALITY_MIN} and {QUALITY_MAX}"
            ))
        })
}

fn validate_mood_label(label: &str) -> AppResult<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(AppError::missing_field("moodAfterSleep"));
    }
    if label.chars().count() > MAX_MOOD_LABEL_CHARS {
        return Err(AppError::out_of_range(format!(
            "moodAfterSleep must be at most {MAX_MOOD_LABEL_CHARS} characters"
        )));
    }
    Ok(label.to_owned())
}

fn normalize_notes(notes: Option<String>) -> AppResult<Option<String>> {
    let Some(notes) = notes else {
        return Ok(None);
    };
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NOTES_CHARS {
        return Err(AppError::out_of_range(format!(
            "notes must be at most {MAX_NOTES_CHARS} characters"
        )));
    }
    Ok(Some(trimmed.to_owned()))
}
