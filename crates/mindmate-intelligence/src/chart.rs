// ABOUTME: Per-day chart series over a calendar window ending on a given date
// ABOUTME: Missing days produce empty points; nothing is interpolated
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use crate::scoring::sleep_score;
use chrono::{Days, NaiveDate};
use mindmate_core::models::{ClockTime, SleepEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One calendar day of the sleep chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepChartPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Hours slept, if logged
    pub duration_hours: Option<f64>,
    /// Quality rating, if logged
    pub quality: Option<u8>,
    /// Bedtime, if logged
    pub bedtime: Option<ClockTime>,
    /// Wake time, if logged
    pub wake_time: Option<ClockTime>,
    /// Composite sleep score, if logged
    pub sleep_score: Option<u8>,
}

impl SleepChartPoint {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            duration_hours: None,
            quality: None,
            bedtime: None,
            wake_time: None,
            sleep_score: None,
        }
    }

    fn from_entry(date: NaiveDate, entry: &SleepEntry) -> Self {
        Self {
            date,
            duration_hours: Some(entry.sleep_duration_hours),
            quality: Some(entry.sleep_quality),
            bedtime: Some(entry.bedtime),
            wake_time: Some(entry.wake_time),
            sleep_score: Some(sleep_score(entry)),
        }
    }
}

/// First calendar day of a `days`-long window ending on `end` (inclusive)
#[must_use]
pub fn window_start(end: NaiveDate, days: u32) -> NaiveDate {
    end.checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// One point per day in `[end - days + 1, end]`, oldest first
///
/// When several entries share a date the first one in `entries` is used.
#[must_use]
pub fn chart_series(entries: &[SleepEntry], end: NaiveDate, days: u32) -> Vec<SleepChartPoint> {
    if days == 0 {
        return Vec::new();
    }

    let mut by_date: HashMap<NaiveDate, &SleepEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        by_date.entry(entry.entry_date).or_insert(entry);
    }

    window_start(end, days)
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            by_date.get(&date).map_or_else(
                || SleepChartPoint::empty(date),
                |entry| SleepChartPoint::from_entry(date, entry),
            )
        })
        .collect()
}
