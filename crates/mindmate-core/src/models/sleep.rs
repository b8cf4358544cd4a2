// ABOUTME: Sleep log data model with wall-clock time-of-day parsing
// ABOUTME: SleepEntry rows plus the ClockTime type used for bedtime and wake time
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use crate::constants::sleep::MINUTES_PER_DAY;
use crate::errors::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Wall-clock time of day with minute resolution, written as `HH:MM` (24-hour)
///
/// No time zone is attached. A bedtime of 23:30 and a wake time of 07:00 are
/// interpreted as the same night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Build from hour and minute components
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the hour is not 0-23 or the minute is not 0-59
    pub fn new(hour: u8, minute: u8) -> Result<Self, AppError> {
        if hour > 23 || minute > 59 {
            return Err(AppError::invalid_input(format!(
                "Invalid time {hour:02}:{minute:02}: expected 00:00-23:59"
            )));
        }
        Ok(Self {
            minutes: u16::from(hour) * 60 + u16::from(minute),
        })
    }

    /// Build from minutes since midnight, wrapping into a single day
    #[must_use]
    pub const fn from_minutes(minutes: u16) -> Self {
        Self {
            minutes: minutes % MINUTES_PER_DAY,
        }
    }

    /// Minutes since midnight (0-1439)
    #[must_use]
    pub const fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }

    /// Hour component (0-23)
    #[must_use]
    pub const fn hour(self) -> u8 {
        (self.minutes / 60) as u8
    }

    /// Minute component (0-59)
    #[must_use]
    pub const fn minute(self) -> u8 {
        (self.minutes % 60) as u8
    }
}

impl FromStr for ClockTime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || AppError::invalid_input(format!("Invalid time '{s}': expected HH:MM (24-hour)"));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: AppError| D::Error::custom(e.message))
    }
}

/// One night of logged sleep, owned by a single user
///
/// `sleep_duration_hours` is derived from `bedtime`/`wake_time` when the entry
/// is created or its times are updated; it is never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    /// Opaque identifier assigned at creation
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Calendar date the entry belongs to
    pub entry_date: NaiveDate,
    /// Time the user went to bed
    pub bedtime: ClockTime,
    /// Time the user woke up
    pub wake_time: ClockTime,
    /// Derived sleep duration in hours
    pub sleep_duration_hours: f64,
    /// Subjective quality rating, 1-10
    pub sleep_quality: u8,
    /// Free-text wake mood label (e.g. "Great", "Poor")
    pub mood_after_sleep: String,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
