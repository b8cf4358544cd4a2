// ABOUTME: Period sleep analytics aggregating entries into derived metrics and insights
// ABOUTME: Averages, bedtime consistency, quality buckets, best night, and mood-sleep correlation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! # Period Analytics
//!
//! [`period_analytics`] is a pure function of the entries and mood scores it is
//! handed. Fetching them for a date range is the caller's job; an empty entry
//! list is a valid input and yields a zeroed result with a single insight.

use crate::clock::{average_time, consistency_score};
use crate::duration::round_to;
use crate::insights::{generate_insights, InsightInputs};
use crate::mood::{classify_mood, MoodBucket};
use crate::scoring::sleep_score;
use chrono::NaiveDate;
use mindmate_core::constants::sleep::{
    CORRELATION_THRESHOLD, GOOD_QUALITY_MIN, OKAY_MAX_HOURS, OKAY_MIN_HOURS, OKAY_QUALITY_MIN,
    OPTIMAL_MAX_HOURS, OPTIMAL_MIN_HOURS,
};
use mindmate_core::models::{ClockTime, SleepEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::debug;

/// Quality bucket of a single night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBucket {
    /// Quality >= 7 and 7-9 hours
    Good,
    /// Quality >= 5 and 6-10 hours
    Okay,
    /// Everything else
    Poor,
}

impl QualityBucket {
    /// Bucket an entry; `Good` is checked before `Okay`
    #[must_use]
    pub fn for_entry(entry: &SleepEntry) -> Self {
        let hours = entry.sleep_duration_hours;
        if entry.sleep_quality >= GOOD_QUALITY_MIN
            && (OPTIMAL_MIN_HOURS..=OPTIMAL_MAX_HOURS).contains(&hours)
        {
            Self::Good
        } else if entry.sleep_quality >= OKAY_QUALITY_MIN
            && (OKAY_MIN_HOURS..=OKAY_MAX_HOURS).contains(&hours)
        {
            Self::Okay
        } else {
            Self::Poor
        }
    }
}

/// Count of entries per quality bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    /// Good nights
    pub good: u32,
    /// Okay nights
    pub okay: u32,
    /// Poor nights
    pub poor: u32,
}

impl QualityBreakdown {
    fn add(&mut self, bucket: QualityBucket) {
        match bucket {
            QualityBucket::Good => self.good += 1,
            QualityBucket::Okay => self.okay += 1,
            QualityBucket::Poor => self.poor += 1,
        }
    }

    /// Total entries counted
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.good + self.okay + self.poor
    }
}

/// Highest-scoring night of the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSleepDay {
    /// Calendar date of the entry
    pub date: NaiveDate,
    /// Composite score of the entry
    pub sleep_score: u8,
    /// Hours slept
    pub duration_hours: f64,
    /// Quality rating
    pub quality: u8,
}

/// Direction of the mood difference between long and short nights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationClass {
    /// Better mood after 7h+ nights
    Positive,
    /// Worse mood after 7h+ nights
    Negative,
    /// Difference within 0.5
    Neutral,
}

/// Mean mood after long versus short nights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSleepCorrelation {
    /// Mean mood score on dates with >= 7h of sleep
    pub average_mood_with_7_plus: f64,
    /// Mean mood score on dates with < 7h of sleep
    pub average_mood_with_less_7: f64,
    /// Classification of the difference
    pub correlation: CorrelationClass,
}

/// Derived metrics for one analytics period; recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAnalytics {
    /// Requested window length in days
    pub period_days: u32,
    /// Entries in the window
    pub total_entries: u32,
    /// Mean duration in hours
    pub weekly_average: f64,
    /// Mean quality rating
    pub quality_average: f64,
    /// Bedtime consistency (0-100)
    pub consistency_score: u8,
    /// Entries per quality bucket
    pub quality_breakdown: QualityBreakdown,
    /// Best night by sleep score
    pub best_sleep_day: Option<BestSleepDay>,
    /// Circular mean bedtime
    pub average_bedtime: Option<ClockTime>,
    /// Circular mean wake time
    pub average_wake_time: Option<ClockTime>,
    /// Most frequent recognized wake-mood bucket
    pub most_common_mood: Option<MoodBucket>,
    /// Mood-sleep correlation, absent without mood data on both sides
    pub mood_correlation: Option<MoodSleepCorrelation>,
    /// Ordered natural-language observations
    pub insights: Vec<String>,
}

impl SleepAnalytics {
    /// Zero-valued result for a period without entries
    #[must_use]
    pub fn empty(period_days: u32) -> Self {
        Self {
            period_days,
            total_entries: 0,
            weekly_average: 0.0,
            quality_average: 0.0,
            consistency_score: 0,
            quality_breakdown: QualityBreakdown::default(),
            best_sleep_day: None,
            average_bedtime: None,
            average_wake_time: None,
            most_common_mood: None,
            mood_correlation: None,
            insights: generate_insights(&InsightInputs {
                entries: &[],
                weekly_average: 0.0,
                quality_average: 0.0,
                consistency_score: 0,
                correlation: None,
            }),
        }
    }
}

/// Aggregate a period's entries into [`SleepAnalytics`]
///
/// `mood_scores` maps calendar dates to 1-10 mood scores and feeds only the
/// mood-sleep correlation.
#[must_use]
pub fn period_analytics<S: BuildHasher>(
    entries: &[SleepEntry],
    mood_scores: &HashMap<NaiveDate, f64, S>,
    period_days: u32,
) -> SleepAnalytics {
    if entries.is_empty() {
        debug!(period_days, "No entries in period, returning empty analytics");
        return SleepAnalytics::empty(period_days);
    }

    let count = entries.len() as f64;
    let weekly_average = entries.iter().map(|e| e.sleep_duration_hours).sum::<f64>() / count;
    let quality_average = entries
        .iter()
        .map(|e| f64::from(e.sleep_quality))
        .sum::<f64>()
        / count;

    let bedtimes: Vec<ClockTime> = entries.iter().map(|e| e.bedtime).collect();
    let wake_times: Vec<ClockTime> = entries.iter().map(|e| e.wake_time).collect();
    let consistency = consistency_score(&bedtimes);

    let mut quality_breakdown = QualityBreakdown::default();
    for entry in entries {
        quality_breakdown.add(QualityBucket::for_entry(entry));
    }

    let mood_correlation = mood_sleep_correlation(entries, mood_scores);

    debug!(
        period_days,
        entries = entries.len(),
        consistency,
        has_correlation = mood_correlation.is_some(),
        "Computed period analytics"
    );

    let insights = generate_insights(&InsightInputs {
        entries,
        weekly_average,
        quality_average,
        consistency_score: consistency,
        correlation: mood_correlation.as_ref().map(|c| c.correlation),
    });

    SleepAnalytics {
        period_days,
        total_entries: entries.len() as u32,
        weekly_average: round_to(weekly_average, 2),
        quality_average: round_to(quality_average, 2),
        consistency_score: consistency,
        quality_breakdown,
        best_sleep_day: best_sleep_day(entries),
        average_bedtime: average_time(&bedtimes),
        average_wake_time: average_time(&wake_times),
        most_common_mood: most_common_mood(entries),
        mood_correlation,
        insights,
    }
}

/// Entry with the highest sleep score; the earliest one wins a tie
#[must_use]
pub fn best_sleep_day(entries: &[SleepEntry]) -> Option<BestSleepDay> {
    let mut best: Option<(u8, &SleepEntry)> = None;
    for entry in entries {
        let score = sleep_score(entry);
        if !matches!(best, Some((top, _)) if score <= top) {
            best = Some((score, entry));
        }
    }

    best.map(|(score, entry)| BestSleepDay {
        date: entry.entry_date,
        sleep_score: score,
        duration_hours: entry.sleep_duration_hours,
        quality: entry.sleep_quality,
    })
}

/// Most frequent recognized wake-mood bucket; the first seen wins a tie
#[must_use]
pub fn most_common_mood(entries: &[SleepEntry]) -> Option<MoodBucket> {
    let mut counts: Vec<(MoodBucket, u32)> = Vec::new();
    for bucket in entries.iter().filter_map(|e| classify_mood(&e.mood_after_sleep)) {
        match counts.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, n)) => *n += 1,
            None => counts.push((bucket, 1)),
        }
    }

    let mut winner: Option<(MoodBucket, u32)> = None;
    for (bucket, n) in counts {
        if !matches!(winner, Some((_, top)) if n <= top) {
            winner = Some((bucket, n));
        }
    }
    winner.map(|(bucket, _)| bucket)
}

/// Compare mean mood after >= 7h nights against < 7h nights
///
/// Returns `None` when either side has no mood score, however many entries the
/// other side has.
#[must_use]
pub fn mood_sleep_correlation<S: BuildHasher>(
    entries: &[SleepEntry],
    mood_scores: &HashMap<NaiveDate, f64, S>,
) -> Option<MoodSleepCorrelation> {
    let mut long_nights = Vec::new();
    let mut short_nights = Vec::new();

    for entry in entries {
        let Some(score) = mood_scores.get(&entry.entry_date) else {
            continue;
        };
        if entry.sleep_duration_hours >= OPTIMAL_MIN_HOURS {
            long_nights.push(*score);
        } else {
            short_nights.push(*score);
        }
    }

    if long_nights.is_empty() || short_nights.is_empty() {
        return None;
    }

    let with_7_plus = long_nights.iter().sum::<f64>() / long_nights.len() as f64;
    let with_less_7 = short_nights.iter().sum::<f64>() / short_nights.len() as f64;
    let diff = with_7_plus - with_less_7;

    let correlation = if diff > CORRELATION_THRESHOLD {
        CorrelationClass::Positive
    } else if diff < -CORRELATION_THRESHOLD {
        CorrelationClass::Negative
    } else {
        CorrelationClass::Neutral
    };

    Some(MoodSleepCorrelation {
        average_mood_with_7_plus: round_to(with_7_plus, 2),
        average_mood_with_less_7: round_to(with_less_7, 2),
        correlation,
    })
}
