// ABOUTME: Natural-language sleep insights generated from independent threshold rules
// ABOUTME: Every applicable rule fires; output order follows rule order
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use crate::analytics::CorrelationClass;
use chrono::{Datelike, Weekday};
use mindmate_core::constants::sleep::{
    HIGH_QUALITY_THRESHOLD, IRREGULAR_SCHEDULE_THRESHOLD, LOW_QUALITY_THRESHOLD,
    OPTIMAL_MAX_HOURS, OPTIMAL_MIN_HOURS, WEEKEND_GAP_HOURS,
};
use mindmate_core::models::SleepEntry;

/// Insight returned when the period has no entries
pub const NO_DATA_INSIGHT: &str =
    "No sleep data available yet. Start logging your sleep to see insights!";

/// Period figures the insight rules read
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    /// Entries in the period
    pub entries: &'a [SleepEntry],
    /// Mean duration in hours
    pub weekly_average: f64,
    /// Mean quality rating
    pub quality_average: f64,
    /// Bedtime consistency (0-100)
    pub consistency_score: u8,
    /// Mood-sleep correlation, when enough mood data exists
    pub correlation: Option<CorrelationClass>,
}

type InsightRule = fn(&InsightInputs<'_>) -> Option<&'static str>;

const RULES: &[InsightRule] = &[
    duration_rule,
    quality_rule,
    weekend_rule,
    consistency_rule,
    correlation_rule,
];

/// Run every rule and collect the ones that apply
#[must_use]
pub fn generate_insights(inputs: &InsightInputs<'_>) -> Vec<String> {
    if inputs.entries.is_empty() {
        return vec![NO_DATA_INSIGHT.to_owned()];
    }

    RULES
        .iter()
        .filter_map(|rule| rule(inputs))
        .map(str::to_owned)
        .collect()
}

fn duration_rule(inputs: &InsightInputs<'_>) -> Option<&'static str> {
    let message = if inputs.weekly_average < OPTIMAL_MIN_HOURS {
        "You might benefit from getting more sleep. Aim for 7-9 hours per night."
    } else if inputs.weekly_average > OPTIMAL_MAX_HOURS {
        "You're getting plenty of sleep! Make sure the quality is good too."
    } else {
        "Great job maintaining a healthy sleep duration!"
    };
    Some(message)
}

fn quality_rule(inputs: &InsightInputs<'_>) -> Option<&'static str> {
    if inputs.quality_average < LOW_QUALITY_THRESHOLD {
        Some("Your sleep quality could be improved. Consider a consistent bedtime routine.")
    } else if inputs.quality_average >= HIGH_QUALITY_THRESHOLD {
        Some("Excellent sleep quality! Keep up the good habits.")
    } else {
        None
    }
}

fn weekend_rule(inputs: &InsightInputs<'_>) -> Option<&'static str> {
    let (weekend, weekday): (Vec<&SleepEntry>, Vec<&SleepEntry>) = inputs
        .entries
        .iter()
        .partition(|entry| matches!(entry.entry_date.weekday(), Weekday::Sat | Weekday::Sun));

    let weekend_avg = mean_duration(&weekend)?;
    let weekday_avg = mean_duration(&weekday)?;

    if (weekend_avg - weekday_avg).abs() <= WEEKEND_GAP_HOURS {
        return None;
    }
    if weekend_avg > weekday_avg {
        Some("You sleep more on weekends. Try to maintain consistent sleep on weekdays.")
    } else {
        Some("You sleep less on weekends. Consider prioritizing rest during your days off.")
    }
}

fn consistency_rule(inputs: &InsightInputs<'_>) -> Option<&'static str> {
    // A single night has no spread to judge
    (inputs.entries.len() >= 2 && inputs.consistency_score < IRREGULAR_SCHEDULE_THRESHOLD).then_some(
        "Your bedtime varies quite a bit. Going to bed at the same time each night can improve how rested you feel.",
    )
}

fn correlation_rule(inputs: &InsightInputs<'_>) -> Option<&'static str> {
    match inputs.correlation? {
        CorrelationClass::Positive => {
            Some("Your mood tends to be better after nights with 7 or more hours of sleep.")
        }
        CorrelationClass::Negative => Some(
            "Your mood has been lower after longer nights. Try keeping your sleep within 7-9 hours.",
        ),
        CorrelationClass::Neutral => None,
    }
}

fn mean_duration(entries: &[&SleepEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    Some(entries.iter().map(|e| e.sleep_duration_hours).sum::<f64>() / entries.len() as f64)
}
