// ABOUTME: Sleep analytics engine for the MindMate wellness companion backend
// ABOUTME: Pure scoring, consistency, correlation, insight, and chart functions with no I/O
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![deny(unsafe_code)]

//! # `MindMate` Intelligence
//!
//! Everything here is a pure function of the entries it receives. Store access,
//! date-range selection, and concurrency live in the server crate.

/// Period analytics and derived metric types
pub mod analytics;
/// Sleep chart series
pub mod chart;
/// Circular time-of-day statistics
pub mod clock;
/// Duration derivation and formatting
pub mod duration;
/// Threshold-based insight rules
pub mod insights;
/// Wake-mood normalization
pub mod mood;
/// Per-entry composite score
pub mod scoring;

pub use analytics::{
    best_sleep_day, mood_sleep_correlation, most_common_mood, period_analytics, BestSleepDay,
    CorrelationClass, MoodSleepCorrelation, QualityBreakdown, QualityBucket, SleepAnalytics,
};
pub use chart::{chart_series, window_start, SleepChartPoint};
pub use clock::{average_time, circular_distance, consistency_score};
pub use duration::{compute_duration, compute_duration_str, format_duration, round_to};
pub use insights::{generate_insights, InsightInputs, NO_DATA_INSIGHT};
pub use mood::{classify_mood, mood_sub_score, MoodBucket, MoodRule, MOOD_RULES};
pub use scoring::{quality_label, sleep_score, QualityLabel};
