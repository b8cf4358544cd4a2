// ABOUTME: Per-entry composite sleep score from duration, quality, and wake mood
// ABOUTME: Weighted 40/35/25 sub-scores, each clamped before summing to a 0-100 score
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! Sleep score
//!
//! | Component | Max | Rule |
//! |---|---|---|
//! | Duration | 40 | 7-9h earns full marks, otherwise 5 points lost per hour away from 8h |
//! | Quality | 35 | `quality / 10 * 35` |
//! | Wake mood | 25 | rule-table bucket, 15 when the label is unrecognized |

use crate::mood::mood_sub_score;
use mindmate_core::constants::sleep::{
    DURATION_DECAY_PER_HOUR, DURATION_TARGET_HOURS, DURATION_WEIGHT, MOOD_WEIGHT,
    OPTIMAL_MAX_HOURS, OPTIMAL_MIN_HOURS, QUALITY_MAX, QUALITY_WEIGHT,
};
use mindmate_core::models::SleepEntry;
use serde::{Deserialize, Serialize};

/// Duration sub-score (0-40)
#[must_use]
pub fn duration_sub_score(hours: f64) -> f64 {
    if (OPTIMAL_MIN_HOURS..=OPTIMAL_MAX_HOURS).contains(&hours) {
        return DURATION_WEIGHT;
    }
    let distance = (hours - DURATION_TARGET_HOURS).abs();
    DURATION_DECAY_PER_HOUR
        .mul_add(-distance, DURATION_WEIGHT)
        .clamp(0.0, DURATION_WEIGHT)
}

/// Quality sub-score (0-35)
#[must_use]
pub fn quality_sub_score(quality: u8) -> f64 {
    (f64::from(quality) / f64::from(QUALITY_MAX) * QUALITY_WEIGHT).clamp(0.0, QUALITY_WEIGHT)
}

/// Composite sleep score (0-100) for a single entry
///
/// Looks only at the entry itself, never at its neighbours.
#[must_use]
pub fn sleep_score(entry: &SleepEntry) -> u8 {
    let duration = duration_sub_score(entry.sleep_duration_hours);
    let quality = quality_sub_score(entry.sleep_quality);
    let mood = mood_sub_score(&entry.mood_after_sleep).clamp(0.0, MOOD_WEIGHT);

    (duration + quality + mood).round().clamp(0.0, 100.0) as u8
}

/// Human label for a 1-10 quality rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    /// 9-10
    Excellent,
    /// 7-8
    Good,
    /// 5-6
    Fair,
    /// 1-4
    Poor,
}

impl QualityLabel {
    /// Label for a quality rating
    #[must_use]
    pub const fn for_quality(quality: u8) -> Self {
        match quality {
            9.. => Self::Excellent,
            7..=8 => Self::Good,
            5..=6 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Display text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Display label for a 1-10 quality rating
#[must_use]
pub const fn quality_label(quality: u8) -> &'static str {
    QualityLabel::for_quality(quality).as_str()
}
