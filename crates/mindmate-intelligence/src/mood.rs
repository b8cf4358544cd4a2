// ABOUTME: Wake-mood label normalization via an ordered pattern rule table
// ABOUTME: Maps free-text labels like "Great" or "pretty poor" into five fixed buckets
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use mindmate_core::constants::sleep::MOOD_DEFAULT_SCORE;
use serde::{Deserialize, Serialize};

/// Normalized wake-mood bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBucket {
    /// "amazing", "great"
    Great,
    /// "good"
    Good,
    /// "fair"
    Fair,
    /// "poor"
    Poor,
    /// "terrible"
    Terrible,
}

impl MoodBucket {
    /// Mood sub-score contribution (max 25)
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Great => 25.0,
            Self::Good => 20.0,
            Self::Fair => 15.0,
            Self::Poor => 10.0,
            Self::Terrible => 5.0,
        }
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Terrible => "terrible",
        }
    }
}

/// One row of the normalization table
#[derive(Debug, Clone, Copy)]
pub struct MoodRule {
    /// Lowercase substring to look for
    pub pattern: &'static str,
    /// Bucket assigned on match
    pub bucket: MoodBucket,
}

/// Rules evaluated top to bottom; the first matching pattern wins
pub const MOOD_RULES: &[MoodRule] = &[
    MoodRule {
        pattern: "amazing",
        bucket: MoodBucket::Great,
    },
    MoodRule {
        pattern: "great",
        bucket: MoodBucket::Great,
    },
    MoodRule {
        pattern: "good",
        bucket: MoodBucket::Good,
    },
    MoodRule {
        pattern: "fair",
        bucket: MoodBucket::Fair,
    },
    MoodRule {
        pattern: "poor",
        bucket: MoodBucket::Poor,
    },
    MoodRule {
        pattern: "terrible",
        bucket: MoodBucket::Terrible,
    },
];

/// Classify a free-text wake-mood label, case-insensitively
///
/// Returns `None` when no rule matches.
#[must_use]
pub fn classify_mood(label: &str) -> Option<MoodBucket> {
    let normalized = label.to_lowercase();
    MOOD_RULES
        .iter()
        .find(|rule| normalized.contains(rule.pattern))
        .map(|rule| rule.bucket)
}

/// Mood sub-score for a label, falling back to the default for unknown labels
#[must_use]
pub fn mood_sub_score(label: &str) -> f64 {
    classify_mood(label).map_or(MOOD_DEFAULT_SCORE, MoodBucket::score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_and_case() {
        assert_eq!(classify_mood("AMAZING"), Some(MoodBucket::Great));
        assert_eq!(classify_mood("pretty Poor"), Some(MoodBucket::Poor));
        assert_eq!(classify_mood("Good"), Some(MoodBucket::Good));
        assert_eq!(classify_mood("groggy"), None);
    }

    #[test]
    fn test_unknown_label_uses_default_score() {
        assert!((mood_sub_score("meh") - MOOD_DEFAULT_SCORE).abs() < f64::EPSILON);
        assert!((mood_sub_score("terrible") - 5.0).abs() < f64::EPSILON);
    }
}
