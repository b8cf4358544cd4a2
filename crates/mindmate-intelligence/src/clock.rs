// ABOUTME: Circular time-of-day statistics for bedtime and wake-time comparisons
// ABOUTME: Mean, distance, and deviation on the 24h clock so 23:50 and 00:10 are 20 minutes apart
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! Every comparison between two clock times in the engine goes through this
//! module, so average bedtime and the consistency score use one distance.

use mindmate_core::constants::sleep::{CONSISTENCY_ZERO_STDDEV_MINUTES, MINUTES_PER_DAY};
use mindmate_core::models::ClockTime;
use std::f64::consts::TAU;

const DAY: f64 = MINUTES_PER_DAY as f64;

/// Shortest distance in minutes between two minute-of-day values, going either way round the clock
#[must_use]
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % DAY;
    diff.min(DAY - diff)
}

/// Circular mean of clock times in minutes since midnight (0 <= result < 1440)
///
/// Falls back to the arithmetic mean when the times cancel out exactly
/// (e.g. 06:00 and 18:00) and no direction is defined. Returns `None` for an
/// empty slice.
#[must_use]
pub fn circular_mean_minutes(times: &[ClockTime]) -> Option<f64> {
    if times.is_empty() {
        return None;
    }

    let (sin_sum, cos_sum) = times.iter().fold((0.0_f64, 0.0_f64), |(s, c), t| {
        let angle = f64::from(t.minutes_since_midnight()) / DAY * TAU;
        (s + angle.sin(), c + angle.cos())
    });

    if sin_sum.hypot(cos_sum) < 1e-9 {
        let total: f64 = times
            .iter()
            .map(|t| f64::from(t.minutes_since_midnight()))
            .sum();
        return Some(total / times.len() as f64);
    }

    Some(sin_sum.atan2(cos_sum).rem_euclid(TAU) / TAU * DAY)
}

/// Circular mean rounded to a [`ClockTime`]
#[must_use]
pub fn average_time(times: &[ClockTime]) -> Option<ClockTime> {
    circular_mean_minutes(times).map(|mean| ClockTime::from_minutes(mean.round() as u16))
}

/// Population standard deviation (minutes) of circular distances from the circular mean
#[must_use]
pub fn circular_std_dev_minutes(times: &[ClockTime]) -> f64 {
    let Some(mean) = circular_mean_minutes(times) else {
        return 0.0;
    };

    let variance = times
        .iter()
        .map(|t| circular_distance(f64::from(t.minutes_since_midnight()), mean).powi(2))
        .sum::<f64>()
        / times.len() as f64;

    variance.sqrt()
}

/// Consistency score (0-100) where 100 means every time was identical
///
/// `max(0, 100 - stddev / 120 * 100)`, rounded.
#[must_use]
pub fn consistency_score(times: &[ClockTime]) -> u8 {
    let std_dev = circular_std_dev_minutes(times);
    std_dev
        .mul_add(-100.0 / CONSISTENCY_ZERO_STDDEV_MINUTES, 100.0)
        .max(0.0)
        .round() as u8
}
