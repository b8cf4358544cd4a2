// ABOUTME: Sleep duration derivation from bedtime and wake time, including midnight wrap
// ABOUTME: The only place overnight sleep crossing midnight is handled
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use mindmate_core::constants::sleep::MINUTES_PER_DAY;
use mindmate_core::errors::AppResult;
use mindmate_core::models::ClockTime;

/// Hours slept between `bedtime` and `wake_time`, rounded to 2 decimals
///
/// A wake time earlier than the bedtime means the night crossed midnight and a
/// full day is added. Equal times yield `0.0`; rejecting that is left to input
/// validation.
#[must_use]
pub fn compute_duration(bedtime: ClockTime, wake_time: ClockTime) -> f64 {
    let bed = u32::from(bedtime.minutes_since_midnight());
    let mut wake = u32::from(wake_time.minutes_since_midnight());

    if wake < bed {
        wake += u32::from(MINUTES_PER_DAY);
    }

    round_to(f64::from(wake - bed) / 60.0, 2)
}

/// [`compute_duration`] over `HH:MM` strings
///
/// # Errors
///
/// Returns `InvalidInput` if either string is not a valid 24-hour `HH:MM` time
pub fn compute_duration_str(bedtime: &str, wake_time: &str) -> AppResult<f64> {
    Ok(compute_duration(bedtime.parse()?, wake_time.parse()?))
}

/// Render hours as `"7h 30m"`
#[must_use]
pub fn format_duration(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as u64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
