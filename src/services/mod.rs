// ABOUTME: Domain service layer between HTTP routes and the entry store
// ABOUTME: Validates input and wires store queries into the pure analytics engine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! Domain service layer
//!
//! Services own validation and I/O orchestration so route handlers stay thin
//! and the analytics engine stays pure.

/// Sleep logging, analytics, chart, and dashboard operations
pub mod sleep;

pub use sleep::{NewSleepEntry, SleepDashboard, SleepEntryUpdate, SleepService};
