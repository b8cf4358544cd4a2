// ABOUTME: Core types and constants for the MindMate wellness companion backend
// ABOUTME: Foundation crate with error handling, shared models, and constants
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![deny(unsafe_code)]

//! # `MindMate` Core
//!
//! Foundation crate shared by the analytics engine and the server. It changes
//! rarely, which keeps the intelligence crate and the server compiling in
//! parallel.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and HTTP status mapping
//! - **constants**: scoring weights, thresholds, prompt budgets, defaults
//! - **models**: `SleepEntry`, `ClockTime`, `ConversationTurn`, `ChatExchange`

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;
