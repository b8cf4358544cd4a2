// ABOUTME: Shared data models for sleep entries and chat conversations
// ABOUTME: Re-exports model types used by the engine, store, and routes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

/// Conversation turns and chat exchange results
pub mod conversation;
/// Sleep log entries and wall-clock time parsing
pub mod sleep;

pub use conversation::{ChatExchange, ConversationTurn, TurnRole};
pub use sleep::{ClockTime, SleepEntry};
