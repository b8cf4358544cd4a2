// ABOUTME: Configuration module for the MindMate server
// ABOUTME: Re-exports environment-driven server, chat, sleep, and LLM settings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

/// Environment and server configuration
pub mod environment;

pub use environment::{ChatConfig, Environment, LlmConfig, ServerConfig, SleepConfig};
