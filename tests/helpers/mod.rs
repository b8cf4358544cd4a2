// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the axum request helper and the scripted LLM provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
pub mod stub_llm;
